use colored::Colorize;
use std::fmt;
use std::process;

/// Exit codes for the CLI.
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Error from the split pipeline.
    Split(triplesplit_core::Error),
    /// Error from the visibility calculator.
    Policy(triplesplit_policy::PolicyError),
    /// Settings file issues.
    Config(String),
    /// Bad file path or unreadable input.
    Input(String),
    /// Argument / usage errors.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Split(e @ triplesplit_core::Error::Upload { uploaded, .. }) => write!(
                f,
                "{} {e}\n  {} {uploaded} graph(s) were uploaded before the failure",
                "error:".red().bold(),
                "note:".cyan().bold(),
            ),
            CliError::Split(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Policy(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Config(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Input(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<triplesplit_core::Error> for CliError {
    fn from(e: triplesplit_core::Error) -> Self {
        CliError::Split(e)
    }
}

impl From<triplesplit_policy::PolicyError> for CliError {
    fn from(e: triplesplit_policy::PolicyError) -> Self {
        CliError::Policy(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Input(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Input(format!("JSON error: {e}"))
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;
