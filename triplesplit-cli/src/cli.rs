use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "triplesplit",
    about = "Split N-Triples across named graphs and compute attribute visibility",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a settings file (defaults to ./triplesplit.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Distribute the lines of a file round-robin across graph files
    Split {
        /// Input file, one statement per line
        file: PathBuf,

        /// Number of graphs to split across
        #[arg(long, short = 'n')]
        partitions: Option<usize>,

        /// Directory for the graph files
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Upload each graph file to the graph store after splitting
        #[arg(long)]
        upload: bool,

        /// Graph store endpoint (e.g. http://localhost:3030/test)
        #[arg(long)]
        store_url: Option<String>,

        /// Per-request upload timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Output format for the summary
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the graphs visible to a principal's attribute bitmap
    Visible {
        /// Attribute bitmap, e.g. 011
        bitmap: String,

        /// Only list graphs that exist among this many partitions
        #[arg(long, short = 'n')]
        partitions: Option<usize>,

        /// Treat the all-zero graph as public
        #[arg(long)]
        public: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print every graph name for a partition count
    Names {
        /// Number of partitions
        #[arg(long, short = 'n')]
        partitions: Option<usize>,
    },

    /// Print sample principals holding the lowest 0..=width attributes
    Principals {
        /// Bitmap width
        #[arg(long, short = 'w', conflicts_with = "partitions")]
        width: Option<usize>,

        /// Derive the width from a partition count
        #[arg(long, short = 'n')]
        partitions: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
