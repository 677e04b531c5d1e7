//! triplesplit CLI library.
//!
//! Types and command handlers behind the `triplesplit` binary. Library
//! consumers can build a [`Cli`](cli::Cli) programmatically and call
//! [`run`], or call the handlers in [`commands`] directly.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use cli::{Cli, Commands};

/// Dispatch a parsed [`Cli`] to the appropriate command handler.
pub async fn run(cli: Cli) -> error::CliResult<()> {
    let settings = config::load_settings(cli.config.as_deref())?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Split {
            file,
            partitions,
            output_dir,
            upload,
            store_url,
            timeout_secs,
            format,
        } => {
            let args = commands::split::SplitArgs {
                partitions,
                output_dir,
                upload,
                store_url,
                timeout_secs,
                format,
            };
            commands::split::run(&file, args, &settings, quiet).await
        }

        Commands::Visible {
            bitmap,
            partitions,
            public,
            format,
        } => {
            let args = commands::visible::VisibleArgs {
                partitions,
                public,
                format,
            };
            commands::visible::run(&bitmap, args, &settings, quiet)
        }

        Commands::Names { partitions } => commands::names::run(partitions, &settings),

        Commands::Principals { width, partitions } => {
            commands::principals::run(width, partitions, &settings)
        }
    }
}
