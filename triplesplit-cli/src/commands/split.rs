use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::error::CliResult;
use std::path::{Path, PathBuf};
use triplesplit_core::{split_file, Backend, SplitOptions};

/// Flags for `triplesplit split`.
pub struct SplitArgs {
    pub partitions: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub upload: bool,
    pub store_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub format: OutputFormat,
}

pub async fn run(
    file: &Path,
    args: SplitArgs,
    settings: &Settings,
    quiet: bool,
) -> CliResult<()> {
    let backend = if args.upload {
        Backend::RemoteGraphStore(settings.graph_store(args.store_url, args.timeout_secs)?)
    } else {
        Backend::LocalFile
    };
    let options = SplitOptions::new(settings.partitions(args.partitions)?)
        .with_output_dir(settings.output_dir(args.output_dir))
        .with_backend(backend);

    let report = split_file(file, &options).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text if !quiet => println!("{}", report.summarize()),
        OutputFormat::Text => {}
    }
    Ok(())
}
