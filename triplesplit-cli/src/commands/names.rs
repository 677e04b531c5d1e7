use crate::config::Settings;
use crate::error::CliResult;
use triplesplit_core::partition_names;

pub fn run(partitions: Option<usize>, settings: &Settings) -> CliResult<()> {
    for name in partition_names(settings.partitions(partitions)?)? {
        println!("{name}");
    }
    Ok(())
}
