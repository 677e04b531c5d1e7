use crate::config::Settings;
use crate::error::CliResult;
use triplesplit_core::bit_length;
use triplesplit_policy::cumulative_principals;

/// Print `000..0`, `000..1`, `00..11`, ... up to all ones.
///
/// The width comes from `--width`, else from the partition count, so the
/// samples line up with that deployment's graph names.
pub fn run(width: Option<usize>, partitions: Option<usize>, settings: &Settings) -> CliResult<()> {
    let width = match width {
        Some(w) => w,
        None => bit_length(settings.partitions(partitions)?),
    };
    for principal in cumulative_principals(width) {
        println!("{principal}");
    }
    Ok(())
}
