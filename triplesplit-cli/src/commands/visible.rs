use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::error::{CliError, CliResult};
use serde::Serialize;
use triplesplit_core::{bit_length, parse_name};
use triplesplit_policy::{AttributeBitmap, VisibilityPolicy, ZeroAttributePolicy};

/// Flags for `triplesplit visible`.
pub struct VisibleArgs {
    pub partitions: Option<usize>,
    pub public: bool,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct VisibleOutput {
    principal: AttributeBitmap,
    graphs: Vec<String>,
}

pub fn run(bitmap: &str, args: VisibleArgs, settings: &Settings, quiet: bool) -> CliResult<()> {
    let principal: AttributeBitmap = bitmap.parse()?;
    let policy = if args.public {
        VisibilityPolicy::new(ZeroAttributePolicy::PublicPartition)
    } else {
        settings.visibility
    };

    let graphs = visible_graphs(&principal, &policy, args.partitions)?;

    match args.format {
        OutputFormat::Json => {
            let out = VisibleOutput { principal, graphs };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if graphs.is_empty() && !quiet {
                eprintln!("No graphs visible to {principal}");
            }
            for graph in graphs {
                println!("{graph}");
            }
        }
    }
    Ok(())
}

/// Visible graph names, optionally restricted to those that exist among
/// `partitions` graphs.
fn visible_graphs(
    principal: &AttributeBitmap,
    policy: &VisibilityPolicy,
    partitions: Option<usize>,
) -> CliResult<Vec<String>> {
    let visible = policy.visible_for(principal)?;
    let Some(count) = partitions else {
        return Ok(visible.map(|tag| tag.to_string()).collect());
    };

    if count < 1 {
        return Err(CliError::Usage("partition count must be at least 1".into()));
    }
    let width = bit_length(count);
    if principal.width() != width {
        return Err(CliError::Usage(format!(
            "bitmap '{principal}' has {} positions but {count} partitions use {width}-digit names",
            principal.width()
        )));
    }

    Ok(visible
        .map(|tag| tag.to_string())
        .filter(|name| {
            // The all-zero tag only appears under the public-partition policy
            !name.contains('1') || parse_name(name, count).is_ok()
        })
        .collect())
}
