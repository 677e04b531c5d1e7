use crate::error::{CliError, CliResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use triplesplit_core::GraphStoreConfig;
use triplesplit_policy::VisibilityPolicy;

const SETTINGS_FILE: &str = "triplesplit.toml";
pub const DEFAULT_PARTITIONS: usize = 2;

/// Contents of `triplesplit.toml`.
///
/// ```toml
/// partitions = 255
/// output_dir = "out"
///
/// [store]
/// url = "http://localhost:3030/test"
/// timeout_secs = 60
///
/// [visibility]
/// zero_attributes = "deny"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub partitions: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub store: Option<StoreSettings>,
    #[serde(default)]
    pub visibility: VisibilityPolicy,
}

/// `[store]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSettings {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub content_type: Option<String>,
}

/// Load settings from `--config`, else `./triplesplit.toml` if present.
///
/// A missing `--config` file is an error; a missing default file is not.
pub fn load_settings(config_override: Option<&Path>) -> CliResult<Settings> {
    let path = match config_override {
        Some(p) => {
            if !p.is_file() {
                return Err(CliError::Config(format!(
                    "config file does not exist: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => {
            let default = std::env::current_dir()?.join(SETTINGS_FILE);
            if !default.is_file() {
                return Ok(Settings::default());
            }
            default
        }
    };
    read_settings(&path)
}

fn read_settings(path: &Path) -> CliResult<Settings> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("failed to read {}: {e}", path.display())))?;
    let settings: Settings = toml::from_str(&text)
        .map_err(|e| CliError::Config(format!("invalid {}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

impl Settings {
    /// Partition count: flag, then file, then the built-in default.
    pub fn partitions(&self, flag: Option<usize>) -> CliResult<usize> {
        let count = flag.or(self.partitions).unwrap_or(DEFAULT_PARTITIONS);
        if count < 1 {
            return Err(CliError::Usage("partition count must be at least 1".into()));
        }
        Ok(count)
    }

    pub fn output_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Graph store endpoint for uploads. There is no built-in URL.
    pub fn graph_store(
        &self,
        url_flag: Option<String>,
        timeout_flag: Option<u64>,
    ) -> CliResult<GraphStoreConfig> {
        let store = self.store.as_ref();
        let url = url_flag
            .or_else(|| store.and_then(|s| s.url.clone()))
            .ok_or_else(|| {
                CliError::Usage(
                    "uploading requires a graph store URL (--store-url or [store] url)".into(),
                )
            })?;

        let mut config = GraphStoreConfig::new(url);
        if let Some(secs) = timeout_flag.or_else(|| store.and_then(|s| s.timeout_secs)) {
            config = config.with_timeout_secs(secs);
        }
        if let Some(content_type) = store.and_then(|s| s.content_type.clone()) {
            config.content_type = content_type;
        }
        Ok(config)
    }
}
