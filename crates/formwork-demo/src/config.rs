use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::DemoError;

pub const DEFAULT_SCHEMA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/schemas/forms.yaml");
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1000;

/// Settings for the demo runner. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Schema file to load.
    pub schema: PathBuf,
    /// Fixed delay of the stand-in submission backend.
    pub submit_delay_ms: u64,
    /// Make the stand-in backend reject every submission.
    pub fail_submissions: bool,
    /// Print each form's raw source alongside it.
    pub show_raw_code: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            schema: PathBuf::from(DEFAULT_SCHEMA),
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
            fail_submissions: false,
            show_raw_code: false,
        }
    }
}

impl DemoConfig {
    /// Load from a RON/JSON/TOML/YAML file. A relative `schema` path is
    /// resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self, DemoError> {
        let mut config: DemoConfig =
            formwork_data::loader::deserialize_file(path).map_err(|source| DemoError::Config {
                file: path.to_path_buf(),
                source,
            })?;
        if config.schema.is_relative() {
            if let Some(dir) = path.parent() {
                config.schema = dir.join(&config.schema);
            }
        }
        Ok(config)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}
