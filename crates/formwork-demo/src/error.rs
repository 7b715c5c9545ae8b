use std::path::PathBuf;

use formwork_core::error::FormError;
use formwork_core::registry::RegistryError;
use formwork_data::SchemaLoadError;

/// Errors that can occur in the demo runner.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// The demo configuration file could not be loaded.
    #[error("config error in {file}: {source}")]
    Config {
        file: PathBuf,
        source: SchemaLoadError,
    },

    /// The schema could not be loaded; nothing is rendered.
    #[error("schema unavailable: {0}")]
    SchemaUnavailable(String),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("field type table: {0}")]
    Registry(#[from] RegistryError),
}
