//! Schema loading: reads schema files, deserializes them, checks them.
//!
//! Provides format detection (RON/JSON/TOML/YAML), file discovery, and
//! deserialization helpers. Every loaded schema passes through
//! [`crate::check::check_schema`] before it is handed out.

use std::path::{Path, PathBuf};

use formwork_core::schema::Schema;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::check::check_schema;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a schema. All are terminal: a schema
/// that fails to load renders nothing.
#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    /// No schema file with the given base name exists in the directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The document parsed but has no top-level `forms` list.
    #[error("{file} has no top-level 'forms' list")]
    MissingForms { file: PathBuf },

    #[error("duplicate form name '{name}' in {file}")]
    DuplicateForm { file: PathBuf, name: String },

    /// Two fields of one field list share a name. `field` is the dotted
    /// path of the second occurrence.
    #[error("duplicate field '{field}' in form '{form}' ({file})")]
    DuplicateField {
        file: PathBuf,
        form: String,
        field: String,
    },

    #[error("invalid pattern for field '{field}' in form '{form}' ({file}): {detail}")]
    InvalidPattern {
        file: PathBuf,
        form: String,
        field: String,
        detail: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
    Yaml,
}

/// Extensions probed by [`find_data_file`], in probe order.
const EXTENSIONS: [&str; 5] = ["ron", "toml", "json", "yaml", "yml"];

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, SchemaLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        Some("yaml" | "yml") => Ok(Format::Yaml),
        _ => Err(SchemaLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a file with the given base name (without extension).
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// more than one supported extension exists for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, SchemaLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in EXTENSIONS {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(SchemaLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, SchemaLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| SchemaLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `file` only labels errors.
///
/// RON is read with implicit `Some`, so optional keys are written bare as in
/// the other formats.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, SchemaLoadError> {
    let parse_error = |detail: String| SchemaLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .from_str(content)
            .map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, SchemaLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ===========================================================================
// Schema loading
// ===========================================================================

/// Top-level shape of a schema file: `{ forms: [ { form: ... }, ... ] }`.
#[derive(Debug, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    forms: Option<Schema>,
}

impl SchemaDocument {
    fn into_schema(self, file: &Path) -> Result<Schema, SchemaLoadError> {
        let schema = self.forms.ok_or_else(|| SchemaLoadError::MissingForms {
            file: file.to_path_buf(),
        })?;
        check_schema(&schema, file)?;
        Ok(schema)
    }
}

/// Load and check the schema file at `path`.
pub fn load_schema(path: &Path) -> Result<Schema, SchemaLoadError> {
    let document: SchemaDocument = deserialize_file(path)?;
    let schema = document.into_schema(path)?;
    tracing::info!(file = %path.display(), forms = schema.len(), "schema loaded");
    Ok(schema)
}

/// Load the schema file named `base_name` (any supported extension) from `dir`.
pub fn load_schema_from_dir(dir: &Path, base_name: &str) -> Result<Schema, SchemaLoadError> {
    let path = require_data_file(dir, base_name)?;
    load_schema(&path)
}

/// Parse and check an in-memory schema document.
pub fn parse_schema(content: &str, format: Format) -> Result<Schema, SchemaLoadError> {
    let label = Path::new("<inline>");
    let document: SchemaDocument = deserialize_str(content, format, label)?;
    document.into_schema(label)
}

// ===========================================================================
// Tests
// ===========================================================================
