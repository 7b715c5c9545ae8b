pub mod check;
pub mod loader;

pub use loader::{load_schema, load_schema_from_dir, parse_schema, Format, SchemaLoadError};
