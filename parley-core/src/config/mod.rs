//! Model table configuration
//!
//! The core is driven by a per-model table: endpoint URL, auth headers,
//! token pricing, and any extra request parameters the model should always
//! be called with. Tables load once at startup, interpolate `${VAR}`
//! environment references, validate, and are immutable from then on.

mod env;
mod error;
mod schema;

pub use error::{ConfigError, ValidationError, ValidationErrorKind};
pub use schema::{ModelConfig, ModelPricing, ModelTable};

use std::fs;
use std::path::Path;

/// Load a model table from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<ModelTable, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    // Interpolate environment variables before parsing
    let interpolated = env::interpolate_env_vars(&content)?;

    let table: ModelTable =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    table.validate()?;
    Ok(table)
}

/// Load a model table from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<ModelTable, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    // Interpolate environment variables before parsing
    let interpolated = env::interpolate_env_vars(&content)?;

    let table: ModelTable =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    table.validate()?;
    Ok(table)
}
