//! Minimal case schema loading

use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Field-presence rules every case record is gated on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    required: Vec<String>,
    patient_required: Vec<String>,
}

impl Schema {
    pub fn new(required: Vec<String>, patient_required: Vec<String>) -> Self {
        Self {
            required,
            patient_required,
        }
    }

    /// Top-level fields every case must contain, in schema order
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Fields every `patient` sub-record must contain, in schema order
    pub fn patient_required(&self) -> &[String] {
        &self.patient_required
    }
}

/// On-disk shape of the schema file. Both keys are optional here so an
/// absent key can be reported by name.
#[derive(Debug, Deserialize)]
struct SchemaFile {
    required: Option<Vec<String>>,
    patient_required: Option<Vec<String>>,
}

/// Schema resource could not be turned into a [`Schema`]
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Cannot read schema file {}", .path.display())]
    #[diagnostic(
        code(caselint::schema::unreadable),
        help("Check the path, or point --schema / CASELINT_SCHEMA at the schema file")
    )]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema file {} is not a valid schema document", .path.display())]
    #[diagnostic(
        code(caselint::schema::malformed),
        help("Expected a JSON object with `required` and `patient_required` arrays of field names")
    )]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema file {} is missing `{field}`", .path.display())]
    #[diagnostic(
        code(caselint::schema::missing_field),
        help("Both `required` and `patient_required` must be present as arrays of field names")
    )]
    MissingField { path: PathBuf, field: &'static str },
}

/// Read and parse the schema file at `path`
pub fn load_schema(path: &Path) -> Result<Schema, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_schema(&content, path)
}

/// Parse schema text; `path` is only used for error reporting
pub fn parse_schema(content: &str, path: &Path) -> Result<Schema, ConfigError> {
    let file: SchemaFile =
        serde_json::from_str(content).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    let missing = |field: &'static str| ConfigError::MissingField {
        path: path.to_path_buf(),
        field,
    };
    let required = file.required.ok_or_else(|| missing("required"))?;
    let patient_required = file
        .patient_required
        .ok_or_else(|| missing("patient_required"))?;

    Ok(Schema::new(required, patient_required))
}
