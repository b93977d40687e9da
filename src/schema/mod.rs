//! Schema system - loading and case validation

pub mod loader;
pub mod validator;

pub use loader::{load_schema, ConfigError, Schema};
pub use validator::{
    validate_case, validate_collection, CaseReport, CollectionValidator, DuplicateTracker,
    Violation,
};
