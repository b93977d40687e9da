//! Core module - fundamental types and utilities

pub mod config;
pub mod document;
pub mod project;

pub use config::Config;
pub use project::{Project, ProjectError};
