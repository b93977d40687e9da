//! CLI module - argument parsing and the report driver

pub mod args;
pub mod commands;

pub use args::{Cli, GlobalOpts, OutputFormat};
