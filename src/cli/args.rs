//! CLI argument definitions using clap derive

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::validate::ValidateArgs;

#[derive(Parser, Debug)]
#[command(name = "caselint")]
#[command(author, version, about = "MedSim clinical case checker")]
#[command(long_about = "Checks the simulator's clinical cases against the minimal case schema before they reach the engine.\n\nExit status is 0 when every case conforms and 1 otherwise.")]
pub struct Cli {
    #[command(flatten)]
    pub validate: ValidateArgs,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,

    /// Only print the summary, not the individual violations
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also list the cases that pass
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Content root (default: auto-detect by finding data/cases.js)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// A single JSON document (for CI tooling)
    Json,
}
