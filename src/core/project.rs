//! Content root discovery

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Case data, relative to the content root
pub const CASES_FILE: &str = "data/cases.js";

/// Minimal schema, relative to the content root
pub const SCHEMA_FILE: &str = "data/case_schema_min.json";

/// Project config file, relative to the content root
pub const CONFIG_FILE: &str = ".caselint.yaml";

/// A simulator content tree (the directory holding `data/cases.js`)
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Find the content root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the content root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(CASES_FILE).is_file() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Use `root` as-is, without searching
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cases_path(&self) -> PathBuf {
        self.root.join(CASES_FILE)
    }

    pub fn schema_path(&self) -> PathBuf {
        self.root.join(SCHEMA_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Resolve a configured path: absolute paths pass through, relative
    /// ones are taken from the content root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum ProjectError {
    #[error("No MedSim content found (searched for data/cases.js from {} upward)", .searched_from.display())]
    #[diagnostic(
        code(caselint::project::not_found),
        help("Run inside the simulator tree, or pass --root / --schema / --cases")
    )]
    NotFound { searched_from: PathBuf },

    #[error("IO error: {0}")]
    IoError(String),
}
