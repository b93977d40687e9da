//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::Project;

/// caselint configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema file (relative paths resolve against the content root)
    pub schema: Option<PathBuf>,

    /// Case data file (relative paths resolve against the content root)
    pub cases: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all file sources, merging in priority order.
    ///
    /// Environment variables and flags are layered on top by the CLI.
    pub fn load(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Global user config (~/.config/caselint/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read(&global_path) {
                config.merge(global);
            }
        }

        // 2. Project config (<root>/.caselint.yaml)
        if let Some(project) = project {
            if let Some(mut project_config) = Self::read(&project.config_path()) {
                project_config.schema = project_config.schema.map(|p| project.resolve(&p));
                project_config.cases = project_config.cases.map(|p| project.resolve(&p));
                config.merge(project_config);
            }
        }

        config
    }

    /// Parse a config file; missing or malformed files are skipped
    fn read(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        serde_yml::from_str::<Config>(&contents).ok()
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "caselint")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.schema.is_some() {
            self.schema = other.schema;
        }
        if other.cases.is_some() {
            self.cases = other.cases;
        }
    }
}
