//! Project configuration loaded from an optional `taskpad.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE: &str = "taskpad.toml";

/// Default database file name when none is configured.
pub const DEFAULT_DB_FILE: &str = "taskpad.db";

/// Per-project configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Where the task table lives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path, absolute or relative to the project directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load `taskpad.toml` from the given directory, falling back to the
    /// defaults when the file does not exist.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Resolve the database path against the project directory.
    #[must_use]
    pub fn database_path(&self, dir: &Path) -> PathBuf {
        self.database.path.as_ref().map_or_else(
            || dir.join(DEFAULT_DB_FILE),
            |path| {
                if path.is_absolute() {
                    path.clone()
                } else {
                    dir.join(path)
                }
            },
        )
    }
}
