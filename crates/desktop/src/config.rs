//! Configuration management using lorekeeper.toml

use lorekeeper_core::{LorekeeperError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::DB_FILE_NAME;

pub const CONFIG_PATH: &str = "lorekeeper.toml";
pub const CONFIG_ENV: &str = "LOREKEEPER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Folder holding the database, e.g. a synced drive. Empty means the working directory.
    #[serde(default)]
    pub db_folder: String,
}

impl Config {
    /// Config file location: explicit path, then `LOREKEEPER_CONFIG`, then the default
    pub fn locate(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(CONFIG_PATH))
    }

    /// Load config from file, creating a default one if it doesn't exist
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Error parsing {}: {}", path.display(), e);
                        return Config::default();
                    }
                },
                Err(e) => {
                    tracing::warn!("Error reading {}: {}", path.display(), e);
                    return Config::default();
                }
            }
        }

        let config = Config::default();
        if let Err(e) = config.save(path) {
            tracing::warn!("Could not create {}: {}", path.display(), e);
        }
        config
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| LorekeeperError::Config(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| LorekeeperError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Database inside `db_folder` when that folder exists, else in the working directory
    pub fn resolve_db_path(&self) -> PathBuf {
        let folder = self.db_folder.trim();
        if !folder.is_empty() && Path::new(folder).is_dir() {
            return Path::new(folder).join(DB_FILE_NAME);
        }
        if !folder.is_empty() {
            tracing::warn!("Database folder {} not found, using working directory", folder);
        }
        PathBuf::from(DB_FILE_NAME)
    }
}
