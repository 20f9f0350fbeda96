use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::panels::omim::OMIM_DEFAULT_INSTITUTE;

pub const DEFAULT_STORE_FILE: &str = "panels.json";
pub const DEFAULT_INSTITUTE: &str = "cust000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    pub store: PathBuf,
    pub default_institute: String,
    pub omim_institute: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            store: PathBuf::from(DEFAULT_STORE_FILE),
            default_institute: DEFAULT_INSTITUTE.to_string(),
            omim_institute: OMIM_DEFAULT_INSTITUTE.to_string(),
        }
    }
}

impl RepoConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config/mod.rs"]
mod tests;
