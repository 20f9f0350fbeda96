use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::GeneInfo;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error in {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("no panel files found in {0}")]
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawGene {
    pub hgnc_id: u32,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(flatten)]
    pub info: GeneInfo,
}

/// A panel as read from a panel file, before gene resolution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPanel {
    pub panel_name: String,
    #[serde(default)]
    pub institute: String,
    pub version: f64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "type")]
    pub panel_type: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub maintainer: Vec<String>,
    #[serde(default)]
    pub hidden: Option<bool>,
    #[serde(default, rename = "gene")]
    pub genes: Vec<RawGene>,
}

pub fn parse_panel_toml(text: &str, origin: &str) -> Result<RawPanel, LoadError> {
    toml::from_str(text).map_err(|source| LoadError::Toml {
        path: origin.to_string(),
        source,
    })
}

pub fn load_panel_file(path: &Path) -> Result<RawPanel, LoadError> {
    let text = fs::read_to_string(path)?;
    parse_panel_toml(&text, &path.to_string_lossy())
}

/// Every `*.toml` panel file directly under `dir`, in file name order.
pub fn load_panels_from_dir(dir: &Path) -> Result<Vec<RawPanel>, LoadError> {
    let panels = panel_files(dir)?
        .iter()
        .map(|file| load_panel_file(file))
        .collect::<Result<Vec<_>, _>>()?;
    if panels.is_empty() {
        return Err(LoadError::Empty(dir.to_string_lossy().to_string()));
    }
    Ok(panels)
}

fn panel_files(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .filter(|path| {
            path.as_ref().map_or(true, |p| {
                p.is_file() && p.extension().is_some_and(|ext| ext == "toml")
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();
    Ok(files)
}

#[cfg(test)]
#[path = "../../tests/src_inline/panels/loader.rs"]
mod tests;
