use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::DocumentId;

pub const DEFAULT_PANEL_TYPE: &str = "clinical";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pending action {0:?}, expected one of add, delete, edit")]
pub struct InvalidActionError(pub String);

/// Optional clinical annotation carried by a gene entry or a staged change.
///
/// Every field distinguishes "absent" (`None`, not serialized) from an empty
/// value, so an edit can clear a field without writing a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_associated_transcripts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduced_penetrance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mosaicism: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritance_models: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_inheritance_models: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl GeneInfo {
    pub fn is_empty(&self) -> bool {
        *self == GeneInfo::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneEntry {
    pub hgnc_id: u32,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_entry_version: Option<f64>,
    #[serde(flatten)]
    pub info: GeneInfo,
}

impl GeneEntry {
    pub fn new(hgnc_id: u32, symbol: impl Into<String>) -> Self {
        Self {
            hgnc_id,
            symbol: symbol.into(),
            database_entry_version: None,
            info: GeneInfo::default(),
        }
    }

    pub fn with_info(mut self, info: GeneInfo) -> Self {
        self.info = info;
        self
    }
}

/// A gene as known to the HGNC reference, used when staging changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HgncGene {
    pub hgnc_id: u32,
    pub hgnc_symbol: String,
}

impl HgncGene {
    pub fn new(hgnc_id: u32, hgnc_symbol: impl Into<String>) -> Self {
        Self {
            hgnc_id,
            hgnc_symbol: hgnc_symbol.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingAction {
    Add,
    Delete,
    Edit,
}

impl PendingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingAction::Add => "add",
            PendingAction::Delete => "delete",
            PendingAction::Edit => "edit",
        }
    }
}

impl FromStr for PendingAction {
    type Err = InvalidActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(PendingAction::Add),
            "delete" => Ok(PendingAction::Delete),
            "edit" => Ok(PendingAction::Edit),
            other => Err(InvalidActionError(other.to_string())),
        }
    }
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChange {
    pub hgnc_id: u32,
    pub action: PendingAction,
    pub symbol: String,
    #[serde(default)]
    pub info: GeneInfo,
}

impl PendingChange {
    pub fn new(gene: &HgncGene, action: PendingAction, info: GeneInfo) -> Self {
        Self {
            hgnc_id: gene.hgnc_id,
            action,
            symbol: gene.hgnc_symbol.clone(),
            info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub panel_name: String,
    pub display_name: String,
    pub institute: String,
    #[serde(rename = "type", default = "default_panel_type")]
    pub panel_type: String,
    pub date: DateTime<Utc>,
    pub version: f64,
    #[serde(default)]
    pub maintainer: Vec<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<Vec<PendingChange>>,
    #[serde(default)]
    pub genes: Vec<GeneEntry>,
}

fn default_panel_type() -> String {
    DEFAULT_PANEL_TYPE.to_string()
}

impl Panel {
    pub fn new(
        panel_name: impl Into<String>,
        institute: impl Into<String>,
        version: f64,
        date: DateTime<Utc>,
    ) -> Self {
        let panel_name = panel_name.into();
        Self {
            id: None,
            display_name: panel_name.clone(),
            panel_name,
            institute: institute.into(),
            panel_type: default_panel_type(),
            date,
            version,
            maintainer: Vec::new(),
            is_archived: false,
            hidden: None,
            pending: None,
            genes: Vec::new(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    pub fn pending_changes(&self) -> &[PendingChange] {
        self.pending.as_deref().unwrap_or(&[])
    }

    pub fn gene(&self, hgnc_id: u32) -> Option<&GeneEntry> {
        self.genes.iter().find(|g| g.hgnc_id == hgnc_id)
    }

    pub fn contains_gene(&self, hgnc_id: u32) -> bool {
        self.gene(hgnc_id).is_some()
    }

    pub fn hgnc_ids(&self) -> HashSet<u32> {
        self.genes.iter().map(|g| g.hgnc_id).collect()
    }

    pub fn label(&self) -> String {
        format!("{} v{}", self.panel_name, self.version)
    }
}

/// Keeps the first entry for every hgnc id, preserving order.
pub fn dedup_genes(genes: impl IntoIterator<Item = GeneEntry>) -> Vec<GeneEntry> {
    let mut seen = HashSet::new();
    genes
        .into_iter()
        .filter(|g| seen.insert(g.hgnc_id))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneFormat {
    #[default]
    Symbol,
    HgncId,
}

impl GeneFormat {
    pub fn render(&self, gene: &GeneEntry) -> String {
        match self {
            GeneFormat::Symbol => gene.symbol.clone(),
            GeneFormat::HgncId => gene.hgnc_id.to_string(),
        }
    }
}

/// A panel version assigned to a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasePanel {
    pub panel_id: DocumentId,
    pub panel_name: String,
    pub version: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseRef {
    #[serde(default)]
    pub panels: Vec<CasePanel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelVersions {
    pub display_name: String,
    pub versions: Vec<f64>,
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/panel.rs"]
mod tests;
