use std::collections::{HashMap, HashSet};

use chrono::Utc;
use thiserror::Error;

use crate::model::dates::parse_date;
use crate::model::panel::DEFAULT_PANEL_TYPE;
use crate::model::{GeneEntry, Panel};
use crate::panels::loader::RawPanel;

#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("panel {panel_name}: gene with hgnc_id {hgnc_id} has no symbol and is unknown")]
    UnknownGene { panel_name: String, hgnc_id: u32 },
    #[error("panel {panel_name}: hgnc_id {hgnc_id} listed more than once")]
    DuplicateGene { panel_name: String, hgnc_id: u32 },
    #[error("panel {panel_name}: invalid date {date:?}")]
    InvalidDate { panel_name: String, date: String },
    #[error("panel {0}: version must be a finite positive number")]
    InvalidVersion(String),
}

/// Looks up the canonical symbol of a gene.
pub trait GeneResolver {
    fn hgnc_symbol(&self, hgnc_id: u32) -> Option<String>;
}

/// Resolver without a gene reference; panel files must carry symbols.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGeneIndex;

impl GeneResolver for NoGeneIndex {
    fn hgnc_symbol(&self, _hgnc_id: u32) -> Option<String> {
        None
    }
}

impl GeneResolver for HashMap<u32, String> {
    fn hgnc_symbol(&self, hgnc_id: u32) -> Option<String> {
        self.get(&hgnc_id).cloned()
    }
}

pub trait PanelBuilder {
    fn build(&self, raw: RawPanel, resolver: &dyn GeneResolver) -> Result<Panel, BuildError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPanelBuilder;

impl PanelBuilder for DefaultPanelBuilder {
    fn build(&self, raw: RawPanel, resolver: &dyn GeneResolver) -> Result<Panel, BuildError> {
        if !raw.version.is_finite() || raw.version <= 0.0 {
            return Err(BuildError::InvalidVersion(raw.panel_name));
        }
        let date = match raw.date.as_deref() {
            Some(text) => parse_date(text).ok_or_else(|| BuildError::InvalidDate {
                panel_name: raw.panel_name.clone(),
                date: text.to_string(),
            })?,
            None => Utc::now(),
        };

        let mut seen = HashSet::new();
        let mut genes = Vec::with_capacity(raw.genes.len());
        for gene in raw.genes {
            if !seen.insert(gene.hgnc_id) {
                return Err(BuildError::DuplicateGene {
                    panel_name: raw.panel_name,
                    hgnc_id: gene.hgnc_id,
                });
            }
            let symbol = gene
                .symbol
                .filter(|s| !s.trim().is_empty())
                .or_else(|| resolver.hgnc_symbol(gene.hgnc_id))
                .ok_or_else(|| BuildError::UnknownGene {
                    panel_name: raw.panel_name.clone(),
                    hgnc_id: gene.hgnc_id,
                })?;
            genes.push(GeneEntry::new(gene.hgnc_id, symbol).with_info(gene.info));
        }

        let mut panel = Panel::new(raw.panel_name, raw.institute, raw.version, date);
        if let Some(display_name) = raw.display_name {
            panel.display_name = display_name;
        }
        panel.panel_type = raw
            .panel_type
            .unwrap_or_else(|| DEFAULT_PANEL_TYPE.to_string());
        panel.maintainer = raw.maintainer;
        panel.hidden = raw.hidden;
        panel.genes = genes;
        Ok(panel)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/panels/builder.rs"]
mod tests;
