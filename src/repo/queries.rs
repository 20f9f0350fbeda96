use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::events::RepoEvent;
use crate::model::{CaseRef, DocumentId, GeneFormat, PanelVersions};
use crate::repo::{PanelError, PanelRepository};
use crate::store::{PanelFilter, PanelStore};

/// How to find a single panel: one exact stored document, or the latest by name.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelLookup {
    Id(String),
    Name(String),
}

impl<S: PanelStore> PanelRepository<S> {
    /// hgnc id -> names of the case's panels that contain the gene.
    pub fn gene_to_panels(
        &self,
        case: &CaseRef,
    ) -> Result<BTreeMap<u32, BTreeSet<String>>, PanelError> {
        let mut genes: BTreeMap<u32, BTreeSet<String>> = BTreeMap::new();
        for assigned in &case.panels {
            let Some(panel) = self.gene_panel(&assigned.panel_name, Some(assigned.version))? else {
                self.emit(RepoEvent::CasePanelMissing {
                    panel_name: assigned.panel_name.clone(),
                    version: assigned.version,
                });
                continue;
            };
            for gene in &panel.genes {
                genes
                    .entry(gene.hgnc_id)
                    .or_default()
                    .insert(assigned.panel_name.clone());
            }
        }
        Ok(genes)
    }

    /// Genes of one panel in the requested format; empty when the panel is unknown.
    pub fn panel_to_genes(
        &self,
        lookup: &PanelLookup,
        gene_format: GeneFormat,
    ) -> Result<Vec<String>, PanelError> {
        let panel = match lookup {
            PanelLookup::Id(raw_id) => self.panel(raw_id)?,
            PanelLookup::Name(name) => self.gene_panel(name, None)?,
        };
        Ok(panel
            .map(|p| p.genes.iter().map(|g| gene_format.render(g)).collect())
            .unwrap_or_default())
    }

    /// Union of [`Self::panel_to_genes`] over several panels, sorted.
    pub fn panels_to_genes(
        &self,
        lookups: &[PanelLookup],
        gene_format: GeneFormat,
    ) -> Result<Vec<String>, PanelError> {
        let mut genes = BTreeSet::new();
        for lookup in lookups {
            genes.extend(self.panel_to_genes(lookup, gene_format)?);
        }
        Ok(genes.into_iter().collect())
    }

    /// Panel name -> display name of its latest version; unknown names are skipped.
    pub fn gene_panels_dict(
        &self,
        panel_names: &[&str],
    ) -> Result<BTreeMap<String, String>, PanelError> {
        let mut panels = BTreeMap::new();
        for name in panel_names {
            if let Some(panel) = self.gene_panel(name, None)? {
                panels.insert(name.to_string(), panel.display_name);
            }
        }
        Ok(panels)
    }

    pub fn clinical_symbols(&self, case: &CaseRef) -> Result<HashSet<String>, PanelError> {
        let mut symbols = HashSet::new();
        for panel in self.store.find(&case_panels_filter(case))? {
            symbols.extend(panel.genes.into_iter().map(|g| g.symbol));
        }
        Ok(symbols)
    }

    pub fn clinical_hgnc_ids(&self, case: &CaseRef) -> Result<HashSet<u32>, PanelError> {
        let mut ids = HashSet::new();
        for panel in self.store.find(&case_panels_filter(case))? {
            ids.extend(panel.genes.iter().map(|g| g.hgnc_id));
        }
        Ok(ids)
    }

    /// Every display name that ever listed the gene, with its distinct versions.
    pub fn search_panels_hgnc_id(&self, hgnc_id: u32) -> Result<Vec<PanelVersions>, PanelError> {
        let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for panel in self.store.find(&PanelFilter::containing_gene(hgnc_id))? {
            grouped
                .entry(panel.display_name)
                .or_default()
                .push(panel.version);
        }
        Ok(grouped
            .into_iter()
            .map(|(display_name, mut versions)| {
                versions.sort_by(f64::total_cmp);
                versions.dedup();
                PanelVersions {
                    display_name,
                    versions,
                }
            })
            .collect())
    }
}

fn case_panels_filter(case: &CaseRef) -> PanelFilter {
    let ids: Vec<DocumentId> = case.panels.iter().map(|p| p.panel_id.clone()).collect();
    PanelFilter::by_ids(ids)
}

#[cfg(test)]
#[path = "../../tests/src_inline/repo/queries.rs"]
mod tests;
