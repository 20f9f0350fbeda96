use std::collections::HashSet;

use chrono::Utc;

use crate::events::{OmimSkip, RepoEvent};
use crate::model::dates::parse_date;
use crate::model::{DocumentId, Panel, dedup_genes};
use crate::panels::omim::{
    AliasResolver, OMIM_DEFAULT_INSTITUTE, OMIM_PANEL_NAME, OmimGeneParser, release_date_text,
};
use crate::repo::{PanelError, PanelRepository};
use crate::store::PanelStore;

/// Raw OMIM reference files, one entry per line.
#[derive(Debug, Clone, Default)]
pub struct OmimSource {
    pub genemap2_lines: Vec<String>,
    pub mim2gene_lines: Vec<String>,
}

/// Hgnc ids present in `new_panel` but not in `existing`.
pub fn compare_mim_panels(existing: &Panel, new_panel: &Panel) -> HashSet<u32> {
    let existing_ids = existing.hgnc_ids();
    new_panel
        .hgnc_ids()
        .into_iter()
        .filter(|id| !existing_ids.contains(id))
        .collect()
}

/// Stamps every gene with the version it first appeared in.
pub fn update_mim_version(new_genes: &HashSet<u32>, panel: &mut Panel, old_version: f64) {
    let version = panel.version;
    for gene in &mut panel.genes {
        gene.database_entry_version = Some(if new_genes.contains(&gene.hgnc_id) {
            version
        } else {
            old_version
        });
    }
}

impl<S: PanelStore> PanelRepository<S> {
    /// Creates or versions the OMIM-AUTO panel.
    ///
    /// Returns `None` when the release is already loaded (same release date,
    /// unless `force`) or brings no new genes.
    pub fn load_omim_panel(
        &self,
        source: &OmimSource,
        institute: Option<&str>,
        force: bool,
        parser: &dyn OmimGeneParser,
        aliases: &dyn AliasResolver,
    ) -> Result<Option<DocumentId>, PanelError> {
        let institute = institute.unwrap_or(OMIM_DEFAULT_INSTITUTE);
        let existing = self.gene_panel(OMIM_PANEL_NAME, None)?;

        let version = match &existing {
            Some(panel) => panel.version.floor() + 1.0,
            None => {
                self.emit(RepoEvent::OmimMissing {
                    panel_name: OMIM_PANEL_NAME.to_string(),
                });
                1.0
            }
        };

        let date = match release_date_text(&source.genemap2_lines) {
            Some(text) => {
                parse_date(text).ok_or_else(|| PanelError::InvalidReleaseDate(text.to_string()))?
            }
            None => Utc::now(),
        };

        if let Some(panel) = &existing
            && panel.date == date
            && !force
        {
            self.emit(RepoEvent::OmimUnchanged {
                panel_name: OMIM_PANEL_NAME.to_string(),
                reason: OmimSkip::SameReleaseDate,
            });
            return Ok(None);
        }

        let alias_genes = aliases.genes_by_alias().map_err(PanelError::Source)?;
        let genes = parser
            .parse(
                &source.genemap2_lines,
                &source.mim2gene_lines,
                &alias_genes,
            )
            .map_err(PanelError::Source)?;

        let mut panel = Panel::new(OMIM_PANEL_NAME, institute, version, date);
        panel.genes = dedup_genes(genes);

        if let Some(existing) = &existing {
            let new_genes = compare_mim_panels(existing, &panel);
            if new_genes.is_empty() {
                self.emit(RepoEvent::OmimUnchanged {
                    panel_name: OMIM_PANEL_NAME.to_string(),
                    reason: OmimSkip::NoNewGenes,
                });
                return Ok(None);
            }
            update_mim_version(&new_genes, &mut panel, existing.version);
            self.emit(RepoEvent::OmimVersioned {
                panel_name: OMIM_PANEL_NAME.to_string(),
                version,
                new_genes: new_genes.len(),
                genes: panel.genes.len(),
            });
        }

        self.save(panel, false).map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/repo/omim.rs"]
mod tests;
