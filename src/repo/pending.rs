use std::collections::HashMap;

use chrono::Utc;

use crate::events::RepoEvent;
use crate::model::{DocumentId, GeneEntry, Panel, PendingAction, PendingChange};
use crate::repo::{PanelError, PanelRepository, check_version, require_id};
use crate::store::{PanelFilter, PanelStore, PanelUpdate};

/// Gene list that results from applying the panel's staged changes.
///
/// Untouched genes are kept as they are. An edit clears every optional
/// clinical field before laying the staged info over the entry, leaving
/// `hgnc_id`, `symbol` and `database_entry_version` alone. Deleted genes are
/// dropped and added genes are appended without an entry version.
pub fn reconcile_pending(panel: &Panel) -> Vec<GeneEntry> {
    let pending = panel.pending_changes();
    let updates: HashMap<u32, &PendingChange> = pending
        .iter()
        .filter(|change| change.action != PendingAction::Add)
        .map(|change| (change.hgnc_id, change))
        .collect();

    let mut genes = Vec::with_capacity(panel.genes.len() + pending.len());
    for gene in &panel.genes {
        match updates.get(&gene.hgnc_id) {
            None => genes.push(gene.clone()),
            Some(change) if change.action == PendingAction::Edit => {
                let mut edited = gene.clone();
                edited.info = change.info.clone();
                genes.push(edited);
            }
            Some(_) => {}
        }
    }

    for change in pending
        .iter()
        .filter(|change| change.action == PendingAction::Add)
    {
        if genes.iter().any(|g| g.hgnc_id == change.hgnc_id) {
            continue;
        }
        genes.push(
            GeneEntry::new(change.hgnc_id, change.symbol.clone()).with_info(change.info.clone()),
        );
    }
    genes
}

impl<S: PanelStore> PanelRepository<S> {
    /// Materializes the staged changes of `panel` as `target_version`.
    ///
    /// The same version is replaced in place. Any other version archives the
    /// stored original and inserts the result as a new document.
    pub fn apply_pending(
        &self,
        panel: &Panel,
        target_version: f64,
    ) -> Result<DocumentId, PanelError> {
        let id = require_id(panel)?;
        check_version(&panel.panel_name, target_version)?;

        let mut next = panel.clone();
        next.genes = reconcile_pending(panel);
        next.pending = Some(Vec::new());
        next.date = Utc::now();
        next.version = target_version;
        let genes = next.genes.len();

        if target_version == panel.version {
            let filter = PanelFilter::by_id(&id).with_version(panel.version);
            let stored = self
                .store
                .find_one_and_replace(&filter, next)?
                .ok_or_else(|| conflict(panel))?;
            self.emit(RepoEvent::PendingApplied {
                panel_name: panel.panel_name.clone(),
                from_version: panel.version,
                to_version: target_version,
                genes,
                in_place: true,
            });
            return require_id(&stored);
        }

        if self
            .store
            .find_one(&PanelFilter::by_name_version(&panel.panel_name, target_version))?
            .is_some()
        {
            return Err(PanelError::DuplicateVersion {
                panel_name: panel.panel_name.clone(),
                version: target_version,
            });
        }

        // Only an unarchived original may be superseded; a lost race shows up here.
        let archive_filter = PanelFilter::by_id(&id)
            .with_version(panel.version)
            .with_archived(false);
        self.store
            .find_one_and_update(&archive_filter, &PanelUpdate::SetArchived(true))?
            .ok_or_else(|| conflict(panel))?;
        self.emit(RepoEvent::PanelArchived {
            panel_name: panel.panel_name.clone(),
            version: panel.version,
        });

        next.id = None;
        next.is_archived = false;
        let new_id = self.store.insert_one(next)?;
        self.emit(RepoEvent::PendingApplied {
            panel_name: panel.panel_name.clone(),
            from_version: panel.version,
            to_version: target_version,
            genes,
            in_place: false,
        });
        Ok(new_id)
    }
}

fn conflict(panel: &Panel) -> PanelError {
    PanelError::Conflict {
        panel_name: panel.panel_name.clone(),
        version: panel.version,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/repo/pending.rs"]
mod tests;
