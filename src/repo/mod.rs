//! Panel repository: versioned panel documents over a [`PanelStore`].

pub mod omim;
pub mod pending;
pub mod queries;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::events::{EventSink, PanelChange, RepoEvent, TracingSink};
use crate::model::{
    DocumentId, GeneInfo, HgncGene, InvalidActionError, Panel, PendingAction, PendingChange,
};
use crate::panels::{BuildError, GeneResolver, PanelBuilder, RawPanel};
use crate::store::{PanelFilter, PanelStore, PanelUpdate, StoreError};

pub use queries::PanelLookup;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("panel {panel_name} with version {version} already exists in database")]
    DuplicateVersion { panel_name: String, version: f64 },
    #[error(transparent)]
    InvalidAction(#[from] InvalidActionError),
    #[error("panel {panel_name}: invalid version {version}, must be a positive finite number")]
    InvalidVersion { panel_name: String, version: f64 },
    #[error("panel {panel_name} version {version} was modified concurrently")]
    Conflict { panel_name: String, version: f64 },
    #[error("panel {0} has no database identity")]
    MissingIdentity(String),
    #[error("invalid release date: {0:?}")]
    InvalidReleaseDate(String),
    #[error("build error: {0}")]
    Build(#[from] BuildError),
    #[error("source error: {0:#}")]
    Source(anyhow::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub struct PanelRepository<S> {
    store: S,
    events: Arc<dyn EventSink>,
}

impl<S: PanelStore> PanelRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_events(store, Arc::new(TracingSink))
    }

    pub fn with_events(store: S, events: Arc<dyn EventSink>) -> Self {
        Self { store, events }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn emit(&self, event: RepoEvent) {
        self.events.emit(event);
    }

    /// Builds a parsed panel and saves it.
    pub fn load_panel(
        &self,
        raw: RawPanel,
        builder: &dyn PanelBuilder,
        resolver: &dyn GeneResolver,
        replace: bool,
    ) -> Result<DocumentId, PanelError> {
        let panel = builder.build(raw, resolver)?;
        self.save(panel, replace)
    }

    /// Stores a panel, refusing an existing `(panel_name, version)` unless `replace`.
    pub fn save(&self, panel: Panel, replace: bool) -> Result<DocumentId, PanelError> {
        let existing = self
            .store
            .find_one(&PanelFilter::by_name_version(&panel.panel_name, panel.version))?;

        let Some(existing) = existing else {
            let (panel_name, version, genes) =
                (panel.panel_name.clone(), panel.version, panel.genes.len());
            let id = self.store.insert_one(panel)?;
            self.emit(RepoEvent::PanelInserted {
                panel_name,
                version,
                genes,
            });
            return Ok(id);
        };

        if !replace {
            return Err(PanelError::DuplicateVersion {
                panel_name: panel.panel_name,
                version: panel.version,
            });
        }

        let existing_id = require_id(&existing)?;
        let (panel_name, version) = (panel.panel_name.clone(), panel.version);
        let replaced = self
            .store
            .find_one_and_replace(&PanelFilter::by_id(&existing_id), panel)?
            .ok_or_else(|| PanelError::Conflict {
                panel_name: panel_name.clone(),
                version,
            })?;
        self.emit(RepoEvent::PanelReplaced {
            panel_name,
            version,
        });
        require_id(&replaced)
    }

    /// Tolerant lookup: a malformed identity is reported and treated as absent.
    pub fn panel(&self, raw_id: &str) -> Result<Option<Panel>, PanelError> {
        match raw_id.parse::<DocumentId>() {
            Ok(id) => self.panel_by_id(&id),
            Err(err) => {
                self.emit(RepoEvent::InvalidIdentity {
                    raw: raw_id.to_string(),
                    reason: err.to_string(),
                });
                Ok(None)
            }
        }
    }

    pub fn panel_by_id(&self, id: &DocumentId) -> Result<Option<Panel>, PanelError> {
        Ok(self.store.find_one(&PanelFilter::by_id(id))?)
    }

    /// Exact version when given, otherwise the numerically greatest version.
    pub fn gene_panel(
        &self,
        panel_name: &str,
        version: Option<f64>,
    ) -> Result<Option<Panel>, PanelError> {
        if let Some(version) = version {
            return Ok(self
                .store
                .find_one(&PanelFilter::by_name_version(panel_name, version))?);
        }
        let latest = self
            .store
            .find(&PanelFilter::by_name(panel_name))?
            .max_by(|a, b| a.version.total_cmp(&b.version));
        Ok(latest)
    }

    /// `version` only narrows the result when `panel_name` is given.
    pub fn gene_panels(
        &self,
        panel_name: Option<&str>,
        institute_id: Option<&str>,
        version: Option<f64>,
        include_hidden: bool,
    ) -> Result<crate::store::Cursor<'_>, PanelError> {
        Ok(self.store.find(&list_filter(
            panel_name,
            institute_id,
            version,
            include_hidden,
        ))?)
    }

    pub fn delete_panel(&self, panel: &Panel) -> Result<u64, PanelError> {
        let Some(id) = &panel.id else {
            return Ok(0);
        };
        let deleted = self.store.delete_one(&PanelFilter::by_id(id))?;
        self.emit(RepoEvent::PanelDeleted {
            panel_name: panel.panel_name.clone(),
            version: panel.version,
            deleted,
        });
        Ok(deleted)
    }

    /// Latest version of every panel name owned by the institute.
    pub fn latest_panels(
        &self,
        institute_id: &str,
        include_hidden: bool,
    ) -> Result<impl Iterator<Item = Result<Panel, PanelError>> + '_, PanelError> {
        let names = self.store.distinct_names(&list_filter(
            None,
            Some(institute_id),
            None,
            include_hidden,
        ))?;
        Ok(names
            .into_iter()
            .filter_map(move |name| self.gene_panel(&name, None).transpose()))
    }

    /// Applies one of three exclusive changes: new version, new maintainers, or a new date.
    pub fn update_panel(
        &self,
        panel: &Panel,
        version: Option<f64>,
        date: Option<DateTime<Utc>>,
        maintainer: Option<Vec<String>>,
    ) -> Result<Option<Panel>, PanelError> {
        let id = require_id(panel)?;
        if let Some(version) = version {
            check_version(&panel.panel_name, version)?;
            let taken = self
                .store
                .find_one(&PanelFilter::by_name_version(&panel.panel_name, version))?
                .is_some_and(|other| other.id.as_ref() != Some(&id));
            if taken {
                return Err(PanelError::DuplicateVersion {
                    panel_name: panel.panel_name.clone(),
                    version,
                });
            }
        }
        let mut updated = panel.clone();
        let change = if let Some(version) = version {
            updated.version = version;
            if let Some(date) = date {
                updated.date = date;
            }
            PanelChange::Version {
                from: panel.version,
                to: version,
            }
        } else if let Some(maintainer) = maintainer {
            updated.maintainer = maintainer.clone();
            PanelChange::Maintainer {
                from: panel.maintainer.clone(),
                to: maintainer,
            }
        } else {
            updated.date = date.unwrap_or_else(Utc::now);
            PanelChange::Date
        };

        let stored = self
            .store
            .find_one_and_replace(&PanelFilter::by_id(&id), updated)?;
        if stored.is_some() {
            self.emit(RepoEvent::PanelUpdated {
                panel_name: panel.panel_name.clone(),
                change,
            });
        }
        Ok(stored)
    }

    /// Stages a change; identical changes are kept once.
    pub fn add_pending(
        &self,
        panel: &Panel,
        gene: &HgncGene,
        action: &str,
        info: Option<GeneInfo>,
    ) -> Result<Option<Panel>, PanelError> {
        let action: PendingAction = action.parse()?;
        let id = require_id(panel)?;
        let change = PendingChange::new(gene, action, info.unwrap_or_default());
        let updated = self
            .store
            .find_one_and_update(&PanelFilter::by_id(&id), &PanelUpdate::AddPending(change))?;
        if updated.is_some() {
            self.emit(RepoEvent::PendingStaged {
                panel_name: panel.panel_name.clone(),
                hgnc_id: gene.hgnc_id,
                action: action.to_string(),
            });
        }
        Ok(updated)
    }

    pub fn reset_pending(&self, panel: &Panel) -> Result<Option<Panel>, PanelError> {
        let id = require_id(panel)?;
        let mut cleared = panel.clone();
        cleared.pending = None;
        let updated = self
            .store
            .find_one_and_replace(&PanelFilter::by_id(&id), cleared)?;
        if updated.is_some() {
            self.emit(RepoEvent::PendingReset {
                panel_name: panel.panel_name.clone(),
            });
        }
        Ok(updated)
    }
}

fn list_filter(
    panel_name: Option<&str>,
    institute_id: Option<&str>,
    version: Option<f64>,
    include_hidden: bool,
) -> PanelFilter {
    let mut filter = PanelFilter::all();
    if let Some(name) = panel_name {
        filter.panel_name = Some(name.to_string());
        filter.version = version;
    }
    if let Some(institute) = institute_id {
        filter.institute = Some(institute.to_string());
    }
    filter.exclude_hidden = !include_hidden;
    filter
}

/// Stored versions are positive and finite.
pub(crate) fn check_version(panel_name: &str, version: f64) -> Result<(), PanelError> {
    if version.is_finite() && version > 0.0 {
        Ok(())
    } else {
        Err(PanelError::InvalidVersion {
            panel_name: panel_name.to_string(),
            version,
        })
    }
}

pub(crate) fn require_id(panel: &Panel) -> Result<DocumentId, PanelError> {
    panel
        .id
        .clone()
        .ok_or_else(|| PanelError::MissingIdentity(panel.label()))
}

#[cfg(test)]
#[path = "../../tests/src_inline/repo/mod.rs"]
mod tests;
