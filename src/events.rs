use std::sync::Mutex;

use tracing::{debug, error, info, warn};

/// Outcome worth reporting from a repository operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoEvent {
    PanelInserted {
        panel_name: String,
        version: f64,
        genes: usize,
    },
    PanelReplaced {
        panel_name: String,
        version: f64,
    },
    PanelDeleted {
        panel_name: String,
        version: f64,
        deleted: u64,
    },
    PanelUpdated {
        panel_name: String,
        change: PanelChange,
    },
    PanelArchived {
        panel_name: String,
        version: f64,
    },
    PendingStaged {
        panel_name: String,
        hgnc_id: u32,
        action: String,
    },
    PendingReset {
        panel_name: String,
    },
    PendingApplied {
        panel_name: String,
        from_version: f64,
        to_version: f64,
        genes: usize,
        in_place: bool,
    },
    InvalidIdentity {
        raw: String,
        reason: String,
    },
    CasePanelMissing {
        panel_name: String,
        version: f64,
    },
    OmimMissing {
        panel_name: String,
    },
    OmimUnchanged {
        panel_name: String,
        reason: OmimSkip,
    },
    OmimVersioned {
        panel_name: String,
        version: f64,
        new_genes: usize,
        genes: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelChange {
    Version { from: f64, to: f64 },
    Maintainer { from: Vec<String>, to: Vec<String> },
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmimSkip {
    SameReleaseDate,
    NoNewGenes,
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: RepoEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: RepoEvent) {
        match event {
            RepoEvent::PanelInserted {
                panel_name,
                version,
                genes,
            } => info!(%panel_name, version, genes, "panel saved"),
            RepoEvent::PanelReplaced {
                panel_name,
                version,
            } => warn!(
                %panel_name,
                version, "panel version already existed; replaced with new data"
            ),
            RepoEvent::PanelDeleted {
                panel_name,
                version,
                deleted,
            } => warn!(%panel_name, version, deleted, "deleting panel"),
            RepoEvent::PanelUpdated { panel_name, change } => match change {
                PanelChange::Version { from, to } => {
                    info!(%panel_name, from, to, "updated panel version")
                }
                PanelChange::Maintainer { from, to } => {
                    info!(%panel_name, ?from, ?to, "updated panel maintainer")
                }
                PanelChange::Date => info!(%panel_name, "updated panel date"),
            },
            RepoEvent::PanelArchived {
                panel_name,
                version,
            } => info!(%panel_name, version, "archived panel"),
            RepoEvent::PendingStaged {
                panel_name,
                hgnc_id,
                action,
            } => debug!(%panel_name, hgnc_id, %action, "staged pending change"),
            RepoEvent::PendingReset { panel_name } => {
                info!(%panel_name, "cleared pending changes")
            }
            RepoEvent::PendingApplied {
                panel_name,
                from_version,
                to_version,
                genes,
                in_place,
            } => info!(
                %panel_name,
                from_version, to_version, genes, in_place, "applied pending changes"
            ),
            RepoEvent::InvalidIdentity { raw, reason } => {
                error!(%raw, %reason, "invalid panel id received")
            }
            RepoEvent::CasePanelMissing {
                panel_name,
                version,
            } => warn!(%panel_name, version, "panel version does not exist in database"),
            RepoEvent::OmimMissing { panel_name } => {
                warn!(%panel_name, "panel does not exist in database; creating it")
            }
            RepoEvent::OmimUnchanged { panel_name, reason } => match reason {
                OmimSkip::SameReleaseDate => {
                    warn!(%panel_name, "there is no new version of OMIM")
                }
                OmimSkip::NoNewGenes => info!(
                    %panel_name,
                    "new OMIM release does not differ from the stored one; no update added"
                ),
            },
            RepoEvent::OmimVersioned {
                panel_name,
                version,
                new_genes,
                genes,
            } => info!(%panel_name, version, new_genes, genes, "stamped OMIM gene versions"),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RepoEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RepoEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn take(&self) -> Vec<RepoEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: RepoEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/events.rs"]
mod tests;
