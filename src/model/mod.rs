pub mod dates;
pub mod ids;
pub mod panel;

pub use ids::{DocumentId, IdentityError};
pub use panel::{
    CasePanel, CaseRef, GeneEntry, GeneFormat, GeneInfo, HgncGene, InvalidActionError, Panel,
    PanelVersions, PendingAction, PendingChange, dedup_genes,
};
