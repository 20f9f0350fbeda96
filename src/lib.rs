pub mod cli;
pub mod config;
pub mod events;
pub mod model;
pub mod panels;
pub mod repo;
pub mod report;
pub mod store;

pub mod prelude {
    pub use crate::events::{EventSink, RepoEvent, TracingSink};
    pub use crate::model::{GeneEntry, GeneInfo, HgncGene, Panel, PendingAction};
    pub use crate::repo::{PanelError, PanelRepository};
    pub use crate::store::{JsonFileStore, MemoryStore, PanelStore};
}
