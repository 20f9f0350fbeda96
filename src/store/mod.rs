pub mod json;
pub mod memory;

use thiserror::Error;

use crate::model::{DocumentId, Panel, PendingChange};

pub use json::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate document identity: {0}")]
    DuplicateKey(DocumentId),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Pull-based, single-pass sequence of matching documents.
pub type Cursor<'a> = Box<dyn Iterator<Item = Panel> + Send + 'a>;

/// Conjunction of criteria; unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelFilter {
    pub id: Option<DocumentId>,
    pub ids: Option<Vec<DocumentId>>,
    pub panel_name: Option<String>,
    pub version: Option<f64>,
    pub institute: Option<String>,
    pub is_archived: Option<bool>,
    pub exclude_hidden: bool,
    pub hgnc_id: Option<u32>,
}

impl PanelFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: &DocumentId) -> Self {
        Self {
            id: Some(id.clone()),
            ..Self::default()
        }
    }

    pub fn by_ids(ids: Vec<DocumentId>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::default()
        }
    }

    pub fn by_name(panel_name: &str) -> Self {
        Self {
            panel_name: Some(panel_name.to_string()),
            ..Self::default()
        }
    }

    pub fn by_name_version(panel_name: &str, version: f64) -> Self {
        Self::by_name(panel_name).with_version(version)
    }

    pub fn containing_gene(hgnc_id: u32) -> Self {
        Self {
            hgnc_id: Some(hgnc_id),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: f64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_institute(mut self, institute: &str) -> Self {
        self.institute = Some(institute.to_string());
        self
    }

    pub fn with_archived(mut self, archived: bool) -> Self {
        self.is_archived = Some(archived);
        self
    }

    pub fn without_hidden(mut self) -> Self {
        self.exclude_hidden = true;
        self
    }

    pub fn matches(&self, panel: &Panel) -> bool {
        if let Some(id) = &self.id
            && panel.id.as_ref() != Some(id)
        {
            return false;
        }
        if let Some(ids) = &self.ids {
            match &panel.id {
                Some(id) if ids.contains(id) => {}
                _ => return false,
            }
        }
        if let Some(name) = &self.panel_name
            && panel.panel_name != *name
        {
            return false;
        }
        if let Some(version) = self.version
            && panel.version != version
        {
            return false;
        }
        if let Some(institute) = &self.institute
            && panel.institute != *institute
        {
            return false;
        }
        if let Some(archived) = self.is_archived
            && panel.is_archived != archived
        {
            return false;
        }
        if self.exclude_hidden && panel.is_hidden() {
            return false;
        }
        if let Some(hgnc_id) = self.hgnc_id
            && !panel.contains_gene(hgnc_id)
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelUpdate {
    /// Appends to `pending` unless an identical change is already staged.
    AddPending(PendingChange),
    SetArchived(bool),
}

impl PanelUpdate {
    pub fn apply(&self, panel: &mut Panel) {
        match self {
            PanelUpdate::AddPending(change) => {
                let pending = panel.pending.get_or_insert_with(Vec::new);
                if !pending.contains(change) {
                    pending.push(change.clone());
                }
            }
            PanelUpdate::SetArchived(archived) => panel.is_archived = *archived,
        }
    }
}

/// Document collection holding panel records.
///
/// Each call is atomic for the single document it touches; nothing spans
/// more than one document.
pub trait PanelStore: Send + Sync {
    fn find_one(&self, filter: &PanelFilter) -> Result<Option<Panel>, StoreError>;

    fn find(&self, filter: &PanelFilter) -> Result<Cursor<'_>, StoreError>;

    /// Inserts the document, generating an identity when it has none.
    fn insert_one(&self, panel: Panel) -> Result<DocumentId, StoreError>;

    /// Returns the number of removed documents (0 or 1).
    fn delete_one(&self, filter: &PanelFilter) -> Result<u64, StoreError>;

    /// Replaces the first match, keeping its identity. Returns the stored result.
    fn find_one_and_replace(
        &self,
        filter: &PanelFilter,
        panel: Panel,
    ) -> Result<Option<Panel>, StoreError>;

    fn find_one_and_update(
        &self,
        filter: &PanelFilter,
        update: &PanelUpdate,
    ) -> Result<Option<Panel>, StoreError>;

    /// Distinct panel names among matching documents, in first-seen order.
    fn distinct_names(&self, filter: &PanelFilter) -> Result<Vec<String>, StoreError>;
}

impl<T: PanelStore + ?Sized> PanelStore for std::sync::Arc<T> {
    fn find_one(&self, filter: &PanelFilter) -> Result<Option<Panel>, StoreError> {
        (**self).find_one(filter)
    }

    fn find(&self, filter: &PanelFilter) -> Result<Cursor<'_>, StoreError> {
        (**self).find(filter)
    }

    fn insert_one(&self, panel: Panel) -> Result<DocumentId, StoreError> {
        (**self).insert_one(panel)
    }

    fn delete_one(&self, filter: &PanelFilter) -> Result<u64, StoreError> {
        (**self).delete_one(filter)
    }

    fn find_one_and_replace(
        &self,
        filter: &PanelFilter,
        panel: Panel,
    ) -> Result<Option<Panel>, StoreError> {
        (**self).find_one_and_replace(filter, panel)
    }

    fn find_one_and_update(
        &self,
        filter: &PanelFilter,
        update: &PanelUpdate,
    ) -> Result<Option<Panel>, StoreError> {
        (**self).find_one_and_update(filter, update)
    }

    fn distinct_names(&self, filter: &PanelFilter) -> Result<Vec<String>, StoreError> {
        (**self).distinct_names(filter)
    }
}
