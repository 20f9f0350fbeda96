use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{DocumentId, Panel};
use crate::store::{Cursor, PanelFilter, PanelStore, PanelUpdate, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Panel>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with documents that already carry an identity.
    pub fn from_documents(docs: Vec<Panel>) -> Self {
        let docs = docs
            .into_iter()
            .map(|mut doc| {
                doc.id.get_or_insert_with(DocumentId::generate);
                doc
            })
            .collect();
        Self {
            docs: RwLock::new(docs),
        }
    }

    pub fn snapshot(&self) -> Result<Vec<Panel>, StoreError> {
        Ok(self.read()?.clone())
    }

    /// Swaps the whole collection in one lock acquisition.
    pub fn replace_all(&self, docs: Vec<Panel>) -> Result<(), StoreError> {
        *self.write()? = docs;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Panel>>, StoreError> {
        self.docs.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Panel>>, StoreError> {
        self.docs.write().map_err(|_| StoreError::Poisoned)
    }
}

impl PanelStore for MemoryStore {
    fn find_one(&self, filter: &PanelFilter) -> Result<Option<Panel>, StoreError> {
        let docs = self.read()?;
        Ok(docs.iter().find(|doc| filter.matches(doc)).cloned())
    }

    fn find(&self, filter: &PanelFilter) -> Result<Cursor<'_>, StoreError> {
        let matched: Vec<Panel> = self
            .read()?
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();
        Ok(Box::new(matched.into_iter()))
    }

    fn insert_one(&self, mut panel: Panel) -> Result<DocumentId, StoreError> {
        let mut docs = self.write()?;
        let id = match panel.id.take() {
            Some(id) if docs.iter().any(|doc| doc.id.as_ref() == Some(&id)) => {
                return Err(StoreError::DuplicateKey(id));
            }
            Some(id) => id,
            None => DocumentId::generate(),
        };
        panel.id = Some(id.clone());
        docs.push(panel);
        Ok(id)
    }

    fn delete_one(&self, filter: &PanelFilter) -> Result<u64, StoreError> {
        let mut docs = self.write()?;
        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(idx) => {
                docs.remove(idx);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn find_one_and_replace(
        &self,
        filter: &PanelFilter,
        mut panel: Panel,
    ) -> Result<Option<Panel>, StoreError> {
        let mut docs = self.write()?;
        let Some(slot) = docs.iter_mut().find(|doc| filter.matches(doc)) else {
            return Ok(None);
        };
        panel.id = slot.id.clone();
        *slot = panel;
        Ok(Some(slot.clone()))
    }

    fn find_one_and_update(
        &self,
        filter: &PanelFilter,
        update: &PanelUpdate,
    ) -> Result<Option<Panel>, StoreError> {
        let mut docs = self.write()?;
        let Some(slot) = docs.iter_mut().find(|doc| filter.matches(doc)) else {
            return Ok(None);
        };
        update.apply(slot);
        Ok(Some(slot.clone()))
    }

    fn distinct_names(&self, filter: &PanelFilter) -> Result<Vec<String>, StoreError> {
        let docs = self.read()?;
        let mut names: Vec<String> = Vec::new();
        for doc in docs.iter().filter(|doc| filter.matches(doc)) {
            if !names.contains(&doc.panel_name) {
                names.push(doc.panel_name.clone());
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/store/memory.rs"]
mod tests;
