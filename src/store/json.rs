use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::model::{DocumentId, Panel};
use crate::store::{Cursor, MemoryStore, PanelFilter, PanelStore, PanelUpdate, StoreError};

/// Panel collection persisted as a JSON array in a single file.
///
/// Reads are served from memory. A write runs against a scratch copy, the
/// copy is written through a temporary sibling and a rename, and only then
/// becomes the visible state.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    writer: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let docs: Vec<Panel> = if path.is_file() {
            let text = fs::read_to_string(path)?;
            if text.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), documents = docs.len(), "opened panel store");
        Ok(Self {
            path: path.to_path_buf(),
            inner: MemoryStore::from_documents(docs),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    /// Applies `op` to a copy of the collection; when `changed` says so, the
    /// copy is persisted and then committed.
    fn write<T>(
        &self,
        op: impl FnOnce(&MemoryStore) -> Result<T, StoreError>,
        changed: impl FnOnce(&T) -> bool,
    ) -> Result<T, StoreError> {
        let _guard = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        let scratch = MemoryStore::from_documents(self.inner.snapshot()?);
        let out = op(&scratch)?;
        if changed(&out) {
            let docs = scratch.snapshot()?;
            self.persist(&docs)?;
            self.inner.replace_all(docs)?;
        }
        Ok(out)
    }

    fn persist(&self, docs: &[Panel]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(docs)?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.tmp_path();
        let written = write_synced(&tmp, &json).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(err) = written {
            let _ = fs::remove_file(&tmp);
            warn!(path = %self.path.display(), error = %err, "panel store write failed");
            return Err(err.into());
        }
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl PanelStore for JsonFileStore {
    fn find_one(&self, filter: &PanelFilter) -> Result<Option<Panel>, StoreError> {
        self.inner.find_one(filter)
    }

    fn find(&self, filter: &PanelFilter) -> Result<Cursor<'_>, StoreError> {
        self.inner.find(filter)
    }

    fn insert_one(&self, panel: Panel) -> Result<DocumentId, StoreError> {
        self.write(|docs| docs.insert_one(panel), |_| true)
    }

    fn delete_one(&self, filter: &PanelFilter) -> Result<u64, StoreError> {
        self.write(|docs| docs.delete_one(filter), |deleted| *deleted > 0)
    }

    fn find_one_and_replace(
        &self,
        filter: &PanelFilter,
        panel: Panel,
    ) -> Result<Option<Panel>, StoreError> {
        self.write(
            |docs| docs.find_one_and_replace(filter, panel),
            Option::is_some,
        )
    }

    fn find_one_and_update(
        &self,
        filter: &PanelFilter,
        update: &PanelUpdate,
    ) -> Result<Option<Panel>, StoreError> {
        self.write(
            |docs| docs.find_one_and_update(filter, update),
            Option::is_some,
        )
    }

    fn distinct_names(&self, filter: &PanelFilter) -> Result<Vec<String>, StoreError> {
        self.inner.distinct_names(filter)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/store/json.rs"]
mod tests;
