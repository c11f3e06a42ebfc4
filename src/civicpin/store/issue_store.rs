use super::backend::StorageBackend;
use super::fs_backend::FsBackend;
use super::mem_backend::MemBackend;
use super::DataStore;
use crate::error::{CivicError, Result};
use crate::model::Issue;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct IssueStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> IssueStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Strict load: surfaces `StorageCorrupt` instead of hiding it.
    pub fn try_load(&self) -> Result<Vec<Issue>> {
        let raw = match self.backend.read_collection()? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| CivicError::StorageCorrupt(e.to_string()))
    }
}

impl IssueStore<FsBackend> {
    /// File store rooted at `root`.
    pub fn open(root: PathBuf) -> Self {
        Self::with_backend(FsBackend::new(root))
    }
}

impl IssueStore<MemBackend> {
    pub fn in_memory() -> Self {
        Self::with_backend(MemBackend::new())
    }
}

impl<B: StorageBackend> DataStore for IssueStore<B> {
    fn load_all(&self) -> Result<Vec<Issue>> {
        match self.try_load() {
            Err(CivicError::StorageCorrupt(reason)) => {
                warn!(%reason, "issue collection is unreadable, treating it as empty");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn save_all(&mut self, issues: &[Issue]) -> Result<()> {
        let content = serde_json::to_string_pretty(issues)?;
        self.backend.write_collection(&content)?;
        debug!(count = issues.len(), "saved issue collection");
        Ok(())
    }

    fn store_photo(&mut self, name: &str, bytes: &[u8]) -> Result<String> {
        self.backend.write_photo(name, bytes)
    }

    fn remove_photo(&mut self, handle: &str) -> Result<()> {
        self.backend.delete_photo(handle)
    }

    fn photo_path(&self, handle: &str) -> PathBuf {
        self.backend.photo_path(handle)
    }
}
