use super::backend::StorageBackend;
use crate::error::{CivicError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since civicpin is single-threaded.
/// The collection is kept as serialized text so tolerant reads and
/// round-trips behave exactly as they do on disk.
#[derive(Default)]
pub struct MemBackend {
    collection: RefCell<Option<String>>,
    photos: RefCell<HashMap<String, Vec<u8>>>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Test helper to plant arbitrary collection text (e.g. corrupt JSON).
    pub fn set_raw_collection(&self, raw: &str) {
        *self.collection.borrow_mut() = Some(raw.to_string());
    }

    pub fn raw_collection(&self) -> Option<String> {
        self.collection.borrow().clone()
    }

    pub fn photo(&self, handle: &str) -> Option<Vec<u8>> {
        self.photos.borrow().get(handle).cloned()
    }

    /// Number of successful collection writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl StorageBackend for MemBackend {
    fn read_collection(&self) -> Result<Option<String>> {
        Ok(self.collection.borrow().clone())
    }

    fn write_collection(&self, data: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(CivicError::StorageUnavailable(
                "Simulated write error".to_string(),
            ));
        }
        *self.collection.borrow_mut() = Some(data.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn write_photo(&self, name: &str, bytes: &[u8]) -> Result<String> {
        if self.simulate_write_error.get() {
            return Err(CivicError::StorageUnavailable(
                "Simulated write error".to_string(),
            ));
        }
        let handle = format!("uploads/{}", name);
        self.photos
            .borrow_mut()
            .insert(handle.clone(), bytes.to_vec());
        Ok(handle)
    }

    fn delete_photo(&self, handle: &str) -> Result<()> {
        self.photos.borrow_mut().remove(handle);
        Ok(())
    }

    fn photo_path(&self, handle: &str) -> PathBuf {
        PathBuf::from(format!("memory://{}", handle))
    }
}
