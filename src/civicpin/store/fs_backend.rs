use super::backend::StorageBackend;
use crate::error::{CivicError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DATA_FILE: &str = "issues.json";
pub const UPLOAD_DIR: &str = "uploads";

/// Filesystem backend: one JSON file for the collection, one directory of
/// photo blobs next to it.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(unavailable)?;
        }
        Ok(())
    }

    /// Write `bytes` next to `target` and rename over it.
    fn atomic_write(&self, dir: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
        let tmp_file = dir.join(format!(".civicpin-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, bytes).map_err(unavailable)?;
        if let Err(e) = fs::rename(&tmp_file, target) {
            let _ = fs::remove_file(&tmp_file);
            return Err(unavailable(e));
        }
        Ok(())
    }
}

fn unavailable(e: std::io::Error) -> CivicError {
    CivicError::StorageUnavailable(e.to_string())
}

impl StorageBackend for FsBackend {
    fn read_collection(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.data_file()) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CivicError::StorageCorrupt(e.to_string())),
        }
    }

    fn write_collection(&self, data: &str) -> Result<()> {
        self.ensure_dir(&self.root)?;
        self.atomic_write(&self.root, &self.data_file(), data.as_bytes())
    }

    fn write_photo(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let upload_dir = self.root.join(UPLOAD_DIR);
        self.ensure_dir(&upload_dir)?;
        self.atomic_write(&upload_dir, &upload_dir.join(name), bytes)?;
        Ok(format!("{}/{}", UPLOAD_DIR, name))
    }

    fn delete_photo(&self, handle: &str) -> Result<()> {
        let path = self.photo_path(handle);
        if path.exists() {
            fs::remove_file(path).map_err(CivicError::Io)?;
        }
        Ok(())
    }

    fn photo_path(&self, handle: &str) -> PathBuf {
        // Absolute handles pass through unchanged.
        self.root.join(handle)
    }
}
