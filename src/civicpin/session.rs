//! The session identity: a stable opaque id recorded as `created_by` on every
//! issue this user reports, and checked when they try to delete one.

use crate::error::{CivicError, Result};
use std::fs;
use std::path::Path;
use uuid::Uuid;

const SESSION_FILENAME: &str = "session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    id: String,
}

impl SessionIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Read the id persisted in `dir`, minting and saving a fresh one on
    /// first use.
    pub fn load_or_create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let path = dir.join(SESSION_FILENAME);

        if path.exists() {
            let stored = fs::read_to_string(&path).map_err(CivicError::Io)?;
            let stored = stored.trim();
            if !stored.is_empty() {
                return Ok(Self::new(stored));
            }
        }

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(CivicError::Io)?;
        }
        let id = Uuid::new_v4().to_string();
        fs::write(&path, &id).map_err(CivicError::Io)?;
        Ok(Self { id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}
