//! # Storage Layer
//!
//! This module defines the storage abstraction for civicpin. The [`DataStore`]
//! trait is what the command layer talks to; the [`backend::StorageBackend`]
//! trait underneath it is raw I/O only.
//!
//! ## Snapshot, Patch, Overwrite
//!
//! The whole collection is the unit of persistence. Every mutation:
//!
//! 1. loads every issue,
//! 2. locates the target by id (ids are unique, first match wins),
//! 3. patches it in memory,
//! 4. writes the whole collection back.
//!
//! Writes are atomic (temp file + rename), so a reader never observes a torn
//! file. There is no locking and no revision check: two processes that both
//! load before either saves will lose one of the two changes. civicpin is a
//! single-user tool and accepts that.
//!
//! ## Tolerant Reads
//!
//! A collection that cannot be read or parsed is treated as empty (with a
//! warning in the log). Nothing is repaired or backed up; the next save
//! replaces the unreadable file.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── issues.json          # JSON array of issues
//! ├── config.json          # Settings
//! ├── session              # This user's opaque session id
//! └── uploads/
//!     └── {uuid}{ext}      # Photo attachments
//! ```
//!
//! ## Implementations
//!
//! - [`FileStore`]: `IssueStore` over [`fs_backend::FsBackend`].
//! - [`InMemoryStore`]: `IssueStore` over [`mem_backend::MemBackend`], for tests.

use crate::error::Result;
use crate::model::Issue;
use std::path::PathBuf;

pub mod backend;
pub mod fs_backend;
pub mod issue_store;
pub mod mem_backend;

pub use issue_store::IssueStore;

pub type FileStore = IssueStore<fs_backend::FsBackend>;
pub type InMemoryStore = IssueStore<mem_backend::MemBackend>;

/// Abstract interface for issue storage.
pub trait DataStore {
    /// Load every persisted issue. An unreadable collection loads as empty.
    fn load_all(&self) -> Result<Vec<Issue>>;

    /// Overwrite the whole persisted collection.
    fn save_all(&mut self, issues: &[Issue]) -> Result<()>;

    /// Persist a photo blob, returning the handle to keep on the issue.
    fn store_photo(&mut self, name: &str, bytes: &[u8]) -> Result<String>;

    /// Remove a photo blob by handle.
    fn remove_photo(&mut self, handle: &str) -> Result<()>;

    /// Location of a photo handle, for display.
    fn photo_path(&self, handle: &str) -> PathBuf;
}
