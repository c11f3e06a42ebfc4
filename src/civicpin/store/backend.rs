use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while IssueStore handles the "what" (serialization, tolerant reads).
pub trait StorageBackend {
    // --- Collection Operations ---

    /// Read the persisted collection text.
    /// Returns Ok(None) when nothing has been persisted yet.
    /// Returns `StorageCorrupt` when something exists but cannot be read.
    fn read_collection(&self) -> Result<Option<String>>;

    /// Replace the persisted collection text.
    /// MUST be atomic (e.g. write to tmp then rename) so readers never see
    /// a partial write. Fails with `StorageUnavailable`.
    fn write_collection(&self, data: &str) -> Result<()>;

    // --- Photo Operations ---

    /// Store photo bytes under `name`, returning the handle kept on the issue.
    fn write_photo(&self, name: &str, bytes: &[u8]) -> Result<String>;

    /// Remove a stored photo. Missing photos are not an error.
    fn delete_photo(&self, handle: &str) -> Result<()>;

    /// Resolve a photo handle to a displayable location.
    fn photo_path(&self, handle: &str) -> PathBuf;
}
