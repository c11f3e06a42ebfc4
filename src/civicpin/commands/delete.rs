use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CivicError, Result};
use crate::store::DataStore;
use tracing::warn;
use uuid::Uuid;

use super::helpers::position_of;

/// Remove an issue. Only the session that reported it may do so; anyone else
/// gets `NotOwner` and the collection stays as it was.
pub fn run<S: DataStore>(store: &mut S, id: &Uuid, requester: &str) -> Result<CmdResult> {
    let mut issues = store.load_all()?;
    let pos = position_of(&issues, id)?;
    if !issues[pos].is_owned_by(requester) {
        return Err(CivicError::NotOwner(*id));
    }

    let issue = issues.remove(pos);
    store.save_all(&issues)?;

    let mut result = CmdResult::default();
    if let Some(handle) = &issue.image_path {
        if let Err(e) = store.remove_photo(handle) {
            warn!(handle = %handle, error = %e, "could not remove photo of deleted issue");
            result.add_message(CmdMessage::warning(format!(
                "Photo {} could not be removed",
                handle
            )));
        }
    }
    result.add_message(CmdMessage::success(format!(
        "Issue deleted: {}",
        issue.title
    )));
    result.affected_issues.push(issue);
    Ok(result)
}
