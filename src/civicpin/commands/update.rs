use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Status, UpdateEntry};
use crate::store::DataStore;
use uuid::Uuid;

use super::helpers::patch_issue;

pub const IN_PROGRESS_TEXT: &str = "Marked in progress";
pub const RESOLVED_TEXT: &str = "Marked resolved";

/// Append an entry to the update log. With `status`, the issue moves to it;
/// without, the entry records the status the issue already has. Any
/// transition is accepted, including reopening a resolved issue.
pub fn run<S: DataStore>(
    store: &mut S,
    id: &Uuid,
    text: &str,
    status: Option<Status>,
) -> Result<CmdResult> {
    let issue = patch_issue(store, id, |issue| {
        let entry_status = status.unwrap_or(issue.status);
        issue.updates.push(UpdateEntry::new(text, entry_status));
        if let Some(new_status) = status {
            issue.status = new_status;
        }
    })?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated ({}): {}",
        issue.status.label(),
        issue.title
    )));
    result.affected_issues.push(issue);
    Ok(result)
}

pub fn mark_in_progress<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    run(store, id, IN_PROGRESS_TEXT, Some(Status::InProgress))
}

pub fn resolve<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    run(store, id, RESOLVED_TEXT, Some(Status::Resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::error::CivicError;
    use crate::model::{Category, NewIssue};
    use crate::store::InMemoryStore;

    fn seeded() -> (InMemoryStore, Uuid) {
        let mut store = InMemoryStore::in_memory();
        let created = create::run(
            &mut store,
            &NewIssue::new("Pothole", "Deep", Category::Roads),
            "u1",
        )
        .unwrap();
        (store, created.affected_issues[0].id)
    }

    #[test]
    fn status_update_appends_and_moves_status() {
        let (mut store, id) = seeded();
        let result = run(&mut store, &id, "Crew dispatched", Some(Status::InProgress)).unwrap();

        let issue = &result.affected_issues[0];
        assert_eq!(issue.status, Status::InProgress);
        assert_eq!(issue.updates.len(), 2);
        assert_eq!(issue.updates[1].text, "Crew dispatched");
        assert_eq!(issue.updates[1].status, Status::InProgress);
        assert_eq!(store.load_all().unwrap()[0], *issue);
    }

    #[test]
    fn note_without_status_keeps_current_status() {
        let (mut store, id) = seeded();
        mark_in_progress(&mut store, &id).unwrap();

        let result = run(&mut store, &id, "Waiting on asphalt", None).unwrap();
        let issue = &result.affected_issues[0];
        assert_eq!(issue.status, Status::InProgress);
        assert_eq!(issue.updates.len(), 3);
        assert_eq!(issue.updates[2].status, Status::InProgress);
    }

    #[test]
    fn backward_transitions_are_allowed() {
        let (mut store, id) = seeded();
        resolve(&mut store, &id).unwrap();
        let result = run(&mut store, &id, "Reopened", Some(Status::Open)).unwrap();

        let issue = &result.affected_issues[0];
        assert_eq!(issue.status, Status::Open);
        let texts: Vec<&str> = issue.updates.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Issue reported", RESOLVED_TEXT, "Reopened"]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let (mut store, _) = seeded();
        assert!(matches!(
            resolve(&mut store, &Uuid::new_v4()),
            Err(CivicError::NotFound(_))
        ));
    }
}
