use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Issue, NewIssue};
use crate::store::DataStore;
use tracing::warn;
use uuid::Uuid;

/// File a new issue on behalf of `reporter`.
///
/// Validation happens before anything is written. A photo is stored under a
/// name derived from the new id; if the collection cannot be saved afterwards
/// the photo is removed again.
pub fn run<S: DataStore>(store: &mut S, draft: &NewIssue, reporter: &str) -> Result<CmdResult> {
    draft.validate()?;

    let mut issues = store.load_all()?;
    let mut issue = Issue::new(draft, reporter);
    while issues.iter().any(|existing| existing.id == issue.id) {
        issue.id = Uuid::new_v4();
    }

    if let Some(photo) = &draft.photo {
        let handle = store.store_photo(&photo.stored_name(&issue.id), &photo.bytes)?;
        issue.image_path = Some(handle);
    }

    issues.push(issue.clone());
    if let Err(e) = store.save_all(&issues) {
        if let Some(handle) = &issue.image_path {
            if let Err(cleanup) = store.remove_photo(handle) {
                warn!(handle = %handle, error = %cleanup, "could not remove photo of unsaved issue");
            }
        }
        return Err(e);
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Issue submitted: {}",
        issue.title
    )));
    result.affected_issues.push(issue);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CivicError;
    use crate::model::{Category, Coordinates, PhotoUpload, Status};
    use crate::store::InMemoryStore;

    fn pothole() -> NewIssue {
        NewIssue::new("Pothole on Main St", "Large pothole", Category::Roads)
            .with_location(Coordinates::new(12.97, 77.59))
    }

    #[test]
    fn creates_open_issue_with_seed_update() {
        let mut store = InMemoryStore::in_memory();
        let result = run(&mut store, &pothole(), "user-7").unwrap();

        let issue = &result.affected_issues[0];
        assert_eq!(issue.category, Category::Roads);
        assert_eq!(issue.status, Status::Open);
        assert_eq!(issue.votes, 0);
        assert_eq!(issue.updates.len(), 1);
        assert_eq!(issue.created_by, "user-7");

        let stored = store.load_all().unwrap();
        assert_eq!(stored, vec![issue.clone()]);
    }

    #[test]
    fn ids_are_unique_across_the_collection() {
        let mut store = InMemoryStore::in_memory();
        for _ in 0..5 {
            run(&mut store, &pothole(), "user-7").unwrap();
        }
        let issues = store.load_all().unwrap();
        let mut ids: Vec<_> = issues.iter().map(|i| i.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn rejects_blank_title_without_side_effects() {
        let mut store = InMemoryStore::in_memory();
        run(&mut store, &pothole(), "user-7").unwrap();
        let before = store.backend().raw_collection();

        let draft = NewIssue::new("   ", "Large pothole", Category::Roads);
        let result = run(&mut store, &draft, "user-7");

        assert!(matches!(result, Err(CivicError::Validation(_))));
        assert_eq!(store.backend().raw_collection(), before);
        assert_eq!(store.backend().write_count(), 1);
    }

    #[test]
    fn rejects_blank_description() {
        let mut store = InMemoryStore::in_memory();
        let draft = NewIssue::new("Pothole", "\n", Category::Roads);
        assert!(matches!(
            run(&mut store, &draft, "user-7"),
            Err(CivicError::Validation(_))
        ));
        assert!(store.backend().raw_collection().is_none());
    }

    #[test]
    fn stores_photo_under_id_derived_name() {
        let mut store = InMemoryStore::in_memory();
        let draft = pothole().with_photo(PhotoUpload::new("IMG_0042.png", vec![1, 2, 3]));
        let result = run(&mut store, &draft, "user-7").unwrap();

        let issue = &result.affected_issues[0];
        let handle = issue.image_path.clone().unwrap();
        assert_eq!(handle, format!("uploads/{}.png", issue.id));
        assert_eq!(store.backend().photo(&handle), Some(vec![1, 2, 3]));
    }

    #[test]
    fn failed_save_is_reported() {
        let mut store = InMemoryStore::in_memory();
        store.backend().set_simulate_write_error(true);

        let result = run(&mut store, &pothole(), "user-7");
        assert!(matches!(result, Err(CivicError::StorageUnavailable(_))));
        assert!(store.load_all().unwrap().is_empty());
    }
}
