use crate::error::{CivicError, Result};
use crate::model::Issue;
use crate::store::DataStore;
use uuid::Uuid;

/// Shortest id prefix accepted as a selector.
pub const MIN_PREFIX_LEN: usize = 4;

/// Position of the issue with `id`. Ids are unique, so the first match is
/// the only one.
pub fn position_of(issues: &[Issue], id: &Uuid) -> Result<usize> {
    issues
        .iter()
        .position(|issue| issue.id == *id)
        .ok_or(CivicError::NotFound(*id))
}

/// The snapshot-patch-overwrite primitive: load every issue, apply `patch`
/// to the one with `id`, save every issue. Nothing is written when the id
/// is unknown.
pub fn patch_issue<S, F>(store: &mut S, id: &Uuid, patch: F) -> Result<Issue>
where
    S: DataStore,
    F: FnOnce(&mut Issue),
{
    let mut issues = store.load_all()?;
    let pos = position_of(&issues, id)?;
    patch(&mut issues[pos]);
    store.save_all(&issues)?;
    Ok(issues.swap_remove(pos))
}

/// Resolve a user-typed selector (full id or unique id prefix) to an id.
pub fn resolve_selector<S: DataStore>(store: &S, selector: &str) -> Result<Uuid> {
    let issues = store.load_all()?;
    resolve_in(&issues, selector)
}

pub fn resolve_in(issues: &[Issue], selector: &str) -> Result<Uuid> {
    let selector = selector.trim().to_lowercase();

    if let Ok(id) = Uuid::parse_str(&selector) {
        position_of(issues, &id)?;
        return Ok(id);
    }

    if selector.len() < MIN_PREFIX_LEN {
        return Err(CivicError::Api(format!(
            "Id prefix '{}' is too short, use at least {} characters",
            selector, MIN_PREFIX_LEN
        )));
    }

    let matches: Vec<Uuid> = issues
        .iter()
        .filter(|issue| issue.id.to_string().starts_with(&selector))
        .map(|issue| issue.id)
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CivicError::Api(format!("No issue matches '{}'", selector))),
        many => Err(CivicError::Api(format!(
            "Id prefix '{}' is ambiguous ({} issues match)",
            selector,
            many.len()
        ))),
    }
}

/// First eight characters of an id, as shown in listings.
pub fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, NewIssue};
    use crate::store::InMemoryStore;

    fn issue_with_id(id: &str) -> Issue {
        let mut issue = Issue::new(&NewIssue::new("t", "d", Category::Other), "u");
        issue.id = Uuid::parse_str(id).unwrap();
        issue
    }

    #[test]
    fn resolves_full_id_and_unique_prefix() {
        let issues = vec![
            issue_with_id("aaaa1111-0000-4000-8000-000000000000"),
            issue_with_id("aaaa2222-0000-4000-8000-000000000000"),
        ];
        assert_eq!(
            resolve_in(&issues, "aaaa1111-0000-4000-8000-000000000000").unwrap(),
            issues[0].id
        );
        assert_eq!(resolve_in(&issues, "AAAA2").unwrap(), issues[1].id);
    }

    #[test]
    fn rejects_short_ambiguous_and_unknown_selectors() {
        let issues = vec![
            issue_with_id("aaaa1111-0000-4000-8000-000000000000"),
            issue_with_id("aaaa2222-0000-4000-8000-000000000000"),
        ];
        assert!(matches!(resolve_in(&issues, "aa"), Err(CivicError::Api(_))));
        assert!(matches!(resolve_in(&issues, "aaaa"), Err(CivicError::Api(_))));
        assert!(matches!(resolve_in(&issues, "bbbb"), Err(CivicError::Api(_))));
        assert!(matches!(
            resolve_in(&issues, "cccc1111-0000-4000-8000-000000000000"),
            Err(CivicError::NotFound(_))
        ));
    }

    #[test]
    fn patch_of_unknown_id_writes_nothing() {
        let mut store = InMemoryStore::in_memory();
        let result = patch_issue(&mut store, &Uuid::new_v4(), |issue| issue.votes += 1);

        assert!(matches!(result, Err(CivicError::NotFound(_))));
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn short_id_is_eight_chars() {
        let id = Uuid::parse_str("aaaa1111-0000-4000-8000-000000000000").unwrap();
        assert_eq!(short_id(&id), "aaaa1111");
    }
}
