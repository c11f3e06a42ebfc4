use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DataStore;
use uuid::Uuid;

use super::helpers::patch_issue;

pub fn run<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    let issue = patch_issue(store, id, |issue| issue.votes += 1)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Upvoted: {} ({} votes)",
        issue.title, issue.votes
    )));
    result.affected_issues.push(issue);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::error::CivicError;
    use crate::model::{Category, NewIssue};
    use crate::store::InMemoryStore;

    fn seeded() -> (InMemoryStore, Uuid, Uuid) {
        let mut store = InMemoryStore::in_memory();
        let a = create::run(&mut store, &NewIssue::new("A", "a", Category::Roads), "u1").unwrap();
        let b = create::run(&mut store, &NewIssue::new("B", "b", Category::Water), "u2").unwrap();
        (
            store,
            a.affected_issues[0].id,
            b.affected_issues[0].id,
        )
    }

    #[test]
    fn increments_by_exactly_one_and_touches_nothing_else() {
        let (mut store, a, b) = seeded();
        let before = store.load_all().unwrap();

        run(&mut store, &a).unwrap();

        let after = store.load_all().unwrap();
        let mut expected = before.clone();
        let pos = expected.iter().position(|i| i.id == a).unwrap();
        expected[pos].votes += 1;
        assert_eq!(after, expected);
        assert_eq!(after.iter().find(|i| i.id == b).unwrap().votes, 0);
    }

    #[test]
    fn sequential_upvotes_accumulate() {
        let (mut store, a, _) = seeded();
        run(&mut store, &a).unwrap();
        let result = run(&mut store, &a).unwrap();
        assert_eq!(result.affected_issues[0].votes, 2);

        for _ in 0..8 {
            run(&mut store, &a).unwrap();
        }
        let stored = store.load_all().unwrap();
        assert_eq!(stored.iter().find(|i| i.id == a).unwrap().votes, 10);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let (mut store, _, _) = seeded();
        let writes = store.backend().write_count();
        assert!(matches!(
            run(&mut store, &Uuid::new_v4()),
            Err(CivicError::NotFound(_))
        ));
        assert_eq!(store.backend().write_count(), writes);
    }
}
