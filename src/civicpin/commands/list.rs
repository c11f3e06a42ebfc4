use crate::commands::CmdResult;
use crate::error::Result;
use crate::filter::{filter, sort_for_display, IssueFilter};
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &S, criteria: &IssueFilter) -> Result<CmdResult> {
    let issues = store.load_all()?;
    let mut listed = filter(&issues, criteria);
    sort_for_display(&mut listed);
    Ok(CmdResult::default().with_listed_issues(listed))
}
