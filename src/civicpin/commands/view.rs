use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DataStore;
use uuid::Uuid;

use super::helpers::position_of;

pub fn run<S: DataStore>(store: &S, id: &Uuid) -> Result<CmdResult> {
    let mut issues = store.load_all()?;
    let pos = position_of(&issues, id)?;
    Ok(CmdResult::default().with_listed_issues(vec![issues.swap_remove(pos)]))
}
