use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::geocode::{GeocodeCache, Geocoder};
use crate::model::{Coordinates, Issue};
use crate::store::DataStore;
use tracing::{debug, warn};
use uuid::Uuid;

use super::helpers::position_of;

/// Set coordinates on an issue that has none. An issue that is already
/// located is left alone and nothing is written; its stored state comes back
/// in `listed_issues`.
pub fn run<S: DataStore>(store: &mut S, id: &Uuid, coords: Coordinates) -> Result<CmdResult> {
    let mut issues = store.load_all()?;
    let pos = position_of(&issues, id)?;

    let mut result = CmdResult::default();
    if issues[pos].coordinates().is_some() {
        debug!(id = %id, "issue already located, skipping backfill");
        result.add_message(CmdMessage::info(format!(
            "Already located: {}",
            issues[pos].title
        )));
        result.listed_issues.push(issues.swap_remove(pos));
        return Ok(result);
    }

    issues[pos].set_coordinates(coords);
    store.save_all(&issues)?;

    let issue = issues.swap_remove(pos);
    result.add_message(CmdMessage::success(format!(
        "Located {} at {}",
        issue.title, coords
    )));
    result.affected_issues.push(issue);
    Ok(result)
}

/// Geocode every issue in `issues` that has an address but no position and
/// persist each hit. Listed issues are refreshed from what the store holds
/// afterwards. Returns how many issues gained coordinates.
///
/// Failures are logged and skipped: a listing never fails because of
/// enrichment.
pub fn fill_missing<S, G>(store: &mut S, cache: &mut GeocodeCache<G>, issues: &mut [Issue]) -> usize
where
    S: DataStore,
    G: Geocoder,
{
    let mut filled = 0;
    for issue in issues.iter_mut().filter(|issue| issue.needs_geocoding()) {
        let Some(coords) = cache.resolve(&issue.address) else {
            continue;
        };
        match run(store, &issue.id, coords) {
            Ok(result) => {
                if let Some(located) = result.affected_issues.into_iter().next() {
                    *issue = located;
                    filled += 1;
                } else if let Some(stored) = result.listed_issues.into_iter().next() {
                    *issue = stored;
                }
            }
            Err(e) => warn!(id = %issue.id, error = %e, "could not persist geocoded coordinates"),
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::error::CivicError;
    use crate::model::{Category, NewIssue};
    use crate::store::InMemoryStore;
    use crate::test_utils::{FailingGeocoder, FakeGeocoder};

    fn unlocated(store: &mut InMemoryStore, address: &str) -> Uuid {
        let draft = NewIssue::new("Flooded underpass", "Knee deep", Category::Water)
            .with_address(address);
        create::run(store, &draft, "u1").unwrap().affected_issues[0].id
    }

    #[test]
    fn sets_missing_coordinates_only() {
        let mut store = InMemoryStore::in_memory();
        let id = unlocated(&mut store, "Silk Board");
        let before = store.load_all().unwrap()[0].clone();

        run(&mut store, &id, Coordinates::new(12.91, 77.62)).unwrap();

        let after = store.load_all().unwrap()[0].clone();
        assert_eq!(after.coordinates(), Some(Coordinates::new(12.91, 77.62)));
        let mut expected = before;
        expected.set_coordinates(Coordinates::new(12.91, 77.62));
        assert_eq!(after, expected);
    }

    #[test]
    fn located_issue_is_not_overwritten() {
        let mut store = InMemoryStore::in_memory();
        let draft = NewIssue::new("Pothole", "Deep", Category::Roads)
            .with_location(Coordinates::new(12.97, 77.59));
        let id = create::run(&mut store, &draft, "u1").unwrap().affected_issues[0].id;
        let writes = store.backend().write_count();

        let result = run(&mut store, &id, Coordinates::new(1.0, 1.0)).unwrap();

        assert!(result.affected_issues.is_empty());
        assert_eq!(store.backend().write_count(), writes);
        assert_eq!(
            store.load_all().unwrap()[0].coordinates(),
            Some(Coordinates::new(12.97, 77.59))
        );
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = InMemoryStore::in_memory();
        assert!(matches!(
            run(&mut store, &Uuid::new_v4(), Coordinates::new(1.0, 1.0)),
            Err(CivicError::NotFound(_))
        ));
    }

    #[test]
    fn fill_missing_geocodes_and_persists() {
        let mut store = InMemoryStore::in_memory();
        unlocated(&mut store, "Silk Board");
        unlocated(&mut store, "Atlantis");
        let mut cache =
            GeocodeCache::new(FakeGeocoder::new().with("Silk Board", Coordinates::new(12.91, 77.62)));

        let mut issues = store.load_all().unwrap();
        let filled = fill_missing(&mut store, &mut cache, &mut issues);

        assert_eq!(filled, 1);
        assert_eq!(issues[0].coordinates(), Some(Coordinates::new(12.91, 77.62)));
        assert!(issues[1].coordinates().is_none());
        assert_eq!(store.load_all().unwrap(), issues);
    }

    #[test]
    fn fill_missing_survives_geocoder_failure() {
        let mut store = InMemoryStore::in_memory();
        unlocated(&mut store, "Silk Board");
        let writes = store.backend().write_count();
        let mut cache = GeocodeCache::new(FailingGeocoder::default());

        let mut issues = store.load_all().unwrap();
        assert_eq!(fill_missing(&mut store, &mut cache, &mut issues), 0);
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn fill_missing_leaves_issue_unlocated_when_save_fails() {
        let mut store = InMemoryStore::in_memory();
        unlocated(&mut store, "Silk Board");
        let mut cache =
            GeocodeCache::new(FakeGeocoder::new().with("Silk Board", Coordinates::new(12.91, 77.62)));
        store.backend().set_simulate_write_error(true);

        let mut issues = store.load_all().unwrap();
        assert_eq!(fill_missing(&mut store, &mut cache, &mut issues), 0);
        assert!(issues[0].coordinates().is_none());
        assert!(store.load_all().unwrap()[0].coordinates().is_none());
    }

    #[test]
    fn fill_missing_defers_to_coordinates_stored_since_listing() {
        let mut store = InMemoryStore::in_memory();
        let id = unlocated(&mut store, "Silk Board");
        let mut cache =
            GeocodeCache::new(FakeGeocoder::new().with("Silk Board", Coordinates::new(12.91, 77.62)));

        let mut listing = store.load_all().unwrap();
        run(&mut store, &id, Coordinates::new(1.5, 1.5)).unwrap();
        let writes = store.backend().write_count();

        let filled = fill_missing(&mut store, &mut cache, &mut listing);

        assert_eq!(filled, 0);
        assert_eq!(store.backend().write_count(), writes);
        assert_eq!(listing[0].coordinates(), Some(Coordinates::new(1.5, 1.5)));
        assert_eq!(
            store.load_all().unwrap()[0].coordinates(),
            Some(Coordinates::new(1.5, 1.5))
        );
    }
}
