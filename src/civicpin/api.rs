//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for civicpin operations, whichever UI sits on top.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (id selectors are resolved to UUIDs here)
//! - **Applies lookup policy**: the geocoder is consulted when an issue is
//!   reported with an address, and while listing for issues that lack a
//!   position; the locator answers "where am I"
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! Lookups never fail an operation. When the geocoder or locator cannot
//! answer, the facade falls back to what it already has and adds a warning
//! message to the result.
//!
//! ## Generic Over Collaborators
//!
//! `CivicApi<S, G, L>` is generic over the store, the geocoder and the
//! locator:
//! - Production: `CivicApi<FileStore, NominatimGeocoder, IpApiLocator>`
//! - Testing: `CivicApi<InMemoryStore, FakeGeocoder, FakeLocator>`

use crate::commands;
use crate::error::Result;
use crate::filter::IssueFilter;
use crate::geocode::{GeocodeCache, Geocoder};
use crate::locate::Locator;
use crate::model::{Coordinates, NewIssue, Status};
use crate::store::DataStore;
use tracing::{info, warn};

/// The main API facade for civicpin operations.
pub struct CivicApi<S: DataStore, G: Geocoder, L: Locator> {
    store: S,
    geocoder: GeocodeCache<G>,
    locator: L,
    paths: commands::DataPaths,
}

impl<S: DataStore, G: Geocoder, L: Locator> CivicApi<S, G, L> {
    pub fn new(store: S, geocoder: G, locator: L, paths: commands::DataPaths) -> Self {
        Self {
            store,
            geocoder: GeocodeCache::new(geocoder),
            locator,
            paths,
        }
    }

    /// File a new issue. A non-empty address is geocoded first and, when
    /// that succeeds, its coordinates replace the ones in the draft.
    pub fn report_issue(
        &mut self,
        mut draft: NewIssue,
        reporter: &str,
    ) -> Result<commands::CmdResult> {
        draft.validate()?;

        let mut geocode_missed = false;
        if !draft.address.trim().is_empty() {
            match self.geocoder.resolve(&draft.address) {
                Some(coords) => draft.location = Some(coords),
                None => geocode_missed = true,
            }
        }

        let mut result = commands::create::run(&mut self.store, &draft, reporter)?;
        if geocode_missed {
            let fallback = if draft.location.is_some() {
                "Address could not be geocoded; using selected coordinates."
            } else {
                "Address could not be geocoded; the issue has no coordinates yet."
            };
            result.add_message(commands::CmdMessage::warning(fallback));
        }
        if let Some(issue) = result.affected_issues.first() {
            info!(id = %issue.id, category = %issue.category, "issue reported");
        }
        Ok(result)
    }

    /// List issues matching `criteria` in display order. With `backfill`,
    /// listed issues that have an address but no position are geocoded and
    /// the result is persisted.
    pub fn list_issues(
        &mut self,
        criteria: &IssueFilter,
        backfill: bool,
    ) -> Result<commands::CmdResult> {
        let mut result = commands::list::run(&self.store, criteria)?;
        if backfill {
            let filled = commands::backfill::fill_missing(
                &mut self.store,
                &mut self.geocoder,
                &mut result.listed_issues,
            );
            if filled > 0 {
                result.add_message(commands::CmdMessage::info(format!(
                    "Located {} issue(s) from their address",
                    filled
                )));
            }
        }
        Ok(result)
    }

    pub fn view_issue(&self, selector: &str) -> Result<commands::CmdResult> {
        let id = commands::helpers::resolve_selector(&self.store, selector)?;
        commands::view::run(&self.store, &id)
    }

    pub fn upvote_issue(&mut self, selector: &str) -> Result<commands::CmdResult> {
        let id = commands::helpers::resolve_selector(&self.store, selector)?;
        commands::upvote::run(&mut self.store, &id)
    }

    pub fn add_update(
        &mut self,
        selector: &str,
        text: &str,
        status: Option<Status>,
    ) -> Result<commands::CmdResult> {
        let id = commands::helpers::resolve_selector(&self.store, selector)?;
        commands::update::run(&mut self.store, &id, text, status)
    }

    pub fn mark_in_progress(&mut self, selector: &str) -> Result<commands::CmdResult> {
        let id = commands::helpers::resolve_selector(&self.store, selector)?;
        commands::update::mark_in_progress(&mut self.store, &id)
    }

    pub fn resolve_issue(&mut self, selector: &str) -> Result<commands::CmdResult> {
        let id = commands::helpers::resolve_selector(&self.store, selector)?;
        commands::update::resolve(&mut self.store, &id)
    }

    pub fn delete_issue(&mut self, selector: &str, requester: &str) -> Result<commands::CmdResult> {
        let id = commands::helpers::resolve_selector(&self.store, selector)?;
        commands::delete::run(&mut self.store, &id, requester)
    }

    pub fn backfill_coordinates(
        &mut self,
        selector: &str,
        coords: Coordinates,
    ) -> Result<commands::CmdResult> {
        let id = commands::helpers::resolve_selector(&self.store, selector)?;
        commands::backfill::run(&mut self.store, &id, coords)
    }

    /// Approximate position of the user, or `fallback` (with a warning) when
    /// the locator has no answer.
    pub fn locate(&self, fallback: Coordinates) -> commands::CmdResult {
        let found = match self.locator.locate() {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "location lookup failed");
                None
            }
        };

        match found {
            Some(coords) => {
                let mut result = commands::CmdResult::default().with_location(coords);
                result.add_message(commands::CmdMessage::info(format!(
                    "Approximate location: {}",
                    coords
                )));
                result
            }
            None => {
                let mut result = commands::CmdResult::default().with_location(fallback);
                result.add_message(commands::CmdMessage::warning(format!(
                    "Could not determine your location; using {}",
                    fallback
                )));
                result
            }
        }
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn photo_path(&self, handle: &str) -> std::path::PathBuf {
        self.store.photo_path(handle)
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, DataPaths, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::short_id;
    use crate::model::Category;
    use crate::store::InMemoryStore;
    use crate::test_utils::{FakeGeocoder, FakeLocator};
    use std::path::PathBuf;

    type TestApi = CivicApi<InMemoryStore, FakeGeocoder, FakeLocator>;

    fn api_with(geocoder: FakeGeocoder, located: Option<Coordinates>) -> TestApi {
        CivicApi::new(
            InMemoryStore::in_memory(),
            geocoder,
            FakeLocator(located),
            DataPaths::new(PathBuf::from("/nonexistent")),
        )
    }

    fn api() -> TestApi {
        api_with(FakeGeocoder::new(), None)
    }

    fn report(api: &mut TestApi, title: &str, reporter: &str) -> String {
        let draft = NewIssue::new(title, "details", Category::Roads)
            .with_location(Coordinates::new(12.97, 77.59));
        let result = api.report_issue(draft, reporter).unwrap();
        result.affected_issues[0].id.to_string()
    }

    #[test]
    fn geocoded_address_overrides_selected_point() {
        let geocoder = FakeGeocoder::new().with("MG Road", Coordinates::new(12.975, 77.606));
        let mut api = api_with(geocoder, None);
        let draft = NewIssue::new("Pothole", "Deep", Category::Roads)
            .with_location(Coordinates::new(1.0, 1.0))
            .with_address("MG Road");

        let result = api.report_issue(draft, "u1").unwrap();

        assert_eq!(
            result.affected_issues[0].coordinates(),
            Some(Coordinates::new(12.975, 77.606))
        );
        assert!(!result.has_warnings());
    }

    #[test]
    fn failed_geocode_keeps_selected_point_and_warns() {
        let mut api = api();
        let draft = NewIssue::new("Pothole", "Deep", Category::Roads)
            .with_location(Coordinates::new(12.97, 77.59))
            .with_address("Nowhere");

        let result = api.report_issue(draft, "u1").unwrap();

        assert_eq!(
            result.affected_issues[0].coordinates(),
            Some(Coordinates::new(12.97, 77.59))
        );
        assert!(result.has_warnings());
    }

    #[test]
    fn invalid_report_skips_geocoding() {
        let mut api = api();
        let draft = NewIssue::new("", "Deep", Category::Roads).with_address("MG Road");
        assert!(api.report_issue(draft, "u1").is_err());
        assert_eq!(api.geocoder.geocoder().calls(), 0);
    }

    #[test]
    fn selectors_accept_short_ids() {
        let mut api = api();
        let id = report(&mut api, "Pothole", "u1");
        let short = short_id(&id.parse::<uuid::Uuid>().unwrap());

        api.upvote_issue(&short).unwrap();
        api.upvote_issue(&id).unwrap();

        let viewed = api.view_issue(&short).unwrap();
        assert_eq!(viewed.listed_issues[0].votes, 2);
    }

    #[test]
    fn quick_transitions_log_their_text() {
        let mut api = api();
        let id = report(&mut api, "Pothole", "u1");

        api.mark_in_progress(&id).unwrap();
        let result = api.resolve_issue(&id).unwrap();

        let issue = &result.affected_issues[0];
        assert_eq!(issue.status, Status::Resolved);
        let texts: Vec<&str> = issue.updates.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Issue reported", "Marked in progress", "Marked resolved"]
        );
    }

    #[test]
    fn delete_checks_the_requester() {
        let mut api = api();
        let id = report(&mut api, "Pothole", "user-7");

        assert!(api.delete_issue(&id, "user-42").is_err());
        assert_eq!(
            api.list_issues(&IssueFilter::default(), false)
                .unwrap()
                .listed_issues
                .len(),
            1
        );

        api.delete_issue(&id, "user-7").unwrap();
        assert!(api
            .list_issues(&IssueFilter::default(), false)
            .unwrap()
            .listed_issues
            .is_empty());
    }

    #[test]
    fn listing_backfills_only_when_asked() {
        let geocoder = FakeGeocoder::new().with("Silk Board", Coordinates::new(12.91, 77.62));
        let mut api = api_with(geocoder, None);
        // Stored without going through report_issue, so it has no position
        let draft = NewIssue::new("Flood", "Deep", Category::Water).with_address("Silk Board");
        commands::create::run(&mut api.store, &draft, "u1").unwrap();

        let plain = api.list_issues(&IssueFilter::default(), false).unwrap();
        assert!(plain.listed_issues[0].coordinates().is_none());

        let enriched = api.list_issues(&IssueFilter::default(), true).unwrap();
        assert_eq!(
            enriched.listed_issues[0].coordinates(),
            Some(Coordinates::new(12.91, 77.62))
        );
        let stored = api.list_issues(&IssueFilter::default(), false).unwrap();
        assert_eq!(
            stored.listed_issues[0].coordinates(),
            Some(Coordinates::new(12.91, 77.62))
        );
    }

    #[test]
    fn locate_falls_back_with_a_warning() {
        let center = Coordinates::new(12.9716, 77.5946);

        let found = api_with(FakeGeocoder::new(), Some(Coordinates::new(48.85, 2.35)));
        let result = found.locate(center);
        assert_eq!(result.location, Some(Coordinates::new(48.85, 2.35)));
        assert!(!result.has_warnings());

        let result = api().locate(center);
        assert_eq!(result.location, Some(center));
        assert!(result.has_warnings());
    }
}
