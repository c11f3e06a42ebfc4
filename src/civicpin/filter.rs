//! # Filtering and Display Order
//!
//! Pure functions over a slice of issues. Nothing here touches storage, so the
//! same criteria always yield the same subset, and the display order is
//! recomputed for every listing rather than persisted.

use crate::model::{Category, Issue, Status};
use std::cmp::Ordering;

/// Criteria for narrowing the issue list. `None` means "all".
///
/// All conditions are ANDed. The default value matches every issue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub category: Option<Category>,
    pub status: Option<Status>,
    /// Case-insensitive substring of title, description and address.
    pub text: String,
    /// Only issues created by this session.
    pub owned_by: Option<String>,
}

impl IssueFilter {
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn owned_by(mut self, session_id: impl Into<String>) -> Self {
        self.owned_by = Some(session_id.into());
        self
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(category) = self.category {
            if issue.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if issue.status != status {
                return false;
            }
        }
        if let Some(owner) = &self.owned_by {
            if !issue.is_owned_by(owner) {
                return false;
            }
        }
        if !self.text.is_empty() && !issue.search_text().contains(&self.text.to_lowercase()) {
            return false;
        }
        true
    }
}

/// Issues matching `criteria`, in their original order.
pub fn filter(issues: &[Issue], criteria: &IssueFilter) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| criteria.matches(issue))
        .cloned()
        .collect()
}

/// Display order: unresolved before resolved, then most votes first, then
/// oldest first.
pub fn sort_for_display(issues: &mut [Issue]) {
    issues.sort_by(display_order);
}

fn display_order(a: &Issue, b: &Issue) -> Ordering {
    a.is_resolved()
        .cmp(&b.is_resolved())
        .then_with(|| b.votes.cmp(&a.votes))
        .then_with(|| a.created_at.cmp(&b.created_at))
}
