//! Parameter contracts for listing and updating todos.

use serde::Serialize;

use crate::id::TodoId;

/// Page used when the caller supplies none or an invalid one.
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when the caller supplies none or an invalid one.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Pagination window for listing todos.
///
/// Both values are always at least 1. There is no upper bound on
/// `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListParams {
    page: u64,
    per_page: u64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListParams {
    /// Build a window from already-validated values, clamping zeros to 1.
    #[must_use]
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Build a window from raw query-string values.
    ///
    /// Each value that is missing, not an integer, or below 1 silently falls
    /// back to its default ([`DEFAULT_PAGE`], [`DEFAULT_PER_PAGE`]).
    #[must_use]
    pub fn from_query(page: Option<&str>, per_page: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            per_page: parse_positive(per_page).unwrap_or(DEFAULT_PER_PAGE),
        }
    }

    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Maximum number of rows in the window.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// Number of rows skipped before the window: `(page - 1) * per_page`,
    /// saturating at `u64::MAX`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|value| *value >= 1)
}

/// Input for toggling the completion flag of an existing todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateParams {
    pub id: TodoId,
    pub completed: bool,
}
