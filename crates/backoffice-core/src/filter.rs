//! # Catalog Filtering
//!
//! List filtering for the category and product screens.
//!
//! ```text
//! items ──► name contains search (case-insensitive)
//!       ──► status: all | active | inactive
//!       ──► category (products only)
//!       ──► visible items ──► EmptyState when nothing is left
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::messages;
use crate::types::{CatalogId, Category, Product};

// =============================================================================
// Status Filter
// =============================================================================

/// Status filter selected in the list toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// Whether an item with the given active flag passes this filter.
    pub fn matches(&self, active: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => active,
            StatusFilter::Inactive => !active,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Active => write!(f, "active"),
            StatusFilter::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            other => Err(CoreError::InvalidStatusFilter(other.to_string())),
        }
    }
}

// =============================================================================
// Filter Criteria
// =============================================================================

/// Criteria shared by the category and product lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Free-text search against the item name.
    pub search: String,
    pub status: StatusFilter,
    /// Products only; ignored for categories.
    pub category_id: Option<CatalogId>,
}

impl CatalogFilter {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        CatalogFilter {
            search: search.into(),
            status,
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: CatalogId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// True when no criterion narrows the list.
    pub fn is_unfiltered(&self) -> bool {
        self.search.trim().is_empty()
            && self.status == StatusFilter::All
            && self.category_id.is_none()
    }

    fn matches_name(&self, name: &str) -> bool {
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || name.to_lowercase().contains(&needle)
    }
}

/// Categories whose name contains the search term and whose status matches.
pub fn filter_categories<'a>(categories: &'a [Category], filter: &CatalogFilter) -> Vec<&'a Category> {
    categories
        .iter()
        .filter(|c| filter.matches_name(&c.name) && filter.status.matches(c.active))
        .collect()
}

/// Products filtered by name, status and (optionally) category.
pub fn filter_products<'a>(products: &'a [Product], filter: &CatalogFilter) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| filter.matches_name(&p.name))
        .filter(|p| filter.status.matches(p.active))
        .filter(|p| match filter.category_id {
            Some(id) => p.category_id == Some(id),
            None => true,
        })
        .collect()
}

// =============================================================================
// Empty State
// =============================================================================

/// Why a list renders nothing.
///
/// "No data at all" and "no results for the current filter" get different
/// messages; the second invites the operator to relax the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum EmptyState {
    NoData,
    NoResults,
}

impl EmptyState {
    /// Classifies a list given its unfiltered and visible sizes.
    pub fn classify(total: usize, visible: usize) -> Option<EmptyState> {
        match (total, visible) {
            (0, _) => Some(EmptyState::NoData),
            (_, 0) => Some(EmptyState::NoResults),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoData => messages::NO_DATA,
            EmptyState::NoResults => messages::NO_RESULTS,
        }
    }
}
