//! Wire parameters, parsed once at the boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query parameters with a fixed meaning. Every other key is a candidate
/// enumerated filter.
const RESERVED: [&str; 7] = ["search", "sort", "sortBy", "direction", "sortOrder", "page", "perPage"];

/// Page-size limits applied to every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Page size when the request names none.
    pub default_per_page: u64,
    /// Largest page size a client may request.
    pub max_per_page: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_per_page: 10,
            max_per_page: 100,
        }
    }
}

impl ListingConfig {
    /// Resolves the effective page size, clamped to `[1, max_per_page]`.
    #[must_use]
    pub fn per_page(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.default_per_page)
            .clamp(1, self.max_per_page.max(1))
    }
}

/// A listing request as the client sent it.
///
/// Values are kept raw; nothing here is trusted. Validation happens when a
/// service turns this into a [`crate::FilterSpec`] and [`crate::SortSpec`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRequest {
    pub search: Option<String>,
    /// Non-reserved parameters, keyed by parameter name.
    pub filters: BTreeMap<String, String>,
    pub sort_column: Option<String>,
    pub sort_direction: Option<String>,
    /// 1-based page. Unparseable or zero values are dropped.
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl ListingRequest {
    /// Parses a raw query map. `sortBy`/`sortOrder` are accepted as
    /// spellings of `sort`/`direction`.
    #[must_use]
    pub fn from_query(query: &BTreeMap<String, String>) -> Self {
        let filters = query
            .iter()
            .filter(|(k, _)| !RESERVED.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            search: query.get("search").cloned(),
            filters,
            sort_column: query.get("sort").or_else(|| query.get("sortBy")).cloned(),
            sort_direction: query
                .get("direction")
                .or_else(|| query.get("sortOrder"))
                .cloned(),
            page: query.get("page").and_then(|v| parse_positive(v)),
            per_page: query.get("perPage").and_then(|v| parse_positive(v)),
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_filter(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(param.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, column: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort_column = Some(column.into());
        self.sort_direction = Some(direction.into());
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u64, per_page: u64) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|n| *n > 0)
}
