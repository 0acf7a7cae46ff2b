//! The dashboard's local view of a listing request.

use hydrodash_listing::{ArchivePartition, SortSpec, API_PREFIX};
use hydrodash_types::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the user currently asked for on one listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub kind: ResourceKind,
    pub partition: ArchivePartition,
    pub search: String,
    /// Enumerated filters by parameter name. `"all"` is never stored.
    pub filters: BTreeMap<String, String>,
    /// `None` until the server has echoed an ordering.
    pub sort: Option<SortSpec>,
    pub page: u64,
    pub per_page: Option<u64>,
}

impl ListingQuery {
    #[must_use]
    pub fn new(kind: ResourceKind, partition: ArchivePartition) -> Self {
        Self {
            kind,
            partition,
            search: String::new(),
            filters: BTreeMap::new(),
            sort: None,
            page: 1,
            per_page: None,
        }
    }

    /// Request path, e.g. `/api/v1/devices/archived`.
    #[must_use]
    pub fn path(&self) -> String {
        let mut path = format!("{API_PREFIX}/{}", self.kind.path_segment());
        if self.partition.is_archived() {
            path.push_str("/archived");
        }
        path
    }

    /// Sets or clears an enumerated filter.
    pub fn set_filter(&mut self, param: &str, token: &str) {
        if token.trim().is_empty() || token == "all" {
            self.filters.remove(param);
        } else {
            self.filters.insert(param.to_string(), token.to_string());
        }
    }

    /// Query string pairs in wire spelling.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search".to_string(), search.to_string()));
        }
        for (param, token) in &self.filters {
            params.push((param.clone(), token.clone()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.column.clone()));
            params.push(("direction".to_string(), sort.direction.as_str().to_string()));
        }
        params.push(("page".to_string(), self.page.to_string()));
        if let Some(per_page) = self.per_page {
            params.push(("perPage".to_string(), per_page.to_string()));
        }
        params
    }
}
