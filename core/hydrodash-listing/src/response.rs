//! JSON response shapes shared by the service and the dashboard client.

use hydrodash_types::ResourceRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::paginator::{PageLink, PageWindow};
use crate::sort::SortSpec;

/// Pagination block of a listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub links: Vec<PageLink>,
}

impl PaginationMeta {
    #[must_use]
    pub fn new(window: &PageWindow, links: Vec<PageLink>) -> Self {
        Self {
            page: window.page,
            per_page: window.per_page,
            total: window.total,
            last_page: window.last_page,
            from: window.from,
            to: window.to,
            links,
        }
    }
}

/// A listing page plus the filters and sort the server actually applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub items: Vec<ResourceRecord>,
    pub pagination: PaginationMeta,
    pub echoed_filters: BTreeMap<String, String>,
    pub echoed_sort: SortSpec,
}

/// Error body returned by the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Machine-readable code: `RecordNotFound`, `ValidationFailed`, `Internal`.
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<hydrodash_types::FieldErrors>,
}
