//! Column whitelist checks.
//!
//! Neither function fails: anything outside the allowed set resolves to the
//! resource default.

use hydrodash_model::{ResourceSchema, SortColumn};
use hydrodash_types::SortDirection;
use tracing::debug;

/// Returns the whitelisted column named by `requested`, or the resource's
/// default sort column.
#[must_use]
pub fn validate_sort_column(schema: &ResourceSchema, requested: Option<&str>) -> &'static SortColumn {
    match requested.map(str::trim).filter(|r| !r.is_empty()) {
        Some(key) => schema.sort_column(key).unwrap_or_else(|| {
            debug!(kind = %schema.kind, requested = key, "sort column not whitelisted");
            schema.default_sort_column()
        }),
        None => schema.default_sort_column(),
    }
}

/// `asc` or `desc` (any case); everything else is `desc`.
#[must_use]
pub fn validate_direction(requested: Option<&str>) -> SortDirection {
    requested
        .and_then(SortDirection::parse)
        .unwrap_or(SortDirection::Desc)
}
