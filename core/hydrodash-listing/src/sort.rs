//! Sort resolution and the column-header toggle.

use hydrodash_model::ResourceSchema;
use hydrodash_types::SortDirection;
use serde::{Deserialize, Serialize};

use crate::whitelist::{validate_direction, validate_sort_column};

/// A (column, direction) pair.
///
/// On the server the column is always a whitelisted key; on the client it is
/// whatever the last response echoed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// The resource's default ordering.
    #[must_use]
    pub fn default_for(schema: &ResourceSchema) -> Self {
        Self::new(schema.default_sort_column().key, schema.default_direction)
    }

    /// Clicking a column header: the active column flips direction, any other
    /// column becomes active ascending.
    #[must_use]
    pub fn toggle(&self, column: &str) -> Self {
        if self.column == column {
            Self::new(column, self.direction.flipped())
        } else {
            Self::new(column, SortDirection::Asc)
        }
    }
}

/// Resolves a requested ordering against the whitelist.
///
/// - A column outside the whitelist yields the resource default ordering.
/// - A missing column uses the default column with the requested direction,
///   or the default direction when none was given.
/// - An explicit direction is validated (`desc` when unrecognised).
/// - Without an explicit direction, `current` applies the toggle rule.
#[must_use]
pub fn resolve_sort(
    schema: &ResourceSchema,
    requested_column: Option<&str>,
    requested_direction: Option<&str>,
    current: Option<&SortSpec>,
) -> SortSpec {
    let Some(requested) = requested_column.map(str::trim).filter(|c| !c.is_empty()) else {
        let direction = requested_direction
            .map_or(schema.default_direction, |d| validate_direction(Some(d)));
        return SortSpec::new(schema.default_sort_column().key, direction);
    };
    let column = validate_sort_column(schema, Some(requested));
    if column.key != requested {
        return SortSpec::default_for(schema);
    }
    match (requested_direction, current) {
        (None, Some(current)) => current.toggle(column.key),
        (direction, _) => SortSpec::new(column.key, validate_direction(direction)),
    }
}
