//! Typed listing predicates.

use hydrodash_model::{EnumFilter, FilterOption, ResourceSchema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::request::ListingRequest;

/// Token meaning "no filter" for enumerated parameters.
pub const ALL: &str = "all";

/// Which side of the archive flag a listing shows.
///
/// Chosen by the endpoint, never by a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchivePartition {
    #[default]
    Active,
    Archived,
}

impl ArchivePartition {
    /// Value of the archive flag for rows in this partition.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        matches!(self, Self::Archived)
    }
}

impl fmt::Display for ArchivePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Archived => f.write_str("archived"),
        }
    }
}

/// The resolved value of one enumerated filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterChoice {
    pub filter: &'static EnumFilter,
    /// `None` means "all".
    pub selected: Option<&'static FilterOption>,
}

impl FilterChoice {
    /// The token echoed back to clients.
    #[must_use]
    pub fn token(&self) -> &'static str {
        self.selected.map_or(ALL, |opt| opt.token)
    }
}

/// Validated predicates for one listing call.
///
/// Every enumerated value is either a member of its filter's vocabulary or
/// absent; the search term is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub search: Option<String>,
    pub choices: Vec<FilterChoice>,
    pub partition: ArchivePartition,
}

impl FilterSpec {
    /// Builds the filter for `schema` from a raw request.
    ///
    /// A filter parameter is read under its canonical name first, then under
    /// each alias. Unknown tokens and `"all"` resolve to no filter.
    #[must_use]
    pub fn build(
        schema: &'static ResourceSchema,
        request: &ListingRequest,
        partition: ArchivePartition,
    ) -> Self {
        let search = request
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let choices = schema
            .filters
            .iter()
            .map(|filter| {
                let raw = std::iter::once(filter.param)
                    .chain(filter.param_aliases.iter().copied())
                    .find_map(|name| request.filters.get(name));
                FilterChoice {
                    filter,
                    selected: raw.and_then(|r| filter.option(r)),
                }
            })
            .collect();

        Self {
            search,
            choices,
            partition,
        }
    }

    /// The option selected for `param`, if any.
    #[must_use]
    pub fn selected(&self, param: &str) -> Option<&'static FilterOption> {
        self.choices
            .iter()
            .find(|c| c.filter.param == param)
            .and_then(|c| c.selected)
    }

    /// Whether any predicate beyond the partition is active.
    #[must_use]
    pub fn is_narrowed(&self) -> bool {
        self.search.is_some() || self.choices.iter().any(|c| c.selected.is_some())
    }

    /// The resolved filters as echoed to clients: `search` plus one entry per
    /// enumerated filter (`"all"` when unset).
    #[must_use]
    pub fn echo(&self) -> BTreeMap<String, String> {
        let mut echoed = BTreeMap::new();
        echoed.insert(
            "search".to_string(),
            self.search.clone().unwrap_or_default(),
        );
        for choice in &self.choices {
            echoed.insert(choice.filter.param.to_string(), choice.token().to_string());
        }
        echoed
    }
}
