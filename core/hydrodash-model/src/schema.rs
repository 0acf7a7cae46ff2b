use hydrodash_types::{ResourceKind, SortDirection};

/// A sortable column: the public key clients send, and the expression it
/// compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortColumn {
    pub key: &'static str,
    pub expr: &'static str,
}

impl SortColumn {
    const fn new(key: &'static str, expr: &'static str) -> Self {
        Self { key, expr }
    }
}

/// A predicate selected by a filter token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// `column = value`, with the value bound as a parameter.
    Equals {
        column: &'static str,
        value: &'static str,
    },
    IsNull(&'static str),
    IsNotNull(&'static str),
}

/// One accepted value of an enumerated filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    /// Canonical token, echoed back to clients.
    pub token: &'static str,
    /// Other spellings that select the same option.
    pub aliases: &'static [&'static str],
    pub condition: Condition,
}

impl FilterOption {
    /// Whether `raw` names this option (exact match on token or alias).
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        self.token == raw || self.aliases.contains(&raw)
    }
}

/// An enumerated filter parameter such as `status` or `verified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumFilter {
    /// Canonical query parameter name.
    pub param: &'static str,
    /// Alternate parameter names, consulted when the canonical one is absent.
    pub param_aliases: &'static [&'static str],
    pub options: &'static [FilterOption],
}

impl EnumFilter {
    /// Looks up the option for a raw token. `"all"` and unknown tokens yield `None`.
    #[must_use]
    pub fn option(&self, raw: &str) -> Option<&'static FilterOption> {
        let raw = raw.trim();
        self.options.iter().find(|opt| opt.matches(raw))
    }
}

/// Everything the listing engine needs to know about one resource kind.
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceSchema {
    pub kind: ResourceKind,
    /// `FROM` target including joins, e.g. `users u`.
    pub source: &'static str,
    /// Alias of the listed table inside `source`.
    pub alias: &'static str,
    /// Conditions applied to every listing of this resource.
    pub scope: &'static [&'static str],
    pub sort_columns: &'static [SortColumn],
    pub default_sort: &'static str,
    pub default_direction: SortDirection,
    /// Expressions matched by the free-text search.
    pub search_fields: &'static [&'static str],
    pub filters: &'static [EnumFilter],
}

impl ResourceSchema {
    /// Returns the schema for a resource kind.
    #[must_use]
    pub fn for_kind(kind: ResourceKind) -> &'static ResourceSchema {
        match kind {
            ResourceKind::Users => &USERS,
            ResourceKind::Devices => &DEVICES,
        }
    }

    /// Looks up a whitelisted sort column by its public key.
    #[must_use]
    pub fn sort_column(&self, key: &str) -> Option<&'static SortColumn> {
        self.sort_columns.iter().find(|c| c.key == key)
    }

    /// The column used when the request names none or an unknown one.
    #[must_use]
    pub fn default_sort_column(&self) -> &'static SortColumn {
        self.sort_columns
            .iter()
            .find(|c| c.key == self.default_sort)
            .unwrap_or(&self.sort_columns[0])
    }

    /// Identity column, the final tie-breaker of every ordering.
    #[must_use]
    pub fn id_column(&self) -> String {
        format!("{}.id", self.alias)
    }

    /// Column holding the archive flag.
    #[must_use]
    pub fn archive_column(&self) -> String {
        format!("{}.is_archived", self.alias)
    }
}

static USER_SORT_COLUMNS: [SortColumn; 10] = [
    SortColumn::new("id", "u.id"),
    SortColumn::new("first_name", "u.first_name COLLATE NOCASE"),
    SortColumn::new("last_name", "u.last_name COLLATE NOCASE"),
    SortColumn::new("name", "(u.first_name || ' ' || u.last_name) COLLATE NOCASE"),
    SortColumn::new("email", "u.email COLLATE NOCASE"),
    SortColumn::new("status", "u.status"),
    SortColumn::new("role", "u.role"),
    SortColumn::new("email_verified_at", "u.email_verified_at"),
    SortColumn::new("created_at", "u.created_at"),
    SortColumn::new("updated_at", "u.updated_at"),
];

static USER_FILTERS: [EnumFilter; 2] = [
    EnumFilter {
        param: "status",
        param_aliases: &[],
        options: &[
            FilterOption {
                token: "active",
                aliases: &[],
                condition: Condition::Equals {
                    column: "u.status",
                    value: "active",
                },
            },
            FilterOption {
                token: "inactive",
                aliases: &[],
                condition: Condition::Equals {
                    column: "u.status",
                    value: "inactive",
                },
            },
        ],
    },
    EnumFilter {
        param: "verified",
        param_aliases: &[],
        options: &[
            FilterOption {
                token: "verified",
                aliases: &["yes"],
                condition: Condition::IsNotNull("u.email_verified_at"),
            },
            FilterOption {
                token: "unverified",
                aliases: &["no"],
                condition: Condition::IsNull("u.email_verified_at"),
            },
        ],
    },
];

/// Users listing: non-admin accounts only.
pub static USERS: ResourceSchema = ResourceSchema {
    kind: ResourceKind::Users,
    source: "users u",
    alias: "u",
    scope: &["u.role = 'user'"],
    sort_columns: &USER_SORT_COLUMNS,
    default_sort: "created_at",
    default_direction: SortDirection::Desc,
    search_fields: &["u.first_name", "u.last_name", "u.email"],
    filters: &USER_FILTERS,
};

static DEVICE_SORT_COLUMNS: [SortColumn; 6] = [
    SortColumn::new("id", "d.id"),
    SortColumn::new("name", "d.name COLLATE NOCASE"),
    SortColumn::new("serial_number", "d.serial_number COLLATE NOCASE"),
    SortColumn::new("status", "d.status"),
    SortColumn::new("created_at", "d.created_at"),
    SortColumn::new("updated_at", "d.updated_at"),
];

static DEVICE_FILTERS: [EnumFilter; 1] = [EnumFilter {
    param: "status",
    param_aliases: &["connection-state"],
    options: &[
        FilterOption {
            token: "connected",
            aliases: &[],
            condition: Condition::Equals {
                column: "d.status",
                value: "connected",
            },
        },
        FilterOption {
            token: "not connected",
            aliases: &["not_connected", "disconnected"],
            condition: Condition::Equals {
                column: "d.status",
                value: "not connected",
            },
        },
    ],
}];

/// Devices listing, searchable by owner through a one-hop join.
pub static DEVICES: ResourceSchema = ResourceSchema {
    kind: ResourceKind::Devices,
    source: "devices d LEFT JOIN users o ON o.id = d.user_id",
    alias: "d",
    scope: &[],
    sort_columns: &DEVICE_SORT_COLUMNS,
    default_sort: "created_at",
    default_direction: SortDirection::Desc,
    search_fields: &["d.name", "d.serial_number", "o.first_name", "o.last_name", "o.email"],
    filters: &DEVICE_FILTERS,
};
