//! Query compilation.
//!
//! A [`FilterSpec`] and [`SortSpec`] compile into one parameterised query.
//! Only static expressions from the resource schema reach the SQL text; every
//! client-supplied value is bound as a parameter.

use hydrodash_model::{Condition, ResourceSchema};
use hydrodash_types::{ResourceKind, SortDirection};
use tracing::debug;

use crate::filter::FilterSpec;
use crate::sort::SortSpec;

/// Scalar SQL function a store must provide: Unicode lower-casing of its
/// single text argument (`NULL` stays `NULL`). Search compares through it
/// because `LIKE` alone folds ASCII only.
pub const CASEFOLD_FN: &str = "casefold";

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
}

/// The compiled form of one listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub kind: ResourceKind,
    /// `FROM` target, joins included.
    pub source: &'static str,
    /// Predicate, never empty (the partition condition is always present).
    pub where_sql: String,
    /// Full `ORDER BY` list, ending with the identity tie-breaker.
    pub order_sql: String,
    /// Parameters in placeholder order.
    pub params: Vec<SqlParam>,
}

impl CompiledQuery {
    /// `SELECT <columns> FROM ... WHERE ... ORDER BY ...`, without paging.
    #[must_use]
    pub fn select_sql(&self, columns: &str) -> String {
        format!(
            "SELECT {columns} FROM {} WHERE {} ORDER BY {}",
            self.source, self.where_sql, self.order_sql
        )
    }

    /// `SELECT COUNT(*) ...` over the same predicate.
    #[must_use]
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM {} WHERE {}", self.source, self.where_sql)
    }
}

/// Compiles listing queries for one resource kind.
///
/// Users and devices share this algorithm; only the schema differs.
#[derive(Debug, Clone, Copy)]
pub struct ListingQueryEngine {
    schema: &'static ResourceSchema,
}

impl ListingQueryEngine {
    #[must_use]
    pub const fn new(schema: &'static ResourceSchema) -> Self {
        Self { schema }
    }

    #[must_use]
    pub fn for_kind(kind: ResourceKind) -> Self {
        Self::new(ResourceSchema::for_kind(kind))
    }

    #[must_use]
    pub fn schema(&self) -> &'static ResourceSchema {
        self.schema
    }

    /// Compiles filter and sort into a query.
    ///
    /// Conditions are ANDed: scope, partition, search (an OR across the
    /// case-folded searchable fields), then each selected enumerated filter.
    #[must_use]
    pub fn compile(&self, filter: &FilterSpec, sort: &SortSpec) -> CompiledQuery {
        let schema = self.schema;
        let mut where_parts: Vec<String> = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();

        where_parts.extend(schema.scope.iter().map(|s| (*s).to_string()));

        where_parts.push(format!("{} = ?", schema.archive_column()));
        params.push(SqlParam::Integer(i64::from(filter.partition.is_archived())));

        if let Some(term) = &filter.search
            && !schema.search_fields.is_empty()
        {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            let ors: Vec<String> = schema
                .search_fields
                .iter()
                .map(|field| format!("{CASEFOLD_FN}({field}) LIKE ? ESCAPE '!'"))
                .collect();
            where_parts.push(format!("({})", ors.join(" OR ")));
            params.extend(schema.search_fields.iter().map(|_| SqlParam::Text(pattern.clone())));
        }

        for choice in &filter.choices {
            let Some(option) = choice.selected else {
                continue;
            };
            match option.condition {
                Condition::Equals { column, value } => {
                    where_parts.push(format!("{column} = ?"));
                    params.push(SqlParam::Text(value.to_string()));
                }
                Condition::IsNull(column) => where_parts.push(format!("{column} IS NULL")),
                Condition::IsNotNull(column) => where_parts.push(format!("{column} IS NOT NULL")),
            }
        }

        let column = schema
            .sort_column(&sort.column)
            .unwrap_or_else(|| schema.default_sort_column());
        let mut order_sql = format!("{} {}", column.expr, sort.direction.as_sql());
        let id_column = schema.id_column();
        if column.expr != id_column {
            order_sql.push_str(&format!(", {id_column} {}", SortDirection::Asc.as_sql()));
        }

        let query = CompiledQuery {
            kind: schema.kind,
            source: schema.source,
            where_sql: where_parts.join(" AND "),
            order_sql,
            params,
        };
        debug!(
            kind = %query.kind,
            where_sql = %query.where_sql,
            order_sql = %query.order_sql,
            params = query.params.len(),
            "compiled listing query"
        );
        query
    }
}

/// Escapes `LIKE` metacharacters using `!` as the escape character, so the
/// term matches literally under `ESCAPE '!'`.
#[must_use]
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '!' | '%' | '_' => {
                out.push('!');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
