use hydrodash_listing::{
    escape_like, ArchivePartition, FilterSpec, ListingQueryEngine, ListingRequest, SortSpec,
    SqlParam,
};
use hydrodash_model::{DEVICES, USERS};
use hydrodash_types::{ResourceKind, SortDirection};
use pretty_assertions::assert_eq;

fn compile_users(request: &ListingRequest, partition: ArchivePartition, sort: &SortSpec) -> hydrodash_listing::CompiledQuery {
    let filter = FilterSpec::build(&USERS, request, partition);
    ListingQueryEngine::new(&USERS).compile(&filter, sort)
}

fn default_sort() -> SortSpec {
    SortSpec::new("created_at", SortDirection::Desc)
}

// ── Predicates ──────────────────────────────────────────────────

#[test]
fn bare_request_applies_scope_and_partition_only() {
    let q = compile_users(&ListingRequest::default(), ArchivePartition::Active, &default_sort());
    assert_eq!(q.where_sql, "u.role = 'user' AND u.is_archived = ?");
    assert_eq!(q.params, vec![SqlParam::Integer(0)]);
    assert_eq!(q.kind, ResourceKind::Users);
}

#[test]
fn archived_partition_binds_one() {
    let q = compile_users(&ListingRequest::default(), ArchivePartition::Archived, &default_sort());
    assert_eq!(q.params, vec![SqlParam::Integer(1)]);
}

#[test]
fn search_is_an_or_across_fields() {
    let request = ListingRequest::default().with_search("john");
    let q = compile_users(&request, ArchivePartition::Active, &default_sort());
    assert!(q.where_sql.contains(
        "(casefold(u.first_name) LIKE ? ESCAPE '!' OR casefold(u.last_name) LIKE ? ESCAPE '!' \
         OR casefold(u.email) LIKE ? ESCAPE '!')"
    ));
    assert_eq!(q.params.len(), 4);
    assert_eq!(q.params[1], SqlParam::Text("%john%".to_string()));
}

#[test]
fn search_pattern_is_case_folded_beyond_ascii() {
    let request = ListingRequest::default().with_search("ÉLODIE");
    let q = compile_users(&request, ArchivePartition::Active, &default_sort());
    assert_eq!(q.params[1], SqlParam::Text("%élodie%".to_string()));
}

#[test]
fn search_text_never_reaches_sql() {
    let request = ListingRequest::default().with_search("'; DROP TABLE users; --");
    let q = compile_users(&request, ArchivePartition::Active, &default_sort());
    assert!(!q.where_sql.contains("DROP"));
    assert!(!q.order_sql.contains("DROP"));
}

#[test]
fn enumerated_filters_are_anded() {
    let request = ListingRequest::default()
        .with_filter("status", "inactive")
        .with_filter("verified", "verified");
    let q = compile_users(&request, ArchivePartition::Active, &default_sort());
    assert!(q.where_sql.ends_with("AND u.status = ? AND u.email_verified_at IS NOT NULL"));
    assert_eq!(q.params.last(), Some(&SqlParam::Text("inactive".to_string())));
}

#[test]
fn device_search_includes_owner_fields() {
    let request = ListingRequest::default().with_search("alice");
    let filter = FilterSpec::build(&DEVICES, &request, ArchivePartition::Active);
    let q = ListingQueryEngine::for_kind(ResourceKind::Devices).compile(&filter, &default_sort());
    assert!(q.where_sql.contains("casefold(o.email) LIKE ? ESCAPE '!'"));
    assert_eq!(q.params.len(), 6);
    assert!(q.count_sql().starts_with("SELECT COUNT(*) FROM devices d LEFT JOIN users o"));
}

// ── Ordering ────────────────────────────────────────────────────

#[test]
fn identity_tie_breaker_is_appended() {
    let q = compile_users(&ListingRequest::default(), ArchivePartition::Active, &default_sort());
    assert_eq!(q.order_sql, "u.created_at DESC, u.id ASC");
}

#[test]
fn sorting_by_id_has_no_duplicate_tie_breaker() {
    let sort = SortSpec::new("id", SortDirection::Desc);
    let q = compile_users(&ListingRequest::default(), ArchivePartition::Active, &sort);
    assert_eq!(q.order_sql, "u.id DESC");
}

#[test]
fn unlisted_sort_column_compiles_to_default_expression() {
    let sort = SortSpec::new("password", SortDirection::Asc);
    let q = compile_users(&ListingRequest::default(), ArchivePartition::Active, &sort);
    assert_eq!(q.order_sql, "u.created_at ASC, u.id ASC");
}

#[test]
fn select_sql_assembles_clauses() {
    let q = compile_users(&ListingRequest::default(), ArchivePartition::Active, &default_sort());
    assert_eq!(
        q.select_sql("u.id"),
        "SELECT u.id FROM users u WHERE u.role = 'user' AND u.is_archived = ? ORDER BY u.created_at DESC, u.id ASC"
    );
}

// ── LIKE escaping ───────────────────────────────────────────────

#[test]
fn like_metacharacters_are_escaped() {
    assert_eq!(escape_like("50%_off!"), "50!%!_off!!");
    assert_eq!(escape_like("plain"), "plain");
}
