use hydrodash_listing::{ArchivePartition, FilterSpec, ListingConfig, ListingRequest};
use hydrodash_model::{DEVICES, USERS};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

// ── Request parsing ─────────────────────────────────────────────

#[test]
fn from_query_reads_both_sort_spellings() {
    let a = ListingRequest::from_query(&query(&[("sort", "email"), ("direction", "asc")]));
    let b = ListingRequest::from_query(&query(&[("sortBy", "email"), ("sortOrder", "asc")]));
    assert_eq!(a.sort_column.as_deref(), Some("email"));
    assert_eq!(a.sort_column, b.sort_column);
    assert_eq!(a.sort_direction, b.sort_direction);
}

#[test]
fn from_query_drops_non_numeric_and_zero_pages() {
    let r = ListingRequest::from_query(&query(&[("page", "abc"), ("perPage", "0")]));
    assert_eq!(r.page, None);
    assert_eq!(r.per_page, None);
    let r = ListingRequest::from_query(&query(&[("page", " 3 "), ("perPage", "25")]));
    assert_eq!(r.page, Some(3));
    assert_eq!(r.per_page, Some(25));
}

#[test]
fn from_query_keeps_unreserved_keys_as_filters() {
    let r = ListingRequest::from_query(&query(&[
        ("status", "active"),
        ("verified", "yes"),
        ("page", "2"),
        ("search", "jo"),
    ]));
    assert_eq!(r.filters, query(&[("status", "active"), ("verified", "yes")]));
    assert_eq!(r.search.as_deref(), Some("jo"));
}

#[test]
fn per_page_is_clamped() {
    let config = ListingConfig::default();
    assert_eq!(config.per_page(None), 10);
    assert_eq!(config.per_page(Some(15)), 15);
    assert_eq!(config.per_page(Some(10_000)), 100);
}

// ── FilterSpec ──────────────────────────────────────────────────

#[test]
fn whitespace_search_is_no_filter() {
    let request = ListingRequest::default().with_search("   ");
    let spec = FilterSpec::build(&USERS, &request, ArchivePartition::Active);
    assert_eq!(spec.search, None);
    assert!(!spec.is_narrowed());
}

#[test]
fn search_term_is_trimmed() {
    let request = ListingRequest::default().with_search("  john ");
    let spec = FilterSpec::build(&USERS, &request, ArchivePartition::Active);
    assert_eq!(spec.search.as_deref(), Some("john"));
}

#[test]
fn unknown_tokens_behave_like_all() {
    let unknown = ListingRequest::default().with_filter("status", "banned");
    let all = ListingRequest::default().with_filter("status", "all");
    let none = ListingRequest::default();

    let a = FilterSpec::build(&USERS, &unknown, ArchivePartition::Active);
    let b = FilterSpec::build(&USERS, &all, ArchivePartition::Active);
    let c = FilterSpec::build(&USERS, &none, ArchivePartition::Active);
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(a.echo()["status"], "all");
}

#[test]
fn verified_alias_echoes_canonical_token() {
    let request = ListingRequest::default().with_filter("verified", "no");
    let spec = FilterSpec::build(&USERS, &request, ArchivePartition::Active);
    assert_eq!(spec.selected("verified").unwrap().token, "unverified");
    assert_eq!(spec.echo()["verified"], "unverified");
}

#[test]
fn device_connection_state_alias_parameter() {
    let request = ListingRequest::default().with_filter("connection-state", "connected");
    let spec = FilterSpec::build(&DEVICES, &request, ArchivePartition::Archived);
    assert_eq!(spec.selected("status").unwrap().token, "connected");
    assert_eq!(spec.partition, ArchivePartition::Archived);
}

#[test]
fn canonical_parameter_wins_over_alias() {
    let request = ListingRequest::default()
        .with_filter("status", "not connected")
        .with_filter("connection-state", "connected");
    let spec = FilterSpec::build(&DEVICES, &request, ArchivePartition::Active);
    assert_eq!(spec.selected("status").unwrap().token, "not connected");
}

#[test]
fn echo_lists_every_filter() {
    let request = ListingRequest::default().with_search("x").with_filter("status", "active");
    let spec = FilterSpec::build(&USERS, &request, ArchivePartition::Active);
    let expected = query(&[("search", "x"), ("status", "active"), ("verified", "all")]);
    assert_eq!(spec.echo(), expected);
}

#[test]
fn partition_flag_values() {
    assert!(ArchivePartition::Archived.is_archived());
    assert!(!ArchivePartition::Active.is_archived());
    assert_eq!(ArchivePartition::default(), ArchivePartition::Active);
}
