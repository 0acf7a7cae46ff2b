//! Property-based tests for listing invariants.
//!
//! - Sort resolution always lands on a whitelisted column
//! - Page windows are consistent with page, per-page and total
//! - Filter resolution never leaves an enumerated value outside its vocabulary

use hydrodash_listing::{
    paginate, resolve_sort, validate_sort_column, ArchivePartition, FilterSpec, ListingRequest,
    PageWindow, SortSpec,
};
use hydrodash_model::{DEVICES, USERS};
use hydrodash_types::SortDirection;
use proptest::prelude::*;

fn column_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("first_name".to_string()),
        Just("serial_number".to_string()),
        Just("name".to_string()),
        "[a-z_;' ]{0,24}",
    ]
}

fn direction_strategy() -> impl Strategy<Value = SortDirection> {
    prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)]
}

mod whitelist_properties {
    use super::*;

    proptest! {
        /// Whatever is requested, the resolved column is whitelisted.
        #[test]
        fn resolved_column_is_whitelisted(
            column in column_strategy(),
            direction in "[a-zA-Z]{0,6}",
        ) {
            for schema in [&USERS, &DEVICES] {
                let sort = resolve_sort(schema, Some(&column), Some(&direction), None);
                prop_assert!(schema.sort_column(&sort.column).is_some());
                let validated = validate_sort_column(schema, Some(&column));
                prop_assert!(schema.sort_columns.contains(validated));
            }
        }

        /// Toggling the same column twice restores the original ordering.
        #[test]
        fn double_toggle_is_identity(column in "[a-z_]{1,12}", direction in direction_strategy()) {
            let sort = SortSpec::new(column.clone(), direction);
            prop_assert_eq!(sort.toggle(&column).toggle(&column), sort);
        }

        /// Toggling onto a different column always starts ascending.
        #[test]
        fn toggle_to_new_column_is_ascending(
            current in "[a-z]{1,8}",
            next in "[A-Z]{1,8}",
            direction in direction_strategy(),
        ) {
            let sort = SortSpec::new(current, direction).toggle(&next);
            prop_assert_eq!(sort.direction, SortDirection::Asc);
            prop_assert_eq!(sort.column, next);
        }
    }
}

mod filter_properties {
    use super::*;

    proptest! {
        /// Enumerated choices are members of their vocabulary or absent.
        #[test]
        fn choices_stay_in_vocabulary(
            status in "[a-z ]{0,14}",
            verified in "[a-z]{0,10}",
        ) {
            let request = ListingRequest::default()
                .with_filter("status", status)
                .with_filter("verified", verified);
            let spec = FilterSpec::build(&USERS, &request, ArchivePartition::Active);
            for choice in &spec.choices {
                if let Some(option) = choice.selected {
                    prop_assert!(choice.filter.options.contains(option));
                }
            }
        }
    }
}

mod pagination_properties {
    use super::*;

    proptest! {
        /// Items on a page equal min(perPage, remaining rows) after clamping.
        #[test]
        fn page_length_matches_window(
            total in 0usize..500,
            page in 0u64..80,
            per_page in 1u64..60,
        ) {
            let items: Vec<usize> = (0..total).collect();
            let result = paginate(&items, page, per_page);
            let w = result.window;
            let remaining = (total as u64).saturating_sub((w.page - 1) * w.per_page);
            prop_assert_eq!(result.items.len() as u64, per_page.min(remaining));
            prop_assert_eq!(result.items.len() as u64, w.len());
            prop_assert!(w.page >= 1 && w.page <= w.last_page);
        }

        /// `from`/`to` are 1-based and bracket exactly the page's rows.
        #[test]
        fn from_to_are_consistent(total in 0u64..10_000, page in 1u64..500, per_page in 1u64..100) {
            let w = PageWindow::new(total, page, per_page);
            match (w.from, w.to) {
                (Some(from), Some(to)) => {
                    prop_assert_eq!(from, (w.page - 1) * w.per_page + 1);
                    prop_assert_eq!(to, (w.page * w.per_page).min(total));
                    prop_assert!(from <= to);
                }
                (None, None) => prop_assert_eq!(total, 0),
                _ => prop_assert!(false, "from and to must both be set or both absent"),
            }
        }

        /// Exactly one link is active, and it is the current page.
        #[test]
        fn one_active_link(total in 1u64..5_000, page in 1u64..600, per_page in 1u64..50) {
            let w = PageWindow::new(total, page, per_page);
            let links = w.links(&hydrodash_listing::LinkBuilder::new("/p"));
            let active: Vec<_> = links.iter().filter(|l| l.active).collect();
            prop_assert_eq!(active.len(), 1);
            prop_assert_eq!(active[0].label.clone(), w.page.to_string());
        }
    }
}
