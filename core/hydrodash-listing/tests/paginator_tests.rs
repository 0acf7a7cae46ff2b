use hydrodash_listing::{paginate, LinkBuilder, PageWindow};
use pretty_assertions::assert_eq;

fn labels(window: &PageWindow) -> Vec<String> {
    window
        .links(&LinkBuilder::new("/api/v1/devices"))
        .into_iter()
        .map(|l| l.label)
        .collect()
}

// ── Window arithmetic ───────────────────────────────────────────

#[test]
fn fifteen_rows_ten_per_page() {
    let first = PageWindow::new(15, 1, 10);
    assert_eq!((first.from, first.to, first.last_page), (Some(1), Some(10), 2));
    assert_eq!(first.len(), 10);

    let second = PageWindow::new(15, 2, 10);
    assert_eq!((second.from, second.to), (Some(11), Some(15)));
    assert_eq!(second.offset(), 10);
    assert_eq!(second.len(), 5);
}

#[test]
fn empty_result_has_one_page_and_no_range() {
    let w = PageWindow::new(0, 4, 10);
    assert_eq!(w.page, 1);
    assert_eq!(w.last_page, 1);
    assert_eq!((w.from, w.to), (None, None));
    assert!(w.is_empty());
}

#[test]
fn page_past_the_end_is_clamped_to_last() {
    let w = PageWindow::new(25, 9, 10);
    assert_eq!(w.page, 3);
    assert_eq!((w.from, w.to), (Some(21), Some(25)));
}

#[test]
fn page_zero_and_per_page_zero_are_clamped() {
    let w = PageWindow::new(5, 0, 0);
    assert_eq!(w.page, 1);
    assert_eq!(w.per_page, 1);
    assert_eq!(w.last_page, 5);
}

// ── Links ───────────────────────────────────────────────────────

#[test]
fn small_result_lists_every_page() {
    let w = PageWindow::new(15, 1, 10);
    let links = w.links(&LinkBuilder::new("/api/v1/devices"));
    assert_eq!(labels(&w), vec!["Previous", "1", "2", "Next"]);
    assert_eq!(links[0].url, None);
    assert!(links[1].active);
    assert!(!links[2].active);
    assert_eq!(links[3].url.as_deref(), Some("/api/v1/devices?page=2"));
}

#[test]
fn last_page_disables_next() {
    let w = PageWindow::new(15, 2, 10);
    let links = w.links(&LinkBuilder::new("/x"));
    assert_eq!(links.last().unwrap().url, None);
    assert_eq!(links[0].url.as_deref(), Some("/x?page=1"));
}

#[test]
fn twelve_pages_are_not_elided() {
    let w = PageWindow::new(120, 6, 10);
    assert_eq!(w.numbered_pages().len(), 12);
    assert!(w.numbered_pages().iter().all(Option::is_some));
}

#[test]
fn long_result_elides_middle_pages() {
    let w = PageWindow::new(300, 15, 10);
    assert_eq!(
        labels(&w),
        vec![
            "Previous", "1", "2", "...", "12", "13", "14", "15", "16", "17", "18", "...", "29",
            "30", "Next"
        ]
    );
}

#[test]
fn elision_near_the_start_has_one_gap() {
    let w = PageWindow::new(300, 2, 10);
    assert_eq!(
        labels(&w),
        vec!["Previous", "1", "2", "3", "4", "5", "...", "29", "30", "Next"]
    );
}

#[test]
fn elision_gap_entries_are_not_navigable() {
    let w = PageWindow::new(300, 15, 10);
    let links = w.links(&LinkBuilder::new("/x"));
    for link in links.iter().filter(|l| l.label == "...") {
        assert_eq!(link.url, None);
        assert!(!link.active);
    }
    assert_eq!(links.iter().filter(|l| l.active).count(), 1);
}

#[test]
fn link_urls_carry_encoded_parameters() {
    let builder = LinkBuilder::new("/api/v1/devices")
        .param("search", "tower a&b")
        .param("status", "not connected");
    assert_eq!(
        builder.url(3),
        "/api/v1/devices?search=tower%20a%26b&status=not%20connected&page=3"
    );
}

// ── In-memory pagination ────────────────────────────────────────

#[test]
fn paginate_slices_items() {
    let items: Vec<u32> = (1..=15).collect();
    let page = paginate(&items, 2, 10);
    assert_eq!(page.items, vec![11, 12, 13, 14, 15]);
    assert_eq!(page.window.from, Some(11));
}

#[test]
fn paginate_empty_sequence() {
    let items: Vec<u32> = Vec::new();
    let page = paginate(&items, 3, 10);
    assert!(page.items.is_empty());
    assert_eq!(page.window.page, 1);
}
