//! Page windows and navigation links.
//!
//! `page` is clamped into `[1, last_page]`, so a request past the end lands
//! on the last page instead of an empty one. `from`/`to` are 1-based and
//! absent when there are no rows.

use serde::{Deserialize, Serialize};

/// Above this many pages the numbered links are elided.
pub const MAX_UNELIDED_PAGES: u64 = 12;
/// Pages shown on each side of the current page when eliding.
pub const ON_EACH_SIDE: u64 = 3;

/// Position of one page within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl PageWindow {
    /// Computes the window for `page` over `total` rows. A zero `per_page`
    /// is treated as 1.
    #[must_use]
    pub fn new(total: u64, page: u64, per_page: u64) -> Self {
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, last_page);
        let (from, to) = if total == 0 {
            (None, None)
        } else {
            let from = (page - 1) * per_page + 1;
            (Some(from), Some((page * per_page).min(total)))
        };
        Self {
            page,
            per_page,
            total,
            last_page,
            from,
            to,
        }
    }

    /// Rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }

    /// Rows fetched for this page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// Number of rows on this page.
    #[must_use]
    pub fn len(&self) -> u64 {
        match (self.from, self.to) {
            (Some(from), Some(to)) => to - from + 1,
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.last_page
    }

    /// Numbered entries of the link bar; `None` marks an elision gap.
    #[must_use]
    pub fn numbered_pages(&self) -> Vec<Option<u64>> {
        if self.last_page <= MAX_UNELIDED_PAGES {
            return (1..=self.last_page).map(Some).collect();
        }
        let mut pages: Vec<u64> = Vec::new();
        pages.extend([1, 2]);
        let start = self.page.saturating_sub(ON_EACH_SIDE).max(1);
        let end = (self.page + ON_EACH_SIDE).min(self.last_page);
        pages.extend(start..=end);
        pages.extend([self.last_page - 1, self.last_page]);
        pages.sort_unstable();
        pages.dedup();

        let mut out = Vec::with_capacity(pages.len() + 2);
        let mut prev = 0;
        for page in pages {
            if prev != 0 && page > prev + 1 {
                out.push(None);
            }
            out.push(Some(page));
            prev = page;
        }
        out
    }

    /// The full link bar: `Previous`, numbered pages, `Next`.
    #[must_use]
    pub fn links(&self, builder: &LinkBuilder) -> Vec<PageLink> {
        let mut links = Vec::new();
        links.push(PageLink {
            url: self.has_previous().then(|| builder.url(self.page - 1)),
            label: "Previous".into(),
            active: false,
        });
        for entry in self.numbered_pages() {
            links.push(match entry {
                Some(page) => PageLink {
                    url: Some(builder.url(page)),
                    label: page.to_string(),
                    active: page == self.page,
                },
                None => PageLink {
                    url: None,
                    label: "...".into(),
                    active: false,
                },
            });
        }
        links.push(PageLink {
            url: self.has_next().then(|| builder.url(self.page + 1)),
            label: "Next".into(),
            active: false,
        });
        links
    }
}

/// One entry of the link bar. `url` is `None` when not navigable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

/// Builds page URLs that carry the listing's resolved parameters, so
/// following a link reproduces the same filters and sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    path: String,
    params: Vec<(String, String)>,
}

impl LinkBuilder {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Appends a query parameter, preserving insertion order.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// URL of `page`, with `page` as the final parameter.
    #[must_use]
    pub fn url(&self, page: u64) -> String {
        let mut url = self.path.clone();
        url.push('?');
        for (key, value) in &self.params {
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            url.push('&');
        }
        url.push_str(&format!("page={page}"));
        url
    }
}

/// One page of an in-memory sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

/// Slices an already filtered and ordered sequence.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: u64, per_page: u64) -> Page<T> {
    let window = PageWindow::new(items.len() as u64, page, per_page);
    let items = items
        .iter()
        .skip(window.offset() as usize)
        .take(window.limit() as usize)
        .cloned()
        .collect();
    Page { items, window }
}
