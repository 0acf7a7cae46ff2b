//! Query synchronizer: request sequencing without I/O.
//!
//! The synchronizer is a pure state machine. It decides when a request goes
//! out and whether a response may be shown; the driver performs the I/O and
//! supplies the current time.
//!
//! Every dispatched request carries a strictly increasing sequence number.
//! Only a response carrying the highest number dispatched so far is applied,
//! so a slow response to an older query can never overwrite a newer one.

use hydrodash_listing::{ListingResponse, SortSpec};
use hydrodash_types::SortDirection;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::query::ListingQuery;

/// Configuration for the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Quiet period after the last search keystroke before a request goes out.
    pub debounce: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
        }
    }
}

/// Where the synchronizer stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// Nothing pending or outstanding. Also the state after the latest
    /// request failed.
    #[default]
    Idle,
    /// A search change is waiting out the debounce period.
    PendingDebounce,
    /// The latest request has not answered yet.
    InFlight,
    /// The latest response was shown.
    Applied,
    /// The most recent arrival was stale and ignored.
    Discarded,
}

/// A user action on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncIntent {
    /// Free-text search edit; debounced.
    Search(String),
    /// Enumerated filter change (`"all"` clears it).
    Filter { param: String, token: String },
    /// Column header click.
    ToggleSort(String),
    Page(u64),
    PerPage(u64),
    Refresh,
}

/// A request the driver must send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub seq: u64,
    pub query: ListingQuery,
}

/// What happened to an arriving response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied,
    Discarded,
    /// The latest request failed; the error was recorded.
    Failed,
}

/// Debounce and sequencing state for one listing page.
#[derive(Debug, Clone)]
pub struct QuerySynchronizer {
    config: SyncConfig,
    query: ListingQuery,
    /// Highest sequence number dispatched.
    issued: u64,
    /// Highest sequence number applied.
    applied: u64,
    /// Highest sequence number answered, successfully or not.
    settled: u64,
    deadline: Option<Instant>,
    last_outcome: SyncPhase,
    result: Option<ListingResponse>,
    last_error: Option<String>,
}

impl QuerySynchronizer {
    /// Creates a synchronizer for the given initial query.
    pub fn new(query: ListingQuery, config: SyncConfig) -> Self {
        Self {
            config,
            query,
            issued: 0,
            applied: 0,
            settled: 0,
            deadline: None,
            last_outcome: SyncPhase::Idle,
            result: None,
            last_error: None,
        }
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The last applied response, kept visible across failures and discards.
    pub fn result(&self) -> Option<&ListingResponse> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Highest sequence number dispatched so far (0 before the first).
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    /// Highest sequence number applied so far (0 before the first).
    pub fn applied_seq(&self) -> u64 {
        self.applied
    }

    /// When a debounced search is due, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Loading indicator: on while the latest request is unanswered.
    pub fn is_loading(&self) -> bool {
        self.settled < self.issued
    }

    pub fn phase(&self) -> SyncPhase {
        if self.deadline.is_some() {
            SyncPhase::PendingDebounce
        } else if self.is_loading() {
            SyncPhase::InFlight
        } else {
            self.last_outcome
        }
    }

    // ── Intents ──────────────────────────────────────────────────

    /// Applies a user intent. Returns a request to send when the intent
    /// bypasses the debounce.
    pub fn apply(&mut self, intent: SyncIntent, now: Instant) -> Option<Dispatch> {
        match intent {
            SyncIntent::Search(text) => {
                self.search_changed(text, now);
                None
            }
            SyncIntent::Filter { param, token } => Some(self.filter_changed(&param, &token)),
            SyncIntent::ToggleSort(column) => Some(self.sort_toggled(&column)),
            SyncIntent::Page(page) => Some(self.page_changed(page)),
            SyncIntent::PerPage(per_page) => {
                self.query.per_page = Some(per_page.max(1));
                self.query.page = 1;
                Some(self.dispatch())
            }
            SyncIntent::Refresh => Some(self.dispatch()),
        }
    }

    /// Records a search edit and restarts the debounce timer.
    pub fn search_changed(&mut self, text: impl Into<String>, now: Instant) {
        self.query.search = text.into();
        self.query.page = 1;
        self.deadline = Some(now + self.config.debounce);
    }

    /// Filter changes go out immediately, reset to page 1, and carry any
    /// search text still waiting on the debounce.
    pub fn filter_changed(&mut self, param: &str, token: &str) -> Dispatch {
        self.query.set_filter(param, token);
        self.query.page = 1;
        self.dispatch()
    }

    /// Applies the header toggle rule to the current ordering.
    pub fn sort_toggled(&mut self, column: &str) -> Dispatch {
        self.query.sort = Some(match &self.query.sort {
            Some(current) => current.toggle(column),
            None => SortSpec::new(column, SortDirection::Asc),
        });
        self.dispatch()
    }

    pub fn page_changed(&mut self, page: u64) -> Dispatch {
        self.query.page = page.max(1);
        self.dispatch()
    }

    /// Fires the debounced search once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Dispatch> {
        match self.deadline {
            Some(deadline) if now >= deadline => Some(self.dispatch()),
            _ => None,
        }
    }

    fn dispatch(&mut self) -> Dispatch {
        self.deadline = None;
        self.issued += 1;
        debug!(seq = self.issued, kind = %self.query.kind, "dispatching listing request");
        Dispatch {
            seq: self.issued,
            query: self.query.clone(),
        }
    }

    // ── Responses ────────────────────────────────────────────────

    /// Applies a response if it answers the latest request; otherwise
    /// discards it.
    pub fn on_response(&mut self, seq: u64, response: ListingResponse) -> ResponseOutcome {
        if seq != self.issued || seq <= self.applied {
            debug!(seq, latest = self.issued, "discarding stale listing response");
            self.last_outcome = SyncPhase::Discarded;
            return ResponseOutcome::Discarded;
        }
        self.reconcile(&response);
        self.result = Some(response);
        self.applied = seq;
        self.settled = seq;
        self.last_error = None;
        self.last_outcome = SyncPhase::Applied;
        ResponseOutcome::Applied
    }

    /// Records a failed request. Only a failure of the latest request clears
    /// the loading indicator; the last applied result stays visible.
    pub fn on_failure(&mut self, seq: u64, error: impl Into<String>) -> ResponseOutcome {
        if seq != self.issued || seq <= self.settled {
            self.last_outcome = SyncPhase::Discarded;
            return ResponseOutcome::Discarded;
        }
        let error = error.into();
        debug!(seq, %error, "latest listing request failed");
        self.settled = seq;
        self.last_error = Some(error);
        self.last_outcome = SyncPhase::Idle;
        ResponseOutcome::Failed
    }

    /// Adopts the server's resolved ordering, filters and page. The search
    /// text is left alone, and so is the page while a search edit is
    /// pending (that edit already reset it to 1).
    fn reconcile(&mut self, response: &ListingResponse) {
        self.query.sort = Some(response.echoed_sort.clone());
        self.query.filters = response
            .echoed_filters
            .iter()
            .filter(|(param, token)| param.as_str() != "search" && token.as_str() != "all")
            .map(|(param, token)| (param.clone(), token.clone()))
            .collect();
        if self.deadline.is_none() {
            self.query.page = response.pagination.page;
        }
        self.query.per_page = Some(response.pagination.per_page);
    }
}
