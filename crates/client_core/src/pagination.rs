//! Page cursor and the `Idle`/`Loading` machine that gates scroll-driven loads.

use crate::sequencer::RequestToken;

pub const DEFAULT_SCROLL_THRESHOLD_PX: f64 = 100.0;

/// Geometry of the scroll container at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn is_near_bottom(&self, threshold_px: f64) -> bool {
        self.scroll_height - self.scroll_top <= self.client_height + threshold_px
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCursor {
    pub current_page: u32,
    pub has_more: bool,
    pub search_term: String,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self {
            current_page: 1,
            has_more: true,
            search_term: String::new(),
        }
    }
}

/// Whether fetched rows replace the window or extend it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Replace,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Loading {
        token: RequestToken,
        page: u32,
        mode: LoadMode,
    },
}

/// Tracks the cursor for the committed search and the single in-flight fetch.
///
/// `current_page` is the last page committed for the current search term.
/// Until page 1 has committed, the next page to request is page 1 itself, so a
/// failed fetch is asked for again on the next qualifying scroll.
#[derive(Debug, Clone)]
pub struct PaginationMachine {
    cursor: PaginationCursor,
    state: PageState,
    committed: bool,
}

impl Default for PaginationMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationMachine {
    pub fn new() -> Self {
        Self {
            cursor: PaginationCursor::default(),
            state: PageState::Idle,
            committed: false,
        }
    }

    pub fn cursor(&self) -> &PaginationCursor {
        &self.cursor
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PageState::Loading { .. })
    }

    /// A committed search starts over at page 1 with `has_more = true`.
    pub fn reset_for_search(&mut self, search_term: impl Into<String>) {
        self.cursor = PaginationCursor {
            current_page: 1,
            has_more: true,
            search_term: search_term.into(),
        };
        self.committed = false;
    }

    pub fn next_page(&self) -> Option<u32> {
        if !self.cursor.has_more {
            return None;
        }
        if self.committed {
            Some(self.cursor.current_page.saturating_add(1))
        } else {
            Some(self.cursor.current_page)
        }
    }

    /// Page a scroll event should load, or `None` when the event is a no-op.
    pub fn page_for_scroll(&self, metrics: ScrollMetrics, threshold_px: f64) -> Option<u32> {
        if self.is_loading() || !metrics.is_near_bottom(threshold_px) {
            return None;
        }
        self.next_page()
    }

    /// `Idle -> Loading`. Appends are refused while a fetch is in flight;
    /// a replace always takes over the loading slot from whatever was pending.
    pub fn begin(&mut self, token: RequestToken, page: u32, mode: LoadMode) -> bool {
        if mode == LoadMode::Append && self.is_loading() {
            return false;
        }
        self.state = PageState::Loading { token, page, mode };
        true
    }

    /// `Loading -> Idle` for the fetch holding `token`, recording the committed
    /// page and the server's `hasMore`. Any other token is ignored.
    pub fn complete(&mut self, token: RequestToken, has_more: bool) -> bool {
        let PageState::Loading {
            token: loading,
            page,
            ..
        } = self.state
        else {
            return false;
        };
        if loading != token {
            return false;
        }
        self.state = PageState::Idle;
        self.cursor.current_page = page;
        self.cursor.has_more = has_more;
        self.committed = true;
        true
    }

    /// `Loading -> Idle` without touching the cursor, for a failed fetch.
    pub fn abort(&mut self, token: RequestToken) -> bool {
        match self.state {
            PageState::Loading { token: loading, .. } if loading == token => {
                self.state = PageState::Idle;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
