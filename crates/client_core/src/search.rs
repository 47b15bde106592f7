//! Debounced search input: a burst of keystrokes becomes a single commit.

use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Owns the raw search text and the one cancellable timer in the engine.
///
/// The timer only guards the quiescence window. Once it elapses the commit is
/// spawned as its own task, so a later keystroke never aborts a fetch that is
/// already underway; superseded fetches are discarded by the sequencer instead.
#[derive(Debug)]
pub struct DebouncedSearch {
    window: Duration,
    input: String,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedSearch {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            input: String::new(),
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Text as typed, shown immediately regardless of the timer.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Records `text` and (re)starts the window; `commit` runs with the text
    /// once no further input arrives for the whole window.
    pub fn on_input<F, Fut>(&mut self, text: impl Into<String>, commit: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.input = text.into();
        if self.cancel() {
            debug!("search: restarted debounce window");
        }

        let window = self.window;
        let text = self.input.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            tokio::spawn(commit(text));
        }));
    }

    /// Cancels the pending timer. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(timer) => {
                let waiting = !timer.is_finished();
                timer.abort();
                waiting
            }
            None => false,
        }
    }
}

impl Default for DebouncedSearch {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
