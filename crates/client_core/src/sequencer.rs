use std::fmt;

use crate::error::SyncError;

/// Identifies one list fetch. Tokens are plain values; only the sequencer
/// that issued them can say whether they are still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Epoch gate for the list-loading channel.
///
/// Every list fetch calls [`RequestSequencer::begin_fetch`] before going to
/// the network and [`RequestSequencer::is_current`] before committing. Issuing
/// a new token invalidates every older one, whatever order they complete in.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self) -> RequestToken {
        self.latest = self.latest.wrapping_add(1);
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest != 0 && token.0 == self.latest
    }

    pub fn latest(&self) -> Option<RequestToken> {
        (self.latest != 0).then_some(RequestToken(self.latest))
    }

    /// Like [`Self::is_current`], but reports the discard as a `StaleResponse`.
    pub fn ensure_current(&self, token: RequestToken) -> Result<(), SyncError> {
        if self.is_current(token) {
            Ok(())
        } else {
            Err(SyncError::StaleResponse {
                token,
                latest: RequestToken(self.latest),
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/sequencer_tests.rs"]
mod tests;
