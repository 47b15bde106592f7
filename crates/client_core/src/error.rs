use std::fmt;

use thiserror::Error;

use crate::sequencer::RequestToken;

/// Remote call a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchItems { page: u32 },
    LoadSelected,
    SaveSelected,
    Reorder,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::FetchItems { page } => write!(f, "fetch items page {page}"),
            Operation::LoadSelected => f.write_str("load selection"),
            Operation::SaveSelected => f.write_str("save selection"),
            Operation::Reorder => f.write_str("reorder"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("network failure during {operation}: {message}")]
    NetworkFailure {
        operation: Operation,
        message: String,
    },
    #[error("stale response for request {token} (latest is {latest})")]
    StaleResponse {
        token: RequestToken,
        latest: RequestToken,
    },
}

impl SyncError {
    pub fn network(operation: Operation, err: impl fmt::Display) -> Self {
        Self::NetworkFailure {
            operation,
            message: err.to_string(),
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, SyncError::StaleResponse { .. })
    }
}

impl From<(Operation, reqwest::Error)> for SyncError {
    fn from((operation, err): (Operation, reqwest::Error)) -> Self {
        let message = match err.status() {
            Some(status) => format!("server returned {status}"),
            None if err.is_timeout() => "request timed out".to_string(),
            None if err.is_decode() => format!("malformed response body: {err}"),
            None => err.to_string(),
        };
        Self::NetworkFailure { operation, message }
    }
}
