//! Caller-controlled cancellation and deadline for a verification.
//!
//! Content-network latency is unbounded, so nothing here applies a timeout
//! on its own. The caller decides.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Cancellation token plus optional deadline for the retrieval step.
#[derive(Debug, Clone, Default)]
pub struct Abort {
    token: CancellationToken,
    deadline: Option<Duration>,
}

impl Abort {
    /// No cancellation source and no deadline.
    pub fn none() -> Self {
        Self::default()
    }

    /// Abort when `token` is cancelled.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Give retrieval at most `limit` to produce bytes, or clear the limit.
    pub fn with_deadline(mut self, limit: Option<Duration>) -> Self {
        self.deadline = limit;
        self
    }

    /// The configured deadline, if any.
    pub fn limit(&self) -> Option<Duration> {
        self.deadline
    }

    /// The underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancel every verification sharing this token.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
