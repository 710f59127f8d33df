//! Error types for directory reconciliation.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Failures surfaced by the directory client and the reconciliation engine.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The remote API signalled its global rate limit (HTTP 429).
    ///
    /// The only retryable failure: everything else surfaces immediately.
    #[error("rate limited by the directory API (retry after {retry_after_secs:?}s)")]
    RateLimited {
        /// Optional `Retry-After` hint from the response, in seconds.
        retry_after_secs: Option<u64>,
    },

    /// The API answered 2xx but the result envelope did not report success.
    ///
    /// The platform can return 200 with a failure payload; callers must not
    /// treat HTTP success as operation success.
    #[error("directory API rejected the request: {message}")]
    Rejected { message: String },

    /// Non-2xx response with an explicit failure payload (bad request,
    /// duplicate user, and friends).
    #[error("directory API error (status {status}): {detail}")]
    Remote { status: u16, detail: String },

    /// Authentication failed (401) — the bearer token is missing scope,
    /// expired, or revoked.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Network-level failure (connect, timeout, TLS). Non-retryable by
    /// design: only rate limiting triggers the backoff loop.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected shape.
    #[error("failed to parse directory response: {0}")]
    Parse(String),

    /// The backoff loop hit its cap without the operation succeeding.
    #[error("{message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// The input roster is missing or unreadable. Pass-fatal: nothing is
    /// applied remotely when this fires.
    #[error("cannot read roster '{path}': {source}")]
    Roster {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// The audit sink could not be opened or written.
    #[error("audit log '{path}': {source}")]
    Audit {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Client construction problems (bad base URL, HTTP client build).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DirectoryError {
    /// Whether this failure should re-enter the backoff loop.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
