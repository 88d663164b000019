//! Fixed budgets and identifiers shared across the sequence.

// -----------------------------------------------------------------------------
// Health poll

/// Attempts before the poll gives up and control falls through to the
/// gating fetch.
pub const HEALTH_POLL_ATTEMPTS: u32 = 20;

/// Pause between poll attempts, in milliseconds.
pub const HEALTH_POLL_INTERVAL_MS: u64 = 500;

// -----------------------------------------------------------------------------
// HTTP client

/// Connect timeout for probe requests, in seconds.
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Overall request timeout for probe requests, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// -----------------------------------------------------------------------------
// Probe identity

/// `client_request_id` of the zero-item dry-run envelope.
pub const PING_REQUEST_ID: &str = "deploy-ping";

/// `client_request_id` of the single-record smoke envelope.
pub const SMOKE_REQUEST_ID: &str = "deploy-smoke";

// -----------------------------------------------------------------------------
// Journal tail

/// Most-recent lines fetched per unit by the final tail.
pub const JOURNAL_TAIL_LINES: u32 = 80;
