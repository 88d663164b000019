//! The deployment epoch: one instant shared by the whole run.

use chrono::{DateTime, Utc};
use ingest_proto::timestamp;

/// Timestamp captured once at startup and reused by every request and log
/// query in the run.
///
/// Stored at second precision so that `sent_at`, `token_created_at`, and the
/// journal window all name the same instant with the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployEpoch {
    instant: DateTime<Utc>,
}

impl DeployEpoch {
    pub fn now() -> Self {
        Self::from_instant(Utc::now())
    }

    /// Pin the epoch to a known instant. Sub-second precision is dropped.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            instant: timestamp::truncate_to_seconds(instant),
        }
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Wire rendering, e.g. `2026-08-25T12:00:00Z`.
    pub fn iso8601(&self) -> String {
        timestamp::to_wire(&self.instant)
    }

    /// journalctl `--since` rendering of the same instant,
    /// e.g. `2026-08-25 12:00:00 UTC`.
    pub fn journal_since(&self) -> String {
        self.instant.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}
