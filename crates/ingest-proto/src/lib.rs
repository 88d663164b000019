//! Wire types for the device-ingest envelope (schema version 1).
//!
//! The ingest API and its deployment tooling share this vocabulary: an
//! [`Envelope`] carries zero or more [`DeviceRecord`]s plus a sender timestamp
//! and an optional client request id. Validation rules mirror what the server
//! enforces, so a client that validates before sending never gets a 400 back
//! for shape reasons.

mod envelope;
pub mod timestamp;

pub use envelope::{DeviceRecord, Envelope, ProtoError};

// ---------------------------------------------------------------------------
// Schema constants
// ---------------------------------------------------------------------------

/// Envelope schema version accepted by the v1 endpoints.
pub const SCHEMA_VERSION: u32 = 1;

/// Protocol types the registry knows about (stored lowercase).
pub const ALLOWED_PROTOCOLS: [&str; 4] = ["rps", "pms", "css", "dss"];

/// Device serial number length bounds (inclusive).
pub const SERIAL_MIN_LEN: usize = 16;
pub const SERIAL_MAX_LEN: usize = 24;

/// Maximum number of items per envelope.
pub const MAX_ITEMS: usize = 100;

/// Maximum length of a client request id.
pub const CLIENT_REQUEST_ID_MAX_LEN: usize = 128;
