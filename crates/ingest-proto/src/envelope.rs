use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    ALLOWED_PROTOCOLS, CLIENT_REQUEST_ID_MAX_LEN, MAX_ITEMS, SCHEMA_VERSION, SERIAL_MAX_LEN,
    SERIAL_MIN_LEN, timestamp,
};

/// Validation failure for an envelope or one of its items.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtoError {
    #[error("serial_number must be {SERIAL_MIN_LEN}..={SERIAL_MAX_LEN} chars, got {0}")]
    SerialLength(usize),

    #[error("protocol_type must be one of rps, pms, css, dss, got '{0}'")]
    UnknownProtocol(String),

    #[error("token must not be empty")]
    EmptyToken,

    #[error("client_request_id must be at most {CLIENT_REQUEST_ID_MAX_LEN} chars of [A-Za-z0-9._-], got '{0}'")]
    InvalidClientRequestId(String),

    #[error("items must have at most {MAX_ITEMS} entries, got {0}")]
    TooManyItems(usize),
}

/// One device registration record.
///
/// `location` is nullable on the wire; the server keeps the previous value
/// when it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub serial_number: String,
    pub location: Option<String>,
    pub protocol_type: String,
    pub token: String,
    #[serde(with = "timestamp")]
    pub token_created_at: DateTime<Utc>,
}

impl DeviceRecord {
    /// Check the field rules the server enforces per item.
    pub fn validate(&self) -> Result<(), ProtoError> {
        let serial_len = self.serial_number.chars().count();
        if !(SERIAL_MIN_LEN..=SERIAL_MAX_LEN).contains(&serial_len) {
            return Err(ProtoError::SerialLength(serial_len));
        }
        let proto = self.protocol_type.to_ascii_lowercase();
        if !ALLOWED_PROTOCOLS.contains(&proto.as_str()) {
            return Err(ProtoError::UnknownProtocol(self.protocol_type.clone()));
        }
        if self.token.is_empty() {
            return Err(ProtoError::EmptyToken);
        }
        Ok(())
    }
}

/// The v1 ingest envelope.
///
/// Field order matches the JSON the endpoints document: schema version first,
/// then the sender timestamp, the optional request id, and the item list. A
/// zero-item envelope is the dry-run "ping" shape accepted by the test
/// endpoint; the real ingest endpoint requires at least one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub schema_version: u32,
    #[serde(with = "timestamp")]
    pub sent_at: DateTime<Utc>,
    pub client_request_id: Option<String>,
    pub items: Vec<DeviceRecord>,
}

impl Envelope {
    /// Zero-item envelope for the dry-run endpoint.
    pub fn ping(sent_at: DateTime<Utc>, client_request_id: &str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sent_at,
            client_request_id: Some(client_request_id.to_string()),
            items: Vec::new(),
        }
    }

    /// One-item envelope (smoke-test shape).
    pub fn single(sent_at: DateTime<Utc>, client_request_id: &str, record: DeviceRecord) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sent_at,
            client_request_id: Some(client_request_id.to_string()),
            items: vec![record],
        }
    }

    /// Check envelope-level rules plus every item.
    pub fn validate(&self) -> Result<(), ProtoError> {
        if let Some(id) = &self.client_request_id
            && !is_valid_client_request_id(id)
        {
            return Err(ProtoError::InvalidClientRequestId(id.clone()));
        }
        if self.items.len() > MAX_ITEMS {
            return Err(ProtoError::TooManyItems(self.items.len()));
        }
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }
}

/// Request ids are limited to 128 chars of `[A-Za-z0-9._-]`.
fn is_valid_client_request_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= CLIENT_REQUEST_ID_MAX_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-')
}
