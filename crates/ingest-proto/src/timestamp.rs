//! Second-precision UTC timestamps on the wire.
//!
//! The server requires timezone-aware ISO-8601 and the deployment tooling
//! requires that every timestamp it emits within one run is textually
//! identical, so serialization is pinned to `YYYY-MM-DDTHH:MM:SSZ` instead of
//! chrono's default (which keeps sub-second digits and a `+00:00` offset).

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Render a timestamp in the wire format (`2026-08-25T12:00:00Z`).
pub fn to_wire(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Drop sub-second precision so a round-trip through [`to_wire`] is lossless.
pub fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    // with_nanosecond(0) only fails for out-of-range values, which 0 is not.
    dt.with_nanosecond(0).unwrap_or(dt)
}

pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_wire(dt))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}
