//! Identity token generators
//!
//! Opaque tokens that stand in for device and session identity. They are
//! generated once per [`ClientIdentity`](super::ClientIdentity) and never
//! regenerated afterwards.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// First millisecond of 2015, the epoch snowflakes count from
pub const SNOWFLAKE_EPOCH_MS: i64 = 1_420_070_400_000;

/// Bits below the timestamp in a snowflake
const TIMESTAMP_SHIFT: u32 = 22;

/// Time-ordered 64-bit identifier
///
/// Client-generated snowflakes carry only the timestamp part; worker,
/// process and increment bits stay zero, which is what the web client emits
/// for message and interaction nonces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snowflake(u64);

impl Snowflake {
    /// Snowflake for the current instant
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Snowflake for the given instant; instants before the epoch clamp to zero
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        let elapsed = (at.timestamp_millis() - SNOWFLAKE_EPOCH_MS).max(0) as u64;
        Self(elapsed << TIMESTAMP_SHIFT)
    }

    /// Wrap a raw value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw 64-bit value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Instant encoded in the timestamp bits
    pub fn timestamp(&self) -> DateTime<Utc> {
        let millis = (self.0 >> TIMESTAMP_SHIFT) as i64 + SNOWFLAKE_EPOCH_MS;
        DateTime::from_timestamp_millis(millis).unwrap_or_default()
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

// Snowflakes travel as JSON strings; 64-bit integers lose precision in JS.
impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-device fingerprint token, presented as `x-fingerprint`
///
/// Format: `{snowflake}.{27 url-safe base64 characters}`, matching the tokens
/// the service hands out from its experiments endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Generate a fresh fingerprint
    pub fn generate() -> Self {
        let entropy: [u8; 20] = rand::random();
        Self(format!(
            "{}.{}",
            Snowflake::now(),
            URL_SAFE_NO_PAD.encode(entropy)
        ))
    }

    /// Use a fingerprint previously issued by the service
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Token text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session-unique identifier (random UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionUid(Uuid);

impl SessionUid {
    /// Generate a fresh session id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
