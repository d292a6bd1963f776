//! Persisted entry envelope written by TTL-capable stores.
//!
//! Raw platform storage holds the JSON form of [`StoredEntry`], not the bare value:
//!
//! ```json
//! {"value":"1","createdAt":1700000000000,"ttl":50}
//! ```
//!
//! `ttl` is omitted for entries without expiry. `encoding` is present only for compressed values.

use std::{
    io::{Read, Write},
    time::Duration,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Transformation applied to [`StoredEntry::value`] before it was persisted.
pub enum ValueEncoding {
    /// Raw deflate stream, base64 (standard alphabet, padded).
    #[serde(rename = "deflate-base64")]
    DeflateBase64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// One stored value plus the bookkeeping needed for lazy expiration.
pub struct StoredEntry {
    /// Stored value, possibly encoded according to [`StoredEntry::encoding`].
    pub value: String,
    /// Write time in unix milliseconds.
    pub created_at: u64,
    /// Time-to-live in milliseconds, counted from `created_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    /// Value transformation, when one was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<ValueEncoding>,
}

impl StoredEntry {
    /// Builds a plain entry stamped at `created_at`.
    pub fn new(value: impl Into<String>, created_at: u64, ttl: Option<Duration>) -> Self {
        Self {
            value: value.into(),
            created_at,
            ttl: ttl.map(duration_ms),
            encoding: None,
        }
    }

    /// Builds an entry whose value is deflated and base64-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] when the deflate stream cannot be written.
    pub fn compressed(
        key: &str,
        value: &str,
        created_at: u64,
        ttl: Option<Duration>,
    ) -> Result<Self, StorageError> {
        let fail = |err: std::io::Error| StorageError::Serialization {
            key: key.to_string(),
            reason: err.to_string(),
        };
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(value.as_bytes()).map_err(fail)?;
        let deflated = encoder.finish().map_err(fail)?;
        Ok(Self {
            value: STANDARD.encode(deflated),
            created_at,
            ttl: ttl.map(duration_ms),
            encoding: Some(ValueEncoding::DeflateBase64),
        })
    }

    /// Returns whether the entry may still be returned by reads at `now_ms`.
    pub fn is_live_at(&self, now_ms: u64) -> bool {
        match self.ttl {
            Some(ttl) => now_ms.saturating_sub(self.created_at) <= ttl,
            None => true,
        }
    }

    /// Serializes the envelope to its persisted JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if JSON encoding fails.
    pub fn to_json(&self, key: &str) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|err| StorageError::Serialization {
            key: key.to_string(),
            reason: err.to_string(),
        })
    }

    /// Parses persisted text. Returns `None` when `raw` is not an envelope.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Returns the decoded value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Deserialization`] when a compressed payload is corrupt.
    pub fn decoded_value(&self, key: &str) -> Result<String, StorageError> {
        let Some(ValueEncoding::DeflateBase64) = self.encoding else {
            return Ok(self.value.clone());
        };
        let fail = |reason: String| StorageError::Deserialization {
            key: key.to_string(),
            reason,
        };
        let deflated = STANDARD
            .decode(self.value.as_bytes())
            .map_err(|err| fail(err.to_string()))?;
        let mut value = String::new();
        DeflateDecoder::new(deflated.as_slice())
            .read_to_string(&mut value)
            .map_err(|err| fail(err.to_string()))?;
        Ok(value)
    }
}

fn duration_ms(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}
