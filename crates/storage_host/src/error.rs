//! Error taxonomy shared by storage backends, services and the factory.

use thiserror::Error;

use crate::types::StorageType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Structured storage failures.
///
/// Only [`StorageError::UnsupportedStorageType`] is meant to reach application code as a hard
/// failure. Every other variant is produced at the backend seam and absorbed by
/// [`crate::StorageService`] into a soft signal (`None`, `false`, or a no-op) plus a log line.
pub enum StorageError {
    /// The platform storage API is missing or disabled.
    #[error("storage backend `{backend}` is unavailable")]
    Unavailable {
        /// Stable backend label used in diagnostics.
        backend: &'static str,
    },
    /// A write was rejected by the platform (quota exceeded, access denied).
    #[error("write to `{key}` failed: {reason}")]
    WriteFailed {
        /// Physical key that was being written.
        key: String,
        /// Platform-provided failure description.
        reason: String,
    },
    /// A read, enumeration or removal failed in the platform layer.
    #[error("read of `{key}` failed: {reason}")]
    ReadFailed {
        /// Physical key (or `*` for whole-store operations).
        key: String,
        /// Platform-provided failure description.
        reason: String,
    },
    /// A stored string could not be decoded.
    #[error("stored value for `{key}` could not be decoded: {reason}")]
    Deserialization {
        /// Logical key holding the undecodable value.
        key: String,
        /// Decoder failure description.
        reason: String,
    },
    /// A value could not be encoded for storage.
    #[error("value for `{key}` could not be encoded: {reason}")]
    Serialization {
        /// Logical key the value was destined for.
        key: String,
        /// Encoder failure description.
        reason: String,
    },
    /// The factory has no backend registered for the requested type.
    #[error("no storage backend registered for `{}`", .0.as_str())]
    UnsupportedStorageType(StorageType),
}

impl StorageError {
    /// Builds a [`StorageError::WriteFailed`] from any displayable platform error.
    pub fn write_failed(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::WriteFailed {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds a [`StorageError::ReadFailed`] from any displayable platform error.
    pub fn read_failed(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ReadFailed {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns whether this error is a wiring defect rather than a runtime condition.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::UnsupportedStorageType(_))
    }
}
