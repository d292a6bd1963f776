//! Key-value backend contracts.
//!
//! [`PlatformStorage`] is the minimal string store every platform can offer.
//! [`AdvancedPlatformStorage`] adds TTL writes, existence checks and pattern invalidation.
//! [`StorageBackend`] tags which of the two a concrete instance implements, resolved once when the
//! backend is wired rather than probed per call.

use std::{future::Future, pin::Pin, rc::Rc, time::Duration};

use crate::{error::StorageError, pattern::KeyPattern};

/// Object-safe boxed future used by storage contract async methods.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Result alias for backend operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Minimal string key-value backend.
///
/// Absence is `Ok(None)`. Platform failures are reported as [`StorageError`] values so the
/// service layer can log and absorb them; implementations must not panic on them.
pub trait PlatformStorage {
    /// Stable backend label for diagnostics.
    fn backend_name(&self) -> &'static str;

    /// Returns whether the platform API behind this backend is present and enabled.
    fn is_available(&self) -> bool;

    /// Writes `value` under `key`, replacing any previous value.
    fn set_item<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, StorageResult<()>>;

    /// Reads the value stored under `key`.
    fn get_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<Option<String>>>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<()>>;

    /// Removes every key held by this backend.
    fn clear<'a>(&'a self) -> StorageFuture<'a, StorageResult<()>>;

    /// Lists every key held by this backend.
    fn get_all_keys<'a>(&'a self) -> StorageFuture<'a, StorageResult<Vec<String>>>;
}

/// Backend with per-entry TTL and pattern-based bulk removal.
pub trait AdvancedPlatformStorage: PlatformStorage {
    /// Writes `value` under `key` with an optional time-to-live.
    fn set_item_with_ttl<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
        ttl: Option<Duration>,
    ) -> StorageFuture<'a, StorageResult<()>>;

    /// Returns whether a live entry exists for `key`.
    fn has_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<bool>>;

    /// Removes every key matching `pattern`, or every key when `pattern` is `None`.
    fn clear_pattern<'a>(
        &'a self,
        pattern: Option<&'a KeyPattern>,
    ) -> StorageFuture<'a, StorageResult<()>>;
}

/// Capability-tagged backend handle.
#[derive(Clone)]
pub enum StorageBackend {
    /// Backend limited to the [`PlatformStorage`] contract.
    Basic(Rc<dyn PlatformStorage>),
    /// Backend implementing [`AdvancedPlatformStorage`].
    Advanced(Rc<dyn AdvancedPlatformStorage>),
}

impl StorageBackend {
    /// Wraps a basic backend.
    pub fn basic(backend: impl PlatformStorage + 'static) -> Self {
        Self::Basic(Rc::new(backend))
    }

    /// Wraps an advanced backend.
    pub fn advanced(backend: impl AdvancedPlatformStorage + 'static) -> Self {
        Self::Advanced(Rc::new(backend))
    }

    /// Returns whether TTL writes are honored.
    pub const fn supports_ttl(&self) -> bool {
        matches!(self, Self::Advanced(_))
    }

    /// Stable label of the wrapped backend.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Basic(backend) => backend.backend_name(),
            Self::Advanced(backend) => backend.backend_name(),
        }
    }

    /// Availability of the wrapped backend.
    pub fn is_available(&self) -> bool {
        match self {
            Self::Basic(backend) => backend.is_available(),
            Self::Advanced(backend) => backend.is_available(),
        }
    }
}

impl std::fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match self {
            Self::Basic(_) => "Basic",
            Self::Advanced(_) => "Advanced",
        };
        f.debug_tuple(variant).field(&self.backend_name()).finish()
    }
}
