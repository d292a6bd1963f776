//! Capability-aware storage service.
//!
//! [`StorageService`] is the surface application code holds. It never fails for environmental
//! reasons: runtime errors from the backend are logged and turned into `None`, `false`, or a
//! no-op. When the backend reports itself unavailable, writes are skipped without logging and
//! reads come back empty, so callers can stay branch-free.

use std::time::Duration;

use leptos::logging;

use crate::{
    backend::{StorageBackend, StorageResult},
    error::StorageError,
    pattern::KeyPattern,
    provider::StorageProvider,
    time::next_monotonic_timestamp_ms,
    types::{StorageType, KEY_PREFIX_SEPARATOR},
};

/// Reserved key prefix for the scratch entries written by [`StorageService::health_check`].
///
/// Each check uses its own `__storage_health_probe__:<token>` key, and
/// [`StorageService::get_all_keys`] never lists keys of that shape.
pub const HEALTH_PROBE_KEY: &str = "__storage_health_probe__";

fn is_health_probe_key(key: &str) -> bool {
    key.strip_prefix(HEALTH_PROBE_KEY)
        .is_some_and(|rest| rest.starts_with(KEY_PREFIX_SEPARATOR))
}

/// Outcome of a [`StorageService::health_check`] probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageHealth {
    /// Storage type of the probed service.
    pub storage_type: StorageType,
    /// Backend label.
    pub backend: &'static str,
    /// Whether the backend reported itself available.
    pub available: bool,
    /// Whether a write/read/remove round trip returned the written value.
    pub round_trip: bool,
    /// First failure observed during the probe.
    pub error: Option<StorageError>,
}

impl StorageHealth {
    /// Returns whether the service is usable.
    pub fn is_healthy(&self) -> bool {
        self.available && self.round_trip
    }
}

/// Storage service bound to one [`StorageType`] for its whole lifetime.
#[derive(Debug, Clone)]
pub struct StorageService {
    storage_type: StorageType,
    provider: StorageProvider,
}

impl StorageService {
    /// Builds a service over a tagged backend.
    pub fn new(storage_type: StorageType, backend: StorageBackend) -> Self {
        Self {
            storage_type,
            provider: StorageProvider::new(backend),
        }
    }

    /// Storage type this service was created for.
    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    /// Returns whether the underlying platform storage is present and enabled.
    pub fn is_available(&self) -> bool {
        self.provider.backend().is_available()
    }

    /// Returns whether TTL arguments take effect on this service.
    pub fn supports_ttl(&self) -> bool {
        self.provider.supports_ttl()
    }

    /// Provider facade behind this service.
    pub fn provider(&self) -> &StorageProvider {
        &self.provider
    }

    /// Writes `value` under `key` without an explicit TTL.
    pub async fn set_item(&self, key: &str, value: &str) {
        self.set_item_with_ttl(key, value, None).await;
    }

    /// Writes `value` under `key` with an optional TTL.
    pub async fn set_item_with_ttl(&self, key: &str, value: &str, ttl: Option<Duration>) {
        if !self.is_available() {
            return;
        }
        if let Err(err) = self.provider.set(key, value, ttl).await {
            logging::warn!("{} storage write dropped: {err}", self.storage_type);
        }
    }

    /// Reads the live value stored under `key`.
    pub async fn get_item(&self, key: &str) -> Option<String> {
        if !self.is_available() {
            return None;
        }
        match self.provider.get(key).await {
            Ok(value) => value,
            Err(err) => {
                logging::warn!("{} storage read failed: {err}", self.storage_type);
                None
            }
        }
    }

    /// Reads `key`, keeping "absent" and "read failed" apart.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the backend is disabled, or the backend's own
    /// error when the read fails.
    pub async fn try_get_item(&self, key: &str) -> StorageResult<Option<String>> {
        if !self.is_available() {
            return Err(StorageError::Unavailable {
                backend: self.provider.backend().backend_name(),
            });
        }
        self.provider.get(key).await
    }

    /// Returns whether a live value exists for `key`.
    pub async fn has_item(&self, key: &str) -> bool {
        if !self.is_available() {
            return false;
        }
        self.provider.has(key).await.unwrap_or_else(|err| {
            logging::warn!("{} storage lookup failed: {err}", self.storage_type);
            false
        })
    }

    /// Removes `key`.
    pub async fn remove_item(&self, key: &str) {
        if !self.is_available() {
            return;
        }
        if let Err(err) = self.provider.remove(key).await {
            logging::warn!("{} storage remove failed: {err}", self.storage_type);
        }
    }

    /// Removes every key visible to this service.
    pub async fn clear(&self) {
        if !self.is_available() {
            return;
        }
        if let Err(err) = self.provider.clear().await {
            logging::warn!("{} storage clear failed: {err}", self.storage_type);
        }
    }

    /// Lists live keys, reclaiming expired entries along the way.
    pub async fn get_all_keys(&self) -> Vec<String> {
        if !self.is_available() {
            return Vec::new();
        }
        match self.provider.keys().await {
            Ok(mut keys) => {
                keys.retain(|key| !is_health_probe_key(key));
                keys
            }
            Err(err) => {
                logging::warn!("{} storage key listing failed: {err}", self.storage_type);
                Vec::new()
            }
        }
    }

    /// Removes keys matching `pattern`; `None` clears everything.
    pub async fn clear_pattern(&self, pattern: Option<&KeyPattern>) {
        if !self.is_available() {
            return;
        }
        if let Err(err) = self.provider.clear_pattern(pattern).await {
            logging::warn!("{} storage pattern clear failed: {err}", self.storage_type);
        }
    }

    /// Probes the backend with a write, read and remove of a fresh key under
    /// [`HEALTH_PROBE_KEY`].
    pub async fn health_check(&self) -> StorageHealth {
        let mut health = StorageHealth {
            storage_type: self.storage_type,
            backend: self.provider.backend().backend_name(),
            available: self.is_available(),
            round_trip: false,
            error: None,
        };
        if !health.available {
            health.error = Some(StorageError::Unavailable {
                backend: health.backend,
            });
            return health;
        }

        let token = next_monotonic_timestamp_ms().to_string();
        let probe_key = format!("{HEALTH_PROBE_KEY}{KEY_PREFIX_SEPARATOR}{token}");
        let ttl = self.supports_ttl().then_some(Duration::from_secs(60));
        let probe = async {
            self.provider.set(&probe_key, &token, ttl).await?;
            let read_back = self.provider.get(&probe_key).await?;
            self.provider.remove(&probe_key).await?;
            Ok::<_, StorageError>(read_back.as_deref() == Some(token.as_str()))
        };
        match probe.await {
            Ok(round_trip) => health.round_trip = round_trip,
            Err(err) => {
                logging::warn!("{} storage health probe failed: {err}", self.storage_type);
                health.error = Some(err);
            }
        }
        health
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        backend::{PlatformStorage, StorageFuture},
        expiring::ExpiringStorage,
        memory::{MemoryStorage, NoopStorage},
        time::ManualClock,
        types::StorageConfig,
    };

    /// Backend whose every operation fails, as a full or locked-down platform store would.
    #[derive(Debug, Default)]
    pub(crate) struct FailingStorage;

    impl PlatformStorage for FailingStorage {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn set_item<'a>(
            &'a self,
            key: &'a str,
            _value: &'a str,
        ) -> StorageFuture<'a, StorageResult<()>> {
            Box::pin(async move { Err(StorageError::write_failed(key, "QuotaExceededError")) })
        }

        fn get_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<Option<String>>> {
            Box::pin(async move { Err(StorageError::read_failed(key, "SecurityError")) })
        }

        fn remove_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<()>> {
            Box::pin(async move { Err(StorageError::read_failed(key, "SecurityError")) })
        }

        fn clear<'a>(&'a self) -> StorageFuture<'a, StorageResult<()>> {
            Box::pin(async { Err(StorageError::read_failed("*", "SecurityError")) })
        }

        fn get_all_keys<'a>(&'a self) -> StorageFuture<'a, StorageResult<Vec<String>>> {
            Box::pin(async { Err(StorageError::read_failed("*", "SecurityError")) })
        }
    }

    fn memory_service(clock: ManualClock) -> StorageService {
        let store = ExpiringStorage::with_clock(MemoryStorage::default(), StorageConfig::default(), clock);
        StorageService::new(StorageType::Memory, StorageBackend::advanced(store))
    }

    #[test]
    fn service_reports_type_and_availability() {
        let service = memory_service(ManualClock::starting_at(0));
        assert_eq!(service.storage_type(), StorageType::Memory);
        assert!(service.is_available());
        assert!(service.supports_ttl());
    }

    #[test]
    fn unavailable_service_is_a_silent_no_op() {
        let service = StorageService::new(StorageType::Local, StorageBackend::basic(NoopStorage));
        assert!(!service.is_available());

        block_on(service.set_item("k", "v"));
        block_on(service.set_item_with_ttl("k", "v", Some(Duration::from_secs(1))));
        block_on(service.remove_item("k"));
        block_on(service.clear());
        block_on(service.clear_pattern(Some(&KeyPattern::new("*"))));
        assert_eq!(block_on(service.get_item("k")), None);
        assert!(!block_on(service.has_item("k")));
        assert!(block_on(service.get_all_keys()).is_empty());
        assert_eq!(
            block_on(service.try_get_item("k")),
            Err(StorageError::Unavailable { backend: "noop" })
        );
    }

    #[test]
    fn backend_failures_are_absorbed_into_soft_signals() {
        let service = StorageService::new(
            StorageType::Local,
            StorageBackend::basic(FailingStorage),
        );

        block_on(service.set_item("k", "v"));
        block_on(service.remove_item("k"));
        block_on(service.clear());
        block_on(service.clear_pattern(Some(&KeyPattern::new("k*"))));
        assert_eq!(block_on(service.get_item("k")), None);
        assert!(!block_on(service.has_item("k")));
        assert!(block_on(service.get_all_keys()).is_empty());
    }

    #[test]
    fn try_get_item_distinguishes_absent_from_failed() {
        let healthy = memory_service(ManualClock::starting_at(0));
        assert_eq!(block_on(healthy.try_get_item("missing")), Ok(None));

        let failing = StorageService::new(
            StorageType::Local,
            StorageBackend::basic(FailingStorage),
        );
        assert!(matches!(
            block_on(failing.try_get_item("k")),
            Err(StorageError::ReadFailed { .. })
        ));
    }

    #[test]
    fn has_item_and_get_item_agree_for_live_and_expired_keys() {
        let clock = ManualClock::starting_at(0);
        let service = memory_service(clock.clone());
        block_on(service.set_item_with_ttl("short", "1", Some(Duration::from_millis(5))));
        block_on(service.set_item("plain", "2"));

        for key in ["short", "plain", "missing"] {
            assert_eq!(
                block_on(service.has_item(key)),
                block_on(service.get_item(key)).is_some()
            );
        }
        clock.advance(Duration::from_millis(6));
        for key in ["short", "plain", "missing"] {
            assert_eq!(
                block_on(service.has_item(key)),
                block_on(service.get_item(key)).is_some()
            );
        }
        assert!(!block_on(service.has_item("short")));
    }

    #[test]
    fn health_check_round_trips_and_cleans_up() {
        let service = memory_service(ManualClock::starting_at(0));
        let health = block_on(service.health_check());
        assert!(health.is_healthy());
        assert_eq!(health.backend, "memory");
        assert_eq!(health.error, None);
        assert!(block_on(service.get_all_keys()).is_empty());
    }

    #[test]
    fn health_check_reports_failures() {
        let service = StorageService::new(
            StorageType::Session,
            StorageBackend::basic(FailingStorage),
        );
        let health = block_on(service.health_check());
        assert!(health.available);
        assert!(!health.round_trip);
        assert!(matches!(health.error, Some(StorageError::WriteFailed { .. })));

        let service = StorageService::new(StorageType::Session, StorageBackend::basic(NoopStorage));
        let health = block_on(service.health_check());
        assert!(!health.is_healthy());
        assert_eq!(health.error, Some(StorageError::Unavailable { backend: "noop" }));
    }

    #[test]
    fn health_check_leaves_user_keys_untouched() {
        let service = memory_service(ManualClock::starting_at(0));
        block_on(service.set_item(HEALTH_PROBE_KEY, "mine"));

        assert!(block_on(service.health_check()).is_healthy());
        assert!(block_on(service.health_check()).is_healthy());
        assert_eq!(
            block_on(service.get_item(HEALTH_PROBE_KEY)),
            Some("mine".to_string())
        );
    }

    #[test]
    fn health_check_on_basic_backend_round_trips() {
        let backend = MemoryStorage::default();
        let service = StorageService::new(StorageType::Memory, StorageBackend::basic(backend.clone()));
        let health = block_on(service.health_check());
        assert!(health.is_healthy());
        assert!(backend.is_empty());
    }

    #[test]
    fn key_listing_hides_health_check_scratch_entries() {
        let backend = MemoryStorage::default();
        let service = StorageService::new(StorageType::Memory, StorageBackend::basic(backend.clone()));
        block_on(backend.set_item("__storage_health_probe__:1700000000000", "1")).expect("seed");
        block_on(backend.set_item("__storage_health_probe__", "2")).expect("seed");
        block_on(backend.set_item("__storage_health_probe__x", "3")).expect("seed");
        block_on(backend.set_item("visible", "4")).expect("seed");

        assert_eq!(
            block_on(service.get_all_keys()),
            vec![
                "__storage_health_probe__".to_string(),
                "__storage_health_probe__x".to_string(),
                "visible".to_string()
            ]
        );
    }
}
