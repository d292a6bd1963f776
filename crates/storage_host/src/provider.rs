//! Uniform access over basic and advanced backends.

use std::time::Duration;

use leptos::logging;

use crate::{
    backend::{StorageBackend, StorageResult},
    pattern::KeyPattern,
};

/// Facade that lets callers issue TTL-aware writes regardless of backend capability.
///
/// On a [`StorageBackend::Basic`] backend the TTL argument is dropped, `has` is answered with a
/// read, and `clear_pattern` enumerates keys and removes the matches one by one.
#[derive(Debug, Clone)]
pub struct StorageProvider {
    backend: StorageBackend,
}

impl StorageProvider {
    /// Builds a provider over an already-tagged backend.
    pub fn new(backend: StorageBackend) -> Self {
        Self { backend }
    }

    /// Tagged backend behind this provider.
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Returns whether `ttl` arguments take effect.
    pub fn supports_ttl(&self) -> bool {
        self.backend.supports_ttl()
    }

    /// Writes `value` under `key`, forwarding `ttl` when the backend honors it.
    pub async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StorageResult<()> {
        match &self.backend {
            StorageBackend::Advanced(store) => store.set_item_with_ttl(key, value, ttl).await,
            StorageBackend::Basic(store) => {
                if let Some(ttl) = ttl {
                    logging::debug_warn!(
                        "{} backend ignores ttl {ttl:?} for `{key}`",
                        store.backend_name()
                    );
                }
                store.set_item(key, value).await
            }
        }
    }

    /// Reads the value stored under `key`.
    pub async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match &self.backend {
            StorageBackend::Advanced(store) => store.get_item(key).await,
            StorageBackend::Basic(store) => store.get_item(key).await,
        }
    }

    /// Removes `key`.
    pub async fn remove(&self, key: &str) -> StorageResult<()> {
        match &self.backend {
            StorageBackend::Advanced(store) => store.remove_item(key).await,
            StorageBackend::Basic(store) => store.remove_item(key).await,
        }
    }

    /// Removes every key.
    pub async fn clear(&self) -> StorageResult<()> {
        match &self.backend {
            StorageBackend::Advanced(store) => store.clear().await,
            StorageBackend::Basic(store) => store.clear().await,
        }
    }

    /// Lists stored keys. Advanced backends only list live keys.
    pub async fn keys(&self) -> StorageResult<Vec<String>> {
        match &self.backend {
            StorageBackend::Advanced(store) => store.get_all_keys().await,
            StorageBackend::Basic(store) => store.get_all_keys().await,
        }
    }

    /// Returns whether a live value exists for `key`.
    pub async fn has(&self, key: &str) -> StorageResult<bool> {
        match &self.backend {
            StorageBackend::Advanced(store) => store.has_item(key).await,
            StorageBackend::Basic(store) => Ok(store.get_item(key).await?.is_some()),
        }
    }

    /// Removes keys matching `pattern`, or every key when `pattern` is `None`.
    pub async fn clear_pattern(&self, pattern: Option<&KeyPattern>) -> StorageResult<()> {
        match (&self.backend, pattern) {
            (StorageBackend::Advanced(store), pattern) => store.clear_pattern(pattern).await,
            (StorageBackend::Basic(store), None) => store.clear().await,
            (StorageBackend::Basic(store), Some(pattern)) => {
                for key in store.get_all_keys().await? {
                    if pattern.matches(&key) {
                        store.remove_item(&key).await?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::{
        expiring::ExpiringStorage,
        memory::MemoryStorage,
        time::ManualClock,
        types::StorageConfig,
    };

    #[test]
    fn basic_backend_ignores_ttl_without_failing() {
        let memory = MemoryStorage::default();
        let provider = StorageProvider::new(StorageBackend::basic(memory.clone()));
        assert!(!provider.supports_ttl());

        block_on(provider.set("k", "v", Some(Duration::from_millis(1)))).expect("set");
        assert_eq!(memory.raw("k"), Some("v".to_string()), "bare value, no envelope");
        assert_eq!(block_on(provider.get("k")).expect("get"), Some("v".to_string()));
        assert!(block_on(provider.has("k")).expect("has"));
    }

    #[test]
    fn advanced_backend_receives_ttl() {
        let clock = ManualClock::starting_at(0);
        let store = ExpiringStorage::with_clock(
            MemoryStorage::default(),
            StorageConfig::default(),
            clock.clone(),
        );
        let provider = StorageProvider::new(StorageBackend::advanced(store));
        assert!(provider.supports_ttl());

        block_on(provider.set("k", "v", Some(Duration::from_millis(10)))).expect("set");
        assert!(block_on(provider.has("k")).expect("has"));
        clock.advance(Duration::from_millis(11));
        assert_eq!(block_on(provider.get("k")).expect("get"), None);
    }

    #[test]
    fn basic_backend_clear_pattern_enumerates_and_removes() {
        let provider = StorageProvider::new(StorageBackend::basic(MemoryStorage::default()));
        for key in ["user:1", "user:2", "other"] {
            block_on(provider.set(key, "v", None)).expect("set");
        }

        block_on(provider.clear_pattern(Some(&KeyPattern::new("user:*")))).expect("clear pattern");
        assert_eq!(block_on(provider.keys()).expect("keys"), vec!["other".to_string()]);

        block_on(provider.clear_pattern(None)).expect("clear");
        assert!(block_on(provider.keys()).expect("keys").is_empty());
    }

    #[test]
    fn pass_throughs_reach_the_backend() {
        let memory = MemoryStorage::default();
        let provider = StorageProvider::new(StorageBackend::basic(memory.clone()));
        block_on(provider.set("a", "1", None)).expect("set");
        block_on(provider.set("b", "2", None)).expect("set");
        block_on(provider.remove("a")).expect("remove");
        assert_eq!(memory.raw("a"), None);
        block_on(provider.clear()).expect("clear");
        assert!(memory.is_empty());
    }
}
