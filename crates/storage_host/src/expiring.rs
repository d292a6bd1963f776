//! TTL and pattern-invalidation engine over any [`PlatformStorage`] backend.
//!
//! Expiration is cooperative: an entry's TTL is checked only when the entry is read
//! (`get_item`, `has_item`) or enumerated (`get_all_keys`). Expired entries found on those paths
//! are deleted from the underlying backend. No timer runs in the background, so an entry that is
//! never touched again keeps its slot until the next `get_all_keys` sweep.

use std::time::Duration;

use leptos::logging;

use crate::{
    backend::{AdvancedPlatformStorage, PlatformStorage, StorageFuture, StorageResult},
    envelope::StoredEntry,
    pattern::KeyPattern,
    time::{Clock, SystemClock},
    types::StorageConfig,
};

/// Advanced storage built from a basic backend by persisting [`StoredEntry`] envelopes.
///
/// Keys passed to this type are logical keys; the configured prefix is applied on the way down and
/// stripped on the way up. Without a prefix, `clear` delegates to the backend's own `clear`; with
/// one, it removes only keys inside the namespace.
#[derive(Debug, Clone)]
pub struct ExpiringStorage<B, C = SystemClock> {
    backend: B,
    config: StorageConfig,
    clock: C,
}

impl<B: PlatformStorage> ExpiringStorage<B> {
    /// Wraps `backend` using the wall clock.
    pub fn new(backend: B, config: StorageConfig) -> Self {
        Self::with_clock(backend, config, SystemClock)
    }
}

impl<B: PlatformStorage, C: Clock> ExpiringStorage<B, C> {
    /// Wraps `backend` using an explicit clock source.
    pub fn with_clock(backend: B, config: StorageConfig, clock: C) -> Self {
        Self {
            backend,
            config,
            clock,
        }
    }

    /// Configuration applied by this store.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Underlying basic backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn write(&self, key: &str, value: &str, ttl: Option<Duration>) -> StorageResult<()> {
        let ttl = ttl.or(self.config.default_ttl);
        let now = self.clock.now_ms();
        let entry = if self.config.compression {
            StoredEntry::compressed(key, value, now, ttl)?
        } else {
            StoredEntry::new(value, now, ttl)
        };
        let raw = entry.to_json(key)?;
        self.backend
            .set_item(&self.config.physical_key(key), &raw)
            .await
    }

    /// Loads and decodes the live value stored at `physical`.
    ///
    /// Strings that are not envelopes are surfaced as live values without TTL. Expired entries
    /// and entries whose payload no longer decodes are deleted and reported absent, so reads,
    /// existence checks and key listings always agree.
    async fn load_live(&self, physical: &str) -> StorageResult<Option<String>> {
        let Some(raw) = self.backend.get_item(physical).await? else {
            return Ok(None);
        };
        let Some(entry) = StoredEntry::from_json(&raw) else {
            return Ok(Some(raw));
        };
        if entry.is_live_at(self.clock.now_ms()) {
            match entry.decoded_value(physical) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => logging::warn!("dropping undecodable entry: {err}"),
            }
        }
        self.backend.remove_item(physical).await?;
        Ok(None)
    }

    /// Physical keys inside this store's namespace, paired with their logical form.
    async fn namespaced_keys(&self) -> StorageResult<Vec<(String, String)>> {
        let keys = self.backend.get_all_keys().await?;
        Ok(keys
            .into_iter()
            .filter_map(|physical| {
                let logical = self.config.logical_key(&physical)?.to_string();
                Some((physical, logical))
            })
            .collect())
    }

    async fn sweep(&self) -> StorageResult<Vec<String>> {
        let mut live = Vec::new();
        for (physical, logical) in self.namespaced_keys().await? {
            match self.load_live(&physical).await {
                Ok(Some(_)) => live.push(logical),
                Ok(None) => {}
                Err(err) => logging::warn!("skipping `{logical}` during key sweep: {err}"),
            }
        }
        live.sort();
        Ok(live)
    }

    /// Removes matching keys, continuing past individual failures.
    ///
    /// Returns the first removal error after every other matching key has been attempted.
    async fn remove_matching(&self, pattern: Option<&KeyPattern>) -> StorageResult<()> {
        if pattern.is_none() && self.config.prefix.is_none() {
            return self.backend.clear().await;
        }
        let mut first_error = None;
        for (physical, logical) in self.namespaced_keys().await? {
            if !pattern.map_or(true, |pattern| pattern.matches(&logical)) {
                continue;
            }
            if let Err(err) = self.backend.remove_item(&physical).await {
                logging::warn!("skipping `{logical}` during pattern clear: {err}");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl<B: PlatformStorage, C: Clock> PlatformStorage for ExpiringStorage<B, C> {
    fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    fn set_item<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move { self.write(key, value, None).await })
    }

    fn get_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<Option<String>>> {
        Box::pin(async move { self.load_live(&self.config.physical_key(key)).await })
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.backend
                .remove_item(&self.config.physical_key(key))
                .await
        })
    }

    fn clear<'a>(&'a self) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move { self.remove_matching(None).await })
    }

    fn get_all_keys<'a>(&'a self) -> StorageFuture<'a, StorageResult<Vec<String>>> {
        Box::pin(async move { self.sweep().await })
    }
}

impl<B: PlatformStorage, C: Clock> AdvancedPlatformStorage for ExpiringStorage<B, C> {
    fn set_item_with_ttl<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
        ttl: Option<Duration>,
    ) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move { self.write(key, value, ttl).await })
    }

    fn has_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<bool>> {
        Box::pin(async move {
            let entry = self.load_live(&self.config.physical_key(key)).await?;
            Ok(entry.is_some())
        })
    }

    fn clear_pattern<'a>(
        &'a self,
        pattern: Option<&'a KeyPattern>,
    ) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move { self.remove_matching(pattern).await })
    }
}
