//! Synchronous views over the async storage surface.
//!
//! Each call drives the async operation to completion on the current thread with
//! [`futures::executor::block_on`]. Use these views only over backends that complete without
//! yielding to an event loop (memory, web storage); a backend awaiting a JS promise would never
//! resolve on the browser main thread.

use std::time::Duration;

use futures::executor::block_on;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    pattern::KeyPattern,
    serialized::SerializedStorageService,
    service::{StorageHealth, StorageService},
};

/// Blocking view over a [`StorageService`].
#[derive(Debug, Clone, Copy)]
pub struct Blocking<'a> {
    service: &'a StorageService,
}

impl StorageService {
    /// Returns a synchronous view of this service.
    pub fn blocking(&self) -> Blocking<'_> {
        Blocking { service: self }
    }
}

impl Blocking<'_> {
    /// See [`StorageService::set_item`].
    pub fn set_item(&self, key: &str, value: &str) {
        block_on(self.service.set_item(key, value));
    }

    /// See [`StorageService::set_item_with_ttl`].
    pub fn set_item_with_ttl(&self, key: &str, value: &str, ttl: Option<Duration>) {
        block_on(self.service.set_item_with_ttl(key, value, ttl));
    }

    /// See [`StorageService::get_item`].
    pub fn get_item(&self, key: &str) -> Option<String> {
        block_on(self.service.get_item(key))
    }

    /// See [`StorageService::has_item`].
    pub fn has_item(&self, key: &str) -> bool {
        block_on(self.service.has_item(key))
    }

    /// See [`StorageService::remove_item`].
    pub fn remove_item(&self, key: &str) {
        block_on(self.service.remove_item(key));
    }

    /// See [`StorageService::clear`].
    pub fn clear(&self) {
        block_on(self.service.clear());
    }

    /// See [`StorageService::get_all_keys`].
    pub fn get_all_keys(&self) -> Vec<String> {
        block_on(self.service.get_all_keys())
    }

    /// See [`StorageService::clear_pattern`].
    pub fn clear_pattern(&self, pattern: Option<&KeyPattern>) {
        block_on(self.service.clear_pattern(pattern));
    }

    /// See [`StorageService::health_check`].
    pub fn health_check(&self) -> StorageHealth {
        block_on(self.service.health_check())
    }
}

/// Blocking view over a [`SerializedStorageService`].
#[derive(Debug, Clone, Copy)]
pub struct BlockingObjects<'a> {
    objects: &'a SerializedStorageService,
}

impl SerializedStorageService {
    /// Returns a synchronous view of this service.
    pub fn blocking(&self) -> BlockingObjects<'_> {
        BlockingObjects { objects: self }
    }
}

impl BlockingObjects<'_> {
    /// See [`SerializedStorageService::set_object`].
    pub fn set_object<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        block_on(self.objects.set_object(key, value));
    }

    /// See [`SerializedStorageService::set_object_with_ttl`].
    pub fn set_object_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) {
        block_on(self.objects.set_object_with_ttl(key, value, ttl));
    }

    /// See [`SerializedStorageService::get_object`].
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        block_on(self.objects.get_object(key))
    }

    /// See [`SerializedStorageService::has_object`].
    pub fn has_object(&self, key: &str) -> bool {
        block_on(self.objects.has_object(key))
    }

    /// See [`SerializedStorageService::remove_object`].
    pub fn remove_object(&self, key: &str) {
        block_on(self.objects.remove_object(key));
    }
}
