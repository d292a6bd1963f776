//! In-memory and no-op reference backends.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::backend::{PlatformStorage, StorageFuture, StorageResult};

#[derive(Debug, Clone, Default)]
/// Volatile in-process key-value backend.
///
/// Clones share the same map. Nothing survives the process.
pub struct MemoryStorage {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Number of physical entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Reads a raw physical value without going through the async contract.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }
}

impl PlatformStorage for MemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn set_item<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn get_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<Option<String>>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }

    fn clear<'a>(&'a self) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.inner.borrow_mut().clear();
            Ok(())
        })
    }

    fn get_all_keys<'a>(&'a self) -> StorageFuture<'a, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let mut keys = self.inner.borrow().keys().cloned().collect::<Vec<_>>();
            keys.sort();
            Ok(keys)
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Backend for hosts where the requested storage does not exist.
///
/// Reports itself unavailable; reads are empty and writes are accepted and dropped.
pub struct NoopStorage;

impl PlatformStorage for NoopStorage {
    fn backend_name(&self) -> &'static str {
        "noop"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn set_item<'a>(
        &'a self,
        _key: &'a str,
        _value: &'a str,
    ) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn get_item<'a>(&'a self, _key: &'a str) -> StorageFuture<'a, StorageResult<Option<String>>> {
        Box::pin(async { Ok(None) })
    }

    fn remove_item<'a>(&'a self, _key: &'a str) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn clear<'a>(&'a self) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn get_all_keys<'a>(&'a self) -> StorageFuture<'a, StorageResult<Vec<String>>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn memory_storage_round_trip_overwrite_and_delete() {
        let store = MemoryStorage::default();
        let store_obj: &dyn PlatformStorage = &store;

        block_on(store_obj.set_item("a", "1")).expect("set");
        block_on(store_obj.set_item("a", "2")).expect("overwrite");
        block_on(store_obj.set_item("b", "3")).expect("set");
        assert_eq!(
            block_on(store_obj.get_item("a")).expect("get"),
            Some("2".to_string())
        );
        assert_eq!(
            block_on(store_obj.get_all_keys()).expect("keys"),
            vec!["a".to_string(), "b".to_string()]
        );

        block_on(store_obj.remove_item("a")).expect("remove");
        block_on(store_obj.remove_item("missing")).expect("remove missing");
        assert_eq!(block_on(store_obj.get_item("a")).expect("get"), None);

        block_on(store_obj.clear()).expect("clear");
        assert!(store.is_empty());
    }

    #[test]
    fn memory_storage_clones_share_state() {
        let store = MemoryStorage::default();
        let other = store.clone();
        block_on(store.set_item("k", "v")).expect("set");
        assert_eq!(other.raw("k"), Some("v".to_string()));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn noop_storage_is_unavailable_empty_and_successful() {
        let store = NoopStorage;
        let store_obj: &dyn PlatformStorage = &store;
        assert!(!store_obj.is_available());
        block_on(store_obj.set_item("k", "v")).expect("set");
        assert_eq!(block_on(store_obj.get_item("k")).expect("get"), None);
        assert_eq!(
            block_on(store_obj.get_all_keys()).expect("keys"),
            Vec::<String>::new()
        );
        block_on(store_obj.clear()).expect("clear");
    }
}
