//! Native persistent storage reached through the desktop webview command bridge.
//!
//! Calls are routed by `crate::bridge` to host commands (`storage_get_item`, `storage_set_item`,
//! `storage_remove_item`, `storage_clear`, `storage_keys`). Outside a desktop webview the bridge is
//! absent and the backend reports itself unavailable.

use storage_host::{PlatformStorage, StorageError, StorageFuture, StorageResult};

#[derive(Debug, Clone, Copy, Default)]
/// Durable backend owned by the native host process.
pub struct NativeBridgeStorage;

impl PlatformStorage for NativeBridgeStorage {
    fn backend_name(&self) -> &'static str {
        "native-bridge"
    }

    fn is_available(&self) -> bool {
        crate::bridge::native_bridge_available()
    }

    fn set_item<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            crate::bridge::set_item(key, value)
                .await
                .map_err(|err| StorageError::write_failed(key, err))
        })
    }

    fn get_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<Option<String>>> {
        Box::pin(async move {
            crate::bridge::get_item(key)
                .await
                .map_err(|err| StorageError::read_failed(key, err))
        })
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            crate::bridge::remove_item(key)
                .await
                .map_err(|err| StorageError::write_failed(key, err))
        })
    }

    fn clear<'a>(&'a self) -> StorageFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            crate::bridge::clear()
                .await
                .map_err(|err| StorageError::write_failed("*", err))
        })
    }

    fn get_all_keys<'a>(&'a self) -> StorageFuture<'a, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let mut keys = crate::bridge::keys()
                .await
                .map_err(|err| StorageError::read_failed("*", err))?;
            keys.sort();
            Ok(keys)
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_native_bridge_matches_fallback_behavior() {
        let store = NativeBridgeStorage;
        let store_obj: &dyn PlatformStorage = &store;

        assert!(!store_obj.is_available());
        assert_eq!(
            block_on(store_obj.get_item("prefs.theme")).expect("get"),
            None
        );
        block_on(store_obj.set_item("prefs.theme", "value")).expect("set");
        block_on(store_obj.remove_item("prefs.theme")).expect("remove");
        block_on(store_obj.clear()).expect("clear");
        assert_eq!(
            block_on(store_obj.get_all_keys()).expect("keys"),
            Vec::<String>::new()
        );
    }
}
