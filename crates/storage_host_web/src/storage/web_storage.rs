//! `localStorage` / `sessionStorage`-backed key-value backend.
//!
//! The Web Storage API is synchronous; the inherent `*_raw` methods expose it directly, and the
//! [`PlatformStorage`] implementation wraps them in ready futures. Non-`wasm32` builds have no
//! Web Storage, so the backend reports itself unavailable and every call is an empty no-op.

use storage_host::{PlatformStorage, StorageFuture, StorageResult};
#[cfg(target_arch = "wasm32")]
use storage_host::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which Web Storage area a [`WebStorage`] talks to.
pub enum WebStorageArea {
    /// `window.localStorage`, persisted across sessions.
    Local,
    /// `window.sessionStorage`, cleared when the tab closes.
    Session,
}

impl WebStorageArea {
    /// Stable backend label for diagnostics.
    pub const fn backend_name(self) -> &'static str {
        match self {
            Self::Local => "local-storage",
            Self::Session => "session-storage",
        }
    }
}

#[derive(Debug, Clone, Copy)]
/// Browser key-value backend over one Web Storage area.
pub struct WebStorage {
    area: WebStorageArea,
}

impl WebStorage {
    /// Backend over `window.localStorage`.
    pub const fn local() -> Self {
        Self {
            area: WebStorageArea::Local,
        }
    }

    /// Backend over `window.sessionStorage`.
    pub const fn session() -> Self {
        Self {
            area: WebStorageArea::Session,
        }
    }

    /// Storage area this backend targets.
    pub const fn area(self) -> WebStorageArea {
        self.area
    }

    #[cfg(target_arch = "wasm32")]
    fn storage(self) -> StorageResult<web_sys::Storage> {
        let unavailable = || StorageError::Unavailable {
            backend: self.area.backend_name(),
        };
        let window = web_sys::window().ok_or_else(unavailable)?;
        let storage = match self.area {
            WebStorageArea::Local => window.local_storage(),
            WebStorageArea::Session => window.session_storage(),
        };
        storage.ok().flatten().ok_or_else(unavailable)
    }

    /// Returns whether the storage area can be opened (it may be disabled by user settings).
    pub fn probe(self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            self.storage().is_ok()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    /// Reads a raw value.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage area is unavailable or access is denied.
    pub fn get_raw(self, key: &str) -> StorageResult<Option<String>> {
        #[cfg(target_arch = "wasm32")]
        {
            self.storage()?
                .get_item(key)
                .map_err(|e| StorageError::read_failed(key, format!("{e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    /// Writes a raw value.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage area is unavailable or the quota is exceeded.
    pub fn set_raw(self, key: &str, value: &str) -> StorageResult<()> {
        #[cfg(target_arch = "wasm32")]
        {
            self.storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::write_failed(key, format!("{e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    /// Removes a key.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage area is unavailable or access is denied.
    pub fn remove_raw(self, key: &str) -> StorageResult<()> {
        #[cfg(target_arch = "wasm32")]
        {
            self.storage()?
                .remove_item(key)
                .map_err(|e| StorageError::write_failed(key, format!("{e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }

    /// Removes every key in the storage area.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage area is unavailable or access is denied.
    pub fn clear_raw(self) -> StorageResult<()> {
        #[cfg(target_arch = "wasm32")]
        {
            self.storage()?
                .clear()
                .map_err(|e| StorageError::write_failed("*", format!("{e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(())
        }
    }

    /// Lists every key in the storage area, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage area is unavailable or access is denied.
    pub fn keys_raw(self) -> StorageResult<Vec<String>> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = self.storage()?;
            let denied = |e: wasm_bindgen::JsValue| StorageError::read_failed("*", format!("{e:?}"));
            let length = storage.length().map_err(denied)?;
            let mut keys = Vec::with_capacity(length as usize);
            for index in 0..length {
                if let Some(key) = storage.key(index).map_err(denied)? {
                    keys.push(key);
                }
            }
            keys.sort();
            Ok(keys)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(Vec::new())
        }
    }
}

impl PlatformStorage for WebStorage {
    fn backend_name(&self) -> &'static str {
        self.area.backend_name()
    }

    fn is_available(&self) -> bool {
        self.probe()
    }

    fn set_item<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, StorageResult<()>> {
        let store = *self;
        Box::pin(async move { store.set_raw(key, value) })
    }

    fn get_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<Option<String>>> {
        let store = *self;
        Box::pin(async move { store.get_raw(key) })
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> StorageFuture<'a, StorageResult<()>> {
        let store = *self;
        Box::pin(async move { store.remove_raw(key) })
    }

    fn clear<'a>(&'a self) -> StorageFuture<'a, StorageResult<()>> {
        let store = *self;
        Box::pin(async move { store.clear_raw() })
    }

    fn get_all_keys<'a>(&'a self) -> StorageFuture<'a, StorageResult<Vec<String>>> {
        let store = *self;
        Box::pin(async move { store.keys_raw() })
    }
}
