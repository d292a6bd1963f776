//! Native storage command transport.
//!
//! This module routes calls to target-specific implementations while preserving a uniform API
//! for the native bridge backend. Errors are plain strings here; the backend maps them into
//! `StorageError` values.

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub(crate) const GET_ITEM_COMMAND: &str = "storage_get_item";
pub(crate) const SET_ITEM_COMMAND: &str = "storage_set_item";
pub(crate) const REMOVE_ITEM_COMMAND: &str = "storage_remove_item";
pub(crate) const CLEAR_COMMAND: &str = "storage_clear";
pub(crate) const KEYS_COMMAND: &str = "storage_keys";

pub(crate) fn native_bridge_available() -> bool {
    imp::native_bridge_available()
}

pub(crate) async fn get_item(key: &str) -> Result<Option<String>, String> {
    imp::get_item(key).await
}

pub(crate) async fn set_item(key: &str, value: &str) -> Result<(), String> {
    imp::set_item(key, value).await
}

pub(crate) async fn remove_item(key: &str) -> Result<(), String> {
    imp::remove_item(key).await
}

pub(crate) async fn clear() -> Result<(), String> {
    imp::clear().await
}

pub(crate) async fn keys() -> Result<Vec<String>, String> {
    imp::keys().await
}
