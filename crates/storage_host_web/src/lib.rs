//! Browser (`wasm32`) and desktop-webview implementations of the [`storage_host`] backend
//! contract.
//!
//! - [`WebStorage`] wraps `window.localStorage` / `window.sessionStorage`.
//! - [`NativeBridgeStorage`] forwards every call to the native host over the webview command
//!   bridge (`bridge`, split into wasm and non-wasm transport glue).
//! - [`detect_environment`] reports which of those facilities the running host offers.
//!
//! On non-`wasm32` targets every backend here reports itself unavailable and behaves as an empty
//! no-op store, so host-agnostic code and tests can link against this crate unchanged.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod bridge;
pub mod environment;
pub mod storage;

pub use environment::detect_environment;
pub use storage::native_bridge::NativeBridgeStorage;
pub use storage::web_storage::{WebStorage, WebStorageArea};
