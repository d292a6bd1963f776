//! Concrete browser and native-bridge storage backends.

pub mod native_bridge;
pub mod web_storage;
