//! Storage backend selection and instance caching for host runtimes.
//!
//! This crate wires the contracts from [`storage_host`] to the concrete backends in
//! [`storage_host_web`]. A [`StorageFactory`] owns the backend registry and hands out one shared
//! [`StorageService`] per [`StorageType`]; [`host_storage_factory`] builds one for the host
//! strategy selected at compile time.
//!
//! # Example
//!
//! ```rust
//! use platform_storage::{StorageConfig, StorageEnvironment, StorageFactory, StorageType};
//!
//! let factory = StorageFactory::with_reference_backends(
//!     StorageEnvironment::headless(),
//!     StorageConfig::default().with_prefix("app"),
//! );
//! assert_eq!(factory.default_storage_type(), StorageType::Memory);
//!
//! let objects = factory
//!     .create_serialized_storage(StorageType::Memory)
//!     .expect("memory storage is registered");
//! let sync = objects.blocking();
//! sync.set_object("window", &(640_u32, 480_u32));
//! assert_eq!(sync.get_object::<(u32, u32)>("window"), Some((640, 480)));
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod factory;
mod host_adapters;

pub use factory::{BackendBuilder, StorageFactory};
pub use host_adapters::{host_strategy_name, selected_host_strategy, HostStrategy};
pub use storage_host::{
    AdvancedPlatformStorage, KeyPattern, PlatformStorage, SerializedStorageService,
    StorageBackend, StorageConfig, StorageEnvironment, StorageError, StorageHealth,
    StorageService, StorageType,
};
pub use storage_host_web::detect_environment;

/// Builds a factory for the compile-time host strategy against the probed runtime environment.
///
/// Browser builds never register the native bridge. Desktop Tauri builds register it when the
/// webview exposes the command bridge. Desktop stub builds serve native persistent storage from
/// memory.
pub fn host_storage_factory(config: StorageConfig) -> StorageFactory {
    host_adapters::factory_for_strategy(selected_host_strategy(), detect_environment(), config)
}
