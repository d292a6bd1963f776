//! Platform-independent key-value storage contracts and reference implementations.
//!
//! This crate is the API-first boundary for storage. It defines the basic and advanced backend
//! contracts, the TTL/pattern engine that lifts any basic backend into the advanced contract, the
//! provider facade and capability-aware service used by application code, and a typed JSON object
//! layer. Browser and native bridge backends live in `storage_host_web`; backend selection and
//! instance caching live in `platform_storage`.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use storage_host::{
//!     ExpiringStorage, KeyPattern, MemoryStorage, StorageBackend, StorageConfig, StorageService,
//!     StorageType,
//! };
//!
//! let store = ExpiringStorage::new(MemoryStorage::default(), StorageConfig::default());
//! let service = StorageService::new(StorageType::Memory, StorageBackend::advanced(store));
//! let sync = service.blocking();
//!
//! sync.set_item("user:1", "x");
//! sync.set_item_with_ttl("token", "t", Some(Duration::from_secs(60)));
//! sync.clear_pattern(Some(&KeyPattern::new("user:*")));
//! assert_eq!(sync.get_all_keys(), vec!["token".to_string()]);
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod backend;
pub mod blocking;
pub mod envelope;
pub mod error;
pub mod expiring;
pub mod memory;
pub mod pattern;
pub mod provider;
pub mod serialized;
pub mod service;
pub mod time;
pub mod types;

pub use backend::{
    AdvancedPlatformStorage, PlatformStorage, StorageBackend, StorageFuture, StorageResult,
};
pub use blocking::{Blocking, BlockingObjects};
pub use envelope::{StoredEntry, ValueEncoding};
pub use error::StorageError;
pub use expiring::ExpiringStorage;
pub use memory::{MemoryStorage, NoopStorage};
pub use pattern::{KeyPattern, WILDCARD};
pub use provider::StorageProvider;
pub use serialized::{decode_object, encode_object, SerializedStorageService};
pub use service::{StorageHealth, StorageService, HEALTH_PROBE_KEY};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now, Clock, ManualClock, SystemClock};
pub use types::{StorageConfig, StorageEnvironment, StorageType, KEY_PREFIX_SEPARATOR};
