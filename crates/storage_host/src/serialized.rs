//! Typed object storage on top of a [`StorageService`].

use std::{rc::Rc, time::Duration};

use leptos::logging;
use serde::{de::DeserializeOwned, Serialize};

use crate::{error::StorageError, service::StorageService, types::StorageType};

/// JSON object store layered over a string [`StorageService`].
///
/// Undecodable stored text (corrupted, or written by something else) reads as a miss and is
/// logged; it never surfaces as an error.
#[derive(Debug, Clone)]
pub struct SerializedStorageService {
    service: Rc<StorageService>,
}

impl SerializedStorageService {
    /// Wraps a string storage service.
    pub fn new(service: Rc<StorageService>) -> Self {
        Self { service }
    }

    /// Underlying string service.
    pub fn service(&self) -> &Rc<StorageService> {
        &self.service
    }

    /// Storage type of the underlying service.
    pub fn storage_type(&self) -> StorageType {
        self.service.storage_type()
    }

    /// Encodes `value` as JSON and stores it under `key`.
    pub async fn set_object<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        self.set_object_with_ttl(key, value, None).await;
    }

    /// Encodes `value` as JSON and stores it under `key` with an optional TTL.
    pub async fn set_object_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) {
        match encode_object(key, value) {
            Ok(raw) => self.service.set_item_with_ttl(key, &raw, ttl).await,
            Err(err) => logging::warn!("{} object write skipped: {err}", self.storage_type()),
        }
    }

    /// Reads and decodes the object stored under `key`.
    ///
    /// Returns `None` when the key is absent or its value does not decode as `T`.
    pub async fn get_object<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.service.get_item(key).await?;
        match decode_object(key, &raw) {
            Ok(value) => Some(value),
            Err(err) => {
                logging::warn!("{} object read treated as miss: {err}", self.storage_type());
                None
            }
        }
    }

    /// Returns whether a value exists under `key`, decodable or not.
    pub async fn has_object(&self, key: &str) -> bool {
        self.service.has_item(key).await
    }

    /// Removes the object stored under `key`.
    pub async fn remove_object(&self, key: &str) {
        self.service.remove_item(key).await;
    }
}

/// Encodes a value into its stored JSON text.
///
/// # Errors
///
/// Returns [`StorageError::Serialization`] when `value` cannot be represented as JSON.
pub fn encode_object<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|err| StorageError::Serialization {
        key: key.to_string(),
        reason: err.to_string(),
    })
}

/// Decodes stored JSON text.
///
/// # Errors
///
/// Returns [`StorageError::Deserialization`] when `raw` is not JSON of shape `T`.
pub fn decode_object<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|err| StorageError::Deserialization {
        key: key.to_string(),
        reason: err.to_string(),
    })
}
