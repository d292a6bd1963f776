//! Backend registry and per-type service cache.
//!
//! A [`StorageFactory`] is an explicit object rather than process-global state: hosts build one
//! at startup, share it (usually behind an `Rc`), and ask it for services by [`StorageType`].
//! Each type resolves to exactly one [`StorageService`] for the lifetime of the factory.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use leptos::logging;
use storage_host::{
    ExpiringStorage, MemoryStorage, SerializedStorageService, StorageBackend, StorageConfig,
    StorageEnvironment, StorageError, StorageService, StorageType,
};
use storage_host_web::{NativeBridgeStorage, WebStorage};

/// Constructs the backend for one storage type from the factory's shared configuration.
pub type BackendBuilder = Box<dyn Fn(&StorageConfig) -> StorageBackend>;

/// Registry of storage backends plus memoized service instances.
pub struct StorageFactory {
    environment: StorageEnvironment,
    config: StorageConfig,
    builders: RefCell<HashMap<StorageType, BackendBuilder>>,
    services: RefCell<HashMap<StorageType, Rc<StorageService>>>,
    serialized: RefCell<HashMap<StorageType, Rc<SerializedStorageService>>>,
}

impl StorageFactory {
    /// Creates an empty factory. No storage type resolves until a backend is registered.
    pub fn new(environment: StorageEnvironment, config: StorageConfig) -> Self {
        Self {
            environment,
            config,
            builders: RefCell::new(HashMap::new()),
            services: RefCell::new(HashMap::new()),
            serialized: RefCell::new(HashMap::new()),
        }
    }

    /// Creates a factory with the reference backends registered.
    ///
    /// Memory, local and session storage are always registered; native persistent storage is
    /// registered only when `environment` reports a native bridge. Every reference backend is
    /// lifted through [`ExpiringStorage`], so all of them support TTL and pattern clearing.
    pub fn with_reference_backends(environment: StorageEnvironment, config: StorageConfig) -> Self {
        let factory = Self::new(environment, config);
        factory.register(StorageType::Memory, |config| {
            StorageBackend::advanced(ExpiringStorage::new(
                MemoryStorage::default(),
                config.clone(),
            ))
        });
        factory.register(StorageType::Local, |config| {
            StorageBackend::advanced(ExpiringStorage::new(WebStorage::local(), config.clone()))
        });
        factory.register(StorageType::Session, |config| {
            StorageBackend::advanced(ExpiringStorage::new(WebStorage::session(), config.clone()))
        });
        if environment.native_bridge {
            factory.register(StorageType::NativePersistent, |config| {
                StorageBackend::advanced(ExpiringStorage::new(NativeBridgeStorage, config.clone()))
            });
        }
        factory
    }

    /// Capability snapshot this factory resolves defaults against.
    pub fn environment(&self) -> StorageEnvironment {
        self.environment
    }

    /// Configuration handed to every backend builder.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Registers (or replaces) the backend builder for `storage_type`.
    ///
    /// Replacing a builder drops any cached service for that type; callers still holding the old
    /// `Rc` keep talking to the old backend.
    pub fn register<F>(&self, storage_type: StorageType, builder: F)
    where
        F: Fn(&StorageConfig) -> StorageBackend + 'static,
    {
        self.builders
            .borrow_mut()
            .insert(storage_type, Box::new(builder));
        self.services.borrow_mut().remove(&storage_type);
        self.serialized.borrow_mut().remove(&storage_type);
    }

    /// Returns whether a backend builder exists for `storage_type`.
    pub fn is_registered(&self, storage_type: StorageType) -> bool {
        self.builders.borrow().contains_key(&storage_type)
    }

    /// Returns the shared service for `storage_type`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnsupportedStorageType`] when no backend is registered for the
    /// type.
    pub fn create_storage(
        &self,
        storage_type: StorageType,
    ) -> Result<Rc<StorageService>, StorageError> {
        if let Some(service) = self.services.borrow().get(&storage_type) {
            return Ok(Rc::clone(service));
        }

        let backend = {
            let builders = self.builders.borrow();
            let builder = builders
                .get(&storage_type)
                .ok_or(StorageError::UnsupportedStorageType(storage_type))?;
            builder(&self.config)
        };

        if self.config.encryption && storage_type != StorageType::NativePersistent {
            logging::warn!(
                "{storage_type} storage does not encrypt at rest; values are stored in plain text"
            );
        }

        let service = Rc::new(StorageService::new(storage_type, backend));
        self.services
            .borrow_mut()
            .insert(storage_type, Rc::clone(&service));
        Ok(service)
    }

    /// Returns the shared typed-object service for `storage_type`, building it on first use.
    ///
    /// The object layer wraps the same [`StorageService`] that [`Self::create_storage`] hands
    /// out, so typed and raw callers see the same entries.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnsupportedStorageType`] when no backend is registered for the
    /// type.
    pub fn create_serialized_storage(
        &self,
        storage_type: StorageType,
    ) -> Result<Rc<SerializedStorageService>, StorageError> {
        if let Some(service) = self.serialized.borrow().get(&storage_type) {
            return Ok(Rc::clone(service));
        }

        let service = Rc::new(SerializedStorageService::new(
            self.create_storage(storage_type)?,
        ));
        self.serialized
            .borrow_mut()
            .insert(storage_type, Rc::clone(&service));
        Ok(service)
    }

    /// Picks the most durable storage type the environment offers.
    ///
    /// Candidates are tried in [`StorageType::PRECEDENCE`] order and must be both flagged by the
    /// environment and registered. Falls back to [`StorageType::Memory`].
    pub fn default_storage_type(&self) -> StorageType {
        let builders = self.builders.borrow();
        StorageType::PRECEDENCE
            .into_iter()
            .find(|storage_type| {
                self.environment.supports(*storage_type) && builders.contains_key(storage_type)
            })
            .unwrap_or(StorageType::Memory)
    }

    /// Shorthand for `create_storage(default_storage_type())`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnsupportedStorageType`] when the fallback memory backend was
    /// never registered.
    pub fn create_default_storage(&self) -> Result<Rc<StorageService>, StorageError> {
        self.create_storage(self.default_storage_type())
    }
}

impl std::fmt::Debug for StorageFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registered: Vec<StorageType> = self.builders.borrow().keys().copied().collect();
        registered.sort();
        f.debug_struct("StorageFactory")
            .field("environment", &self.environment)
            .field("config", &self.config)
            .field("registered", &registered)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use storage_host::NoopStorage;

    use super::*;

    fn headless() -> StorageFactory {
        StorageFactory::with_reference_backends(
            StorageEnvironment::headless(),
            StorageConfig::default(),
        )
    }

    #[test]
    fn repeated_requests_share_one_instance() {
        let factory = headless();
        let first = factory.create_storage(StorageType::Memory).expect("memory");
        let second = factory.create_storage(StorageType::Memory).expect("memory");
        assert!(Rc::ptr_eq(&first, &second));

        let objects = factory
            .create_serialized_storage(StorageType::Memory)
            .expect("objects");
        let again = factory
            .create_serialized_storage(StorageType::Memory)
            .expect("objects");
        assert!(Rc::ptr_eq(&objects, &again));
        assert!(Rc::ptr_eq(objects.service(), &first));
    }

    #[test]
    fn distinct_types_are_isolated() {
        let factory = headless();
        let memory = factory.create_storage(StorageType::Memory).expect("memory");
        let local = factory.create_storage(StorageType::Local).expect("local");
        assert!(!Rc::ptr_eq(&memory, &local));

        block_on(memory.set_item("k", "v"));
        assert_eq!(block_on(local.get_item("k")), None);
        assert_eq!(block_on(memory.get_item("k")), Some("v".to_string()));
    }

    #[test]
    fn unregistered_type_is_a_hard_error() {
        let factory = headless();
        let err = factory
            .create_storage(StorageType::NativePersistent)
            .expect_err("native bridge is not registered headless");
        assert_eq!(
            err,
            StorageError::UnsupportedStorageType(StorageType::NativePersistent)
        );
        assert!(err.is_configuration_error());

        let empty = StorageFactory::new(StorageEnvironment::browser(), StorageConfig::default());
        assert!(empty.create_serialized_storage(StorageType::Memory).is_err());
    }

    #[test]
    fn default_type_follows_durability_precedence() {
        assert_eq!(headless().default_storage_type(), StorageType::Memory);

        let browser = StorageFactory::with_reference_backends(
            StorageEnvironment::browser(),
            StorageConfig::default(),
        );
        assert_eq!(browser.default_storage_type(), StorageType::Local);

        let desktop = StorageFactory::with_reference_backends(
            StorageEnvironment::desktop_native(),
            StorageConfig::default(),
        );
        assert_eq!(desktop.default_storage_type(), StorageType::NativePersistent);

        let session_only = StorageFactory::with_reference_backends(
            StorageEnvironment {
                native_bridge: false,
                persistent_storage: false,
                session_storage: true,
            },
            StorageConfig::default(),
        );
        assert_eq!(session_only.default_storage_type(), StorageType::Session);
    }

    #[test]
    fn default_type_ignores_flagged_but_unregistered_backends() {
        let factory = StorageFactory::new(
            StorageEnvironment::desktop_native(),
            StorageConfig::default(),
        );
        factory.register(StorageType::Session, |_| {
            StorageBackend::basic(MemoryStorage::default())
        });
        assert_eq!(factory.default_storage_type(), StorageType::Session);
        assert!(!factory.is_registered(StorageType::Local));
    }

    #[test]
    fn registering_replaces_cached_instances() {
        let factory = headless();
        let before = factory.create_storage(StorageType::Memory).expect("memory");
        assert!(before.supports_ttl());

        factory.register(StorageType::Memory, |_| {
            StorageBackend::basic(MemoryStorage::default())
        });
        let after = factory.create_storage(StorageType::Memory).expect("memory");
        assert!(!Rc::ptr_eq(&before, &after));
        assert!(!after.supports_ttl());
    }

    #[test]
    fn unavailable_backend_still_resolves_to_inert_service() {
        let factory = headless();
        factory.register(StorageType::Session, |_| StorageBackend::basic(NoopStorage));
        let session = factory.create_storage(StorageType::Session).expect("session");
        assert!(!session.is_available());

        block_on(session.set_item("k", "v"));
        assert_eq!(block_on(session.get_item("k")), None);
        assert!(!block_on(session.has_item("k")));
    }

    #[test]
    fn builders_receive_shared_config() {
        let factory = StorageFactory::with_reference_backends(
            StorageEnvironment::headless(),
            StorageConfig::default()
                .with_prefix("app")
                .with_default_ttl(Duration::from_secs(30)),
        );
        let memory = factory.create_storage(StorageType::Memory).expect("memory");
        block_on(memory.set_item("theme", "dark"));
        assert_eq!(block_on(memory.get_all_keys()), vec!["theme".to_string()]);
        assert_eq!(factory.config().prefix.as_deref(), Some("app"));
    }
}
