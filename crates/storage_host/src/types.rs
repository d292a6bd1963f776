//! Storage identity, configuration, and host environment models.

use std::time::Duration;

/// Separator placed between a configured key prefix and the logical key.
pub const KEY_PREFIX_SEPARATOR: &str = ":";

/// Concrete backend family behind a storage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageType {
    /// Browser-style persistent storage (`window.localStorage`).
    Local,
    /// Browser session-scoped storage (`window.sessionStorage`).
    Session,
    /// Durable storage owned by a native host module.
    NativePersistent,
    /// Volatile in-process map. Last resort: nothing survives the process.
    Memory,
}

impl StorageType {
    /// Every storage type, ordered by default-selection precedence.
    pub const PRECEDENCE: [Self; 4] = [
        Self::NativePersistent,
        Self::Local,
        Self::Session,
        Self::Memory,
    ];

    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Session => "session",
            Self::NativePersistent => "native-persistent",
            Self::Memory => "memory",
        }
    }

    /// Returns whether values written through this type survive a process restart.
    pub const fn is_durable(self) -> bool {
        matches!(self, Self::Local | Self::NativePersistent)
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative storage configuration applied when a service is constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Optional namespace prepended to every physical key.
    pub prefix: Option<String>,
    /// Requests encryption at rest. Only honored by backends that encrypt natively.
    pub encryption: bool,
    /// Deflate and base64-encode stored values inside the entry envelope.
    pub compression: bool,
    /// TTL applied to writes that do not carry one.
    pub default_ttl: Option<Duration>,
}

impl StorageConfig {
    /// Sets the key namespace.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    /// Sets the encryption request flag.
    pub fn with_encryption(mut self, encryption: bool) -> Self {
        self.encryption = encryption;
        self
    }

    /// Sets the compression flag.
    pub fn with_compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the fallback TTL for writes without an explicit one.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Prefix as it appears in physical keys.
    ///
    /// `%` and the separator are percent-escaped, so the first separator in a physical key always
    /// ends the namespace and distinct prefixes never share keys (`app` with logical `x:y` versus
    /// `app:x` with logical `y`).
    fn namespace(&self) -> Option<String> {
        self.prefix.as_deref().map(|prefix| {
            prefix
                .replace('%', "%25")
                .replace(KEY_PREFIX_SEPARATOR, "%3A")
        })
    }

    /// Maps a logical key to the physical key written to the backend.
    pub fn physical_key(&self, key: &str) -> String {
        match self.namespace() {
            Some(namespace) => format!("{namespace}{KEY_PREFIX_SEPARATOR}{key}"),
            None => key.to_string(),
        }
    }

    /// Maps a physical key back to its logical key.
    ///
    /// Returns `None` when the key lies outside this configuration's namespace.
    pub fn logical_key<'k>(&self, physical: &'k str) -> Option<&'k str> {
        match self.namespace() {
            Some(namespace) => physical
                .strip_prefix(namespace.as_str())?
                .strip_prefix(KEY_PREFIX_SEPARATOR),
            None => Some(physical),
        }
    }
}

/// Host-supplied capability flags used to pick a default storage type.
///
/// The storage core does not probe the platform itself; the hosting application (or
/// `storage_host_web::detect_environment` on browser builds) provides this snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageEnvironment {
    /// A durable native storage module is linked and reachable.
    pub native_bridge: bool,
    /// Browser-style persistent storage is present and enabled.
    pub persistent_storage: bool,
    /// Browser session-scoped storage is present and enabled.
    pub session_storage: bool,
}

impl StorageEnvironment {
    /// Plain browser tab posture.
    pub const fn browser() -> Self {
        Self {
            native_bridge: false,
            persistent_storage: true,
            session_storage: true,
        }
    }

    /// Desktop webview posture with a native storage bridge.
    pub const fn desktop_native() -> Self {
        Self {
            native_bridge: true,
            persistent_storage: true,
            session_storage: true,
        }
    }

    /// Headless posture (tests, servers): only in-memory storage exists.
    pub const fn headless() -> Self {
        Self {
            native_bridge: false,
            persistent_storage: false,
            session_storage: false,
        }
    }

    /// Returns whether the environment reports the capability backing `storage_type`.
    pub const fn supports(self, storage_type: StorageType) -> bool {
        match storage_type {
            StorageType::NativePersistent => self.native_bridge,
            StorageType::Local => self.persistent_storage,
            StorageType::Session => self.session_storage,
            StorageType::Memory => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_type_tokens_are_stable() {
        assert_eq!(StorageType::Local.as_str(), "local");
        assert_eq!(StorageType::Session.as_str(), "session");
        assert_eq!(StorageType::NativePersistent.as_str(), "native-persistent");
        assert_eq!(StorageType::Memory.to_string(), "memory");
        assert!(StorageType::Local.is_durable());
        assert!(!StorageType::Memory.is_durable());
    }

    #[test]
    fn prefixed_keys_map_both_ways() {
        let config = StorageConfig::default().with_prefix("app");
        assert_eq!(config.physical_key("user:1"), "app:user:1");
        assert_eq!(config.logical_key("app:user:1"), Some("user:1"));
        assert_eq!(config.logical_key("apple:user:1"), None);
        assert_eq!(config.logical_key("other"), None);
    }

    #[test]
    fn separator_inside_prefix_cannot_alias_another_namespace() {
        let outer = StorageConfig::default().with_prefix("app");
        let nested = StorageConfig::default().with_prefix("app:x");

        assert_eq!(nested.physical_key("y"), "app%3Ax:y");
        assert_ne!(nested.physical_key("y"), outer.physical_key("x:y"));
        assert_eq!(outer.logical_key(&nested.physical_key("y")), None);
        assert_eq!(nested.logical_key(&outer.physical_key("x:y")), None);
        assert_eq!(nested.logical_key("app%3Ax:y"), Some("y"));

        let literal = StorageConfig::default().with_prefix("app%3Ax");
        assert_ne!(literal.physical_key("y"), nested.physical_key("y"));
    }

    #[test]
    fn empty_prefix_is_treated_as_unset() {
        let config = StorageConfig::default().with_prefix("");
        assert_eq!(config.prefix, None);
        assert_eq!(config.physical_key("k"), "k");
        assert_eq!(config.logical_key("k"), Some("k"));
    }

    #[test]
    fn environment_presets_report_expected_capabilities() {
        assert!(StorageEnvironment::headless().supports(StorageType::Memory));
        assert!(!StorageEnvironment::headless().supports(StorageType::Local));
        assert!(StorageEnvironment::browser().supports(StorageType::Session));
        assert!(!StorageEnvironment::browser().supports(StorageType::NativePersistent));
        assert!(StorageEnvironment::desktop_native().supports(StorageType::NativePersistent));
    }
}
