use storage_host::{
    ExpiringStorage, MemoryStorage, StorageBackend, StorageConfig, StorageEnvironment, StorageType,
};

use crate::StorageFactory;

#[cfg(all(feature = "desktop-host-stub", feature = "desktop-host-tauri"))]
compile_error!(
    "features `desktop-host-stub` and `desktop-host-tauri` are mutually exclusive; enable only one"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for storage backend wiring.
pub enum HostStrategy {
    /// Plain browser tab: Web Storage plus memory, never the native bridge.
    Browser,
    /// Desktop webview with the native storage commands available.
    DesktopTauri,
    /// Desktop build whose native storage is an in-memory placeholder.
    DesktopStub,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "desktop-host-tauri")]
    {
        HostStrategy::DesktopTauri
    }

    #[cfg(feature = "desktop-host-stub")]
    {
        HostStrategy::DesktopStub
    }

    #[cfg(not(any(feature = "desktop-host-stub", feature = "desktop-host-tauri")))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::DesktopTauri => "desktop-tauri",
        HostStrategy::DesktopStub => "desktop-stub",
    }
}

/// Adjusts a probed capability snapshot to what `strategy` is allowed to use.
pub(crate) fn strategy_environment(
    strategy: HostStrategy,
    probed: StorageEnvironment,
) -> StorageEnvironment {
    match strategy {
        HostStrategy::Browser => StorageEnvironment {
            native_bridge: false,
            ..probed
        },
        HostStrategy::DesktopTauri => probed,
        HostStrategy::DesktopStub => StorageEnvironment {
            native_bridge: true,
            ..probed
        },
    }
}

/// Builds a factory for `strategy` on top of the reference backends.
pub(crate) fn factory_for_strategy(
    strategy: HostStrategy,
    probed: StorageEnvironment,
    config: StorageConfig,
) -> StorageFactory {
    let factory =
        StorageFactory::with_reference_backends(strategy_environment(strategy, probed), config);
    if strategy == HostStrategy::DesktopStub {
        factory.register(StorageType::NativePersistent, |config| {
            StorageBackend::advanced(ExpiringStorage::new(
                MemoryStorage::default(),
                config.clone(),
            ))
        });
    }
    factory
}
