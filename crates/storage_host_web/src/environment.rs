//! Runtime probing of which storage facilities the current host actually offers.

use storage_host::StorageEnvironment;

use crate::storage::web_storage::WebStorage;

/// Inspects the running host and reports its storage capabilities.
///
/// On `wasm32` this checks for the desktop command bridge and probes both Web Storage areas
/// (a blocked or sandboxed area reports `false`). Non-`wasm32` builds have neither, so the result
/// is always [`StorageEnvironment::headless`].
pub fn detect_environment() -> StorageEnvironment {
    StorageEnvironment {
        native_bridge: crate::bridge::native_bridge_available(),
        persistent_storage: WebStorage::local().probe(),
        session_storage: WebStorage::session().probe(),
    }
}
