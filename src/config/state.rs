// Application state module
// Immutable per-process state shared by all request handlers

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::storage::ObjectStore;

/// Application state: configuration plus the object store binding.
///
/// Built once at startup and shared read-only across connections; request
/// handlers never mutate it.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ObjectStore>,

    // Cached flag for lock-free access on the request path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ObjectStore>) -> Self {
        let cached_access_log = AtomicBool::new(config.logging.access_log);
        Self {
            config,
            store,
            cached_access_log,
        }
    }
}
