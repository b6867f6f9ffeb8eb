// Build a settings store from configuration

use tracing::info;

use scoped_settings_config::StoreConfig;
use scoped_settings_engine::{MemoryRowStore, Result, SettingsStore};

use crate::sqlite::SqliteRowStore;

/// Open the store described by `config`.
///
/// Uses SQLite at `config.database_path()` unless `in_memory` is set, and
/// seeds the defaults registry from `config.defaults`.
pub fn open_store(config: &StoreConfig) -> Result<SettingsStore> {
    let store = if config.in_memory {
        SettingsStore::with_cache(MemoryRowStore::new(), config.cache)
    } else {
        let backend = SqliteRowStore::open(&config.database_path())?;
        SettingsStore::with_cache(backend, config.cache)
    };

    if !config.defaults.is_empty() {
        store.extend_defaults(config.defaults.clone());
        info!(count = config.defaults.len(), "registered configured defaults");
    }
    Ok(store)
}
