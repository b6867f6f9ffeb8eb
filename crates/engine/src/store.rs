//! Settings store
//!
//! The process-wide entry point. Owns the row store adapter, the read cache
//! and the defaults registry, and hands out accessors bound to one scope.
//! Create one per process and share it; every accessor it hands out sees the
//! same cache.

use crate::accessor::ScopedSettings;
use crate::adapter::RowStoreAdapter;
use crate::cache::ResolutionCache;
use crate::defaults::DefaultsRegistry;
use crate::error::Result;
use crate::owner::SettingsOwner;
use crate::row_store::{MemoryRowStore, RowStore};
use crate::scope::Scope;
use crate::value::{Mapping, Value};

pub struct SettingsStore {
    adapter: RowStoreAdapter,
    defaults: DefaultsRegistry,
}

impl SettingsStore {
    /// Create a store over `backend` with the read cache enabled.
    pub fn new(backend: impl RowStore + 'static) -> Self {
        Self::with_cache(backend, true)
    }

    pub fn with_cache(backend: impl RowStore + 'static, cache_enabled: bool) -> Self {
        Self {
            adapter: RowStoreAdapter::new(Box::new(backend), ResolutionCache::new(cache_enabled)),
            defaults: DefaultsRegistry::new(),
        }
    }

    /// Store backed by a fresh `MemoryRowStore`
    pub fn in_memory() -> Self {
        Self::new(MemoryRowStore::new())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    // Every constructor except `global` validates the owner type name, so no
    // two scopes share a row-store identifier.

    /// Accessor bound to `scope`; `ArgumentError` for an invalid type name.
    pub fn scoped(&self, scope: Scope) -> Result<ScopedSettings<'_>> {
        scope.validate()?;
        Ok(ScopedSettings::new(self, scope))
    }

    pub fn global(&self) -> ScopedSettings<'_> {
        ScopedSettings::new(self, Scope::global())
    }

    pub fn for_type(&self, type_name: impl Into<String>) -> Result<ScopedSettings<'_>> {
        self.scoped(Scope::for_type(type_name))
    }

    pub fn for_instance(
        &self,
        type_name: impl Into<String>,
        instance_id: impl ToString,
    ) -> Result<ScopedSettings<'_>> {
        self.scoped(Scope::for_instance(type_name, instance_id))
    }

    /// Accessor for one owner record's settings
    pub fn for_owner<O: SettingsOwner>(&self, owner: &O) -> Result<ScopedSettings<'_>> {
        self.scoped(owner.settings_scope())
    }

    /// Accessor for the defaults shared by every `O`
    pub fn for_owner_type<O: SettingsOwner>(&self) -> Result<ScopedSettings<'_>> {
        self.for_type(O::TYPE_NAME)
    }

    // ========================================================================
    // Defaults registry
    // ========================================================================
    //
    // Any change to the registry can alter a cached resolution anywhere, so
    // each mutation clears the whole cache.

    pub fn register_default(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.defaults.insert(name, value);
        self.adapter.cache().clear();
    }

    pub fn unregister_default(&self, name: &str) -> Option<Value> {
        let removed = self.defaults.remove(name);
        self.adapter.cache().clear();
        removed
    }

    pub fn extend_defaults(&self, entries: Mapping) {
        self.defaults.extend(entries);
        self.adapter.cache().clear();
    }

    pub fn reset_defaults(&self) {
        self.defaults.reset();
        self.adapter.cache().clear();
    }

    pub fn defaults(&self) -> &DefaultsRegistry {
        &self.defaults
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Total rows across every scope
    pub fn row_count(&self) -> Result<usize> {
        self.adapter.count()
    }

    /// Drop every cached resolution (forces the next reads to hit the store)
    pub fn clear_cache(&self) {
        self.adapter.cache().clear();
    }

    pub(crate) fn adapter(&self) -> &RowStoreAdapter {
        &self.adapter
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
