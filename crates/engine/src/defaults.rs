//! Defaults registry
//!
//! Last-resort values consulted when no row answers a read at any scope in
//! the chain. Held in memory only, never persisted.

use parking_lot::RwLock;

use crate::value::{Mapping, Value};

#[derive(Debug, Default)]
pub struct DefaultsRegistry {
    values: RwLock<Mapping>,
}

impl DefaultsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.read().get(name).cloned()
    }

    pub fn insert(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.write().insert(name.into(), value.into())
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.values.write().remove(name)
    }

    pub fn extend(&self, entries: Mapping) {
        self.values.write().extend(entries);
    }

    /// Forget every registered default
    pub fn reset(&self) {
        self.values.write().clear();
    }

    /// Entries whose name starts with `prefix`
    pub fn matching(&self, prefix: &str) -> Mapping {
        self.values
            .read()
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}
