//! Scoped settings accessor
//!
//! `ScopedSettings` is bound to exactly one scope. Reads resolve through the
//! scope's fallback chain and then the defaults registry; writes and deletes
//! only ever touch the bound scope.
//!
//! Resolution order for an instance-bound accessor:
//! Instance row > TypeDefault row > registered default > null
//!
//! A row holding null is still a row: it answers the read and stops the walk.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SettingsError};
use crate::scope::Scope;
use crate::store::SettingsStore;
use crate::value::{kind_name, Mapping, Value};

/// Settings for one scope. Obtain from `SettingsStore`.
pub struct ScopedSettings<'a> {
    store: &'a SettingsStore,
    scope: Scope,
    identifier: String,
}

impl<'a> ScopedSettings<'a> {
    pub(crate) fn new(store: &'a SettingsStore, scope: Scope) -> Self {
        let identifier = scope.identifier();
        Self {
            store,
            scope,
            identifier,
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Row-store identifier of the bound scope
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Resolved value of `name`, or `Value::Null` if nothing resolves.
    pub fn get(&self, name: impl AsRef<str>) -> Result<Value> {
        let name = setting_name(name.as_ref())?;
        let cache = self.store.adapter().cache();
        if let Some(value) = cache.lookup(&self.identifier, name) {
            return Ok(value);
        }

        let generation = cache.generation();
        let value = self.resolve(name)?;
        cache.remember(&self.identifier, name, value.clone(), generation);
        Ok(value)
    }

    fn resolve(&self, name: &str) -> Result<Value> {
        let adapter = self.store.adapter();
        for scope_id in self.scope.fallback_chain() {
            if let Some(value) = adapter.get(&scope_id, name)? {
                debug!(scope = %self.identifier, name, source = %scope_id, "resolved from row");
                return Ok(value);
            }
        }

        let fallback = self.store.defaults().get(name);
        debug!(
            scope = %self.identifier,
            name,
            registered = fallback.is_some(),
            "resolved from defaults"
        );
        Ok(fallback.unwrap_or(Value::Null))
    }

    /// Store `value` at the bound scope and return it.
    ///
    /// Always writes, even when `value` equals what a read would resolve to.
    pub fn set(&self, name: impl AsRef<str>, value: impl Into<Value>) -> Result<Value> {
        let name = setting_name(name.as_ref())?;
        let value = value.into();
        self.store.adapter().set(&self.scope, name, &value)?;
        Ok(value)
    }

    /// Assign every entry of `entries`. Rows for other names are kept.
    pub fn set_all(&self, entries: Mapping) -> Result<()> {
        for (name, value) in entries {
            self.set(name, value)?;
        }
        Ok(())
    }

    /// Remove the row at the bound scope.
    ///
    /// Broader scopes are not consulted: with no row here this fails with
    /// `SettingNotFound`, even if a read would resolve a value.
    pub fn destroy(&self, name: impl AsRef<str>) -> Result<()> {
        let name = setting_name(name.as_ref())?;
        if self.store.adapter().delete(&self.scope, name)? {
            Ok(())
        } else {
            Err(SettingsError::SettingNotFound {
                scope: self.identifier.clone(),
                name: name.to_string(),
            })
        }
    }

    /// Rows at the bound scope whose name starts with `prefix`, plus
    /// registered defaults matching `prefix` that no row overrides.
    pub fn all(&self, prefix: &str) -> Result<Mapping> {
        let mut merged = self.store.adapter().all(&self.identifier, prefix)?;
        for (name, value) in self.store.defaults().matching(prefix) {
            merged.entry(name).or_insert(value);
        }
        Ok(merged)
    }

    /// Shallow-merge `incoming` into the mapping stored under `name`.
    ///
    /// An unset (or null) setting merges into an empty mapping. Keys in
    /// `incoming` replace existing keys. Returns the merged mapping.
    pub fn merge(&self, name: impl AsRef<str>, incoming: impl Into<Value>) -> Result<Mapping> {
        let name = setting_name(name.as_ref())?;
        let incoming = match incoming.into() {
            Value::Object(map) => map,
            other => {
                return Err(SettingsError::ArgumentError(format!(
                    "merge into '{name}' expects a mapping, got {}",
                    kind_name(&other)
                )))
            }
        };

        let mut merged = match self.get(name)? {
            Value::Null => Mapping::new(),
            Value::Object(existing) => existing,
            other => {
                return Err(SettingsError::TypeError {
                    name: name.to_string(),
                    found: kind_name(&other),
                })
            }
        };
        merged.extend(incoming);

        self.set(name, Value::Object(merged.clone()))?;
        Ok(merged)
    }

    /// The row stored at the bound scope itself, without fallback.
    pub fn row(&self, name: impl AsRef<str>) -> Result<Option<Value>> {
        let name = setting_name(name.as_ref())?;
        self.store.adapter().get(&self.identifier, name)
    }

    /// Whether the bound scope holds its own row for `name`
    pub fn contains(&self, name: impl AsRef<str>) -> Result<bool> {
        let name = setting_name(name.as_ref())?;
        self.store.adapter().has_rows(&self.identifier, Some(name))
    }

    /// `get` converted into `T`; `None` when the setting resolves to null.
    pub fn get_as<T: DeserializeOwned>(&self, name: impl AsRef<str>) -> Result<Option<T>> {
        match self.get(name)? {
            Value::Null => Ok(None),
            value => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// `set` from any serde type
    pub fn set_as<T: Serialize>(&self, name: impl AsRef<str>, value: &T) -> Result<Value> {
        self.set(name, serde_json::to_value(value)?)
    }

    /// Forget cached resolutions for this scope.
    pub fn reload(&self) {
        self.store.adapter().cache().invalidate_scope(&self.scope);
    }
}

fn setting_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(SettingsError::ArgumentError(
            "setting name must not be empty".to_string(),
        ));
    }
    Ok(name)
}
