//! Row store adapter
//!
//! Sits between accessors and a `RowStore` backend: encodes and decodes
//! payloads, and invalidates the read cache on every mutation before the call
//! returns, so a `set` is visible to the next `get`.

use tracing::{debug, warn};

use crate::cache::ResolutionCache;
use crate::error::Result;
use crate::row_store::RowStore;
use crate::scope::Scope;
use crate::value::{self, Mapping, Value};

pub struct RowStoreAdapter {
    backend: Box<dyn RowStore>,
    cache: ResolutionCache,
}

impl RowStoreAdapter {
    pub fn new(backend: Box<dyn RowStore>, cache: ResolutionCache) -> Self {
        Self { backend, cache }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Decoded value of the row at `(scope_id, name)`; `None` if no row.
    ///
    /// `Some(Value::Null)` is an explicitly stored null.
    pub fn get(&self, scope_id: &str, name: &str) -> Result<Option<Value>> {
        match self.backend.fetch(scope_id, name)? {
            Some(payload) => Ok(Some(decode_row(scope_id, name, &payload)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, scope: &Scope, name: &str, value: &Value) -> Result<()> {
        let scope_id = scope.identifier();
        self.backend.upsert(&scope_id, name, &value::encode(value))?;
        self.cache.invalidate(scope, name);
        debug!(scope = %scope_id, name, "stored setting");
        Ok(())
    }

    /// Remove one row. Returns whether a row existed.
    pub fn delete(&self, scope: &Scope, name: &str) -> Result<bool> {
        let scope_id = scope.identifier();
        let removed = self.backend.remove(&scope_id, name)?;
        self.cache.invalidate(scope, name);
        debug!(scope = %scope_id, name, removed, "deleted setting");
        Ok(removed)
    }

    /// Rows in `scope_id` whose name starts with `prefix`
    pub fn all(&self, scope_id: &str, prefix: &str) -> Result<Mapping> {
        self.backend
            .list(scope_id, prefix)?
            .into_iter()
            .map(|(name, payload)| {
                let value = decode_row(scope_id, &name, &payload)?;
                Ok((name, value))
            })
            .collect()
    }

    pub fn delete_all(&self, scope: &Scope) -> Result<usize> {
        let removed = self.backend.remove_scope(&scope.identifier())?;
        self.cache.invalidate_scope(scope);
        Ok(removed)
    }

    pub fn has_rows(&self, scope_id: &str, name: Option<&str>) -> Result<bool> {
        Ok(self.backend.scope_has_rows(scope_id, name)?)
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.backend.row_count()?)
    }
}

fn decode_row(scope_id: &str, name: &str, payload: &str) -> Result<Value> {
    value::decode(payload).inspect_err(|e| {
        warn!(scope = %scope_id, name, error = %e, "malformed setting payload");
    })
}
