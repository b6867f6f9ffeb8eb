//! Row store contract and the in-memory backend
//!
//! A row store keeps `(scope, name) -> payload` rows, unique per pair. It
//! deals in encoded text only; decoding and caching happen in the adapter.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::error::StoreError;

/// Synchronous storage for setting rows.
///
/// `payload` is the encoded value. An explicitly stored null is a row like
/// any other and must be reported by `fetch` as `Some("null")`.
pub trait RowStore: Send + Sync {
    /// Payload of the row at `(scope, name)`, or `None` if no row exists
    fn fetch(&self, scope: &str, name: &str) -> Result<Option<String>, StoreError>;

    /// Insert the row, or replace the payload of the existing one
    fn upsert(&self, scope: &str, name: &str, payload: &str) -> Result<(), StoreError>;

    /// Remove one row. Returns whether a row was there.
    fn remove(&self, scope: &str, name: &str) -> Result<bool, StoreError>;

    /// Rows in `scope` whose name starts with `prefix`, ordered by name.
    /// Matching is literal and case-sensitive; an empty prefix matches all.
    fn list(&self, scope: &str, prefix: &str) -> Result<Vec<(String, String)>, StoreError>;

    /// Remove every row in `scope`. Returns the number removed.
    fn remove_scope(&self, scope: &str) -> Result<usize, StoreError>;

    /// Whether `scope` holds any row, or the row called `name` when given
    fn scope_has_rows(&self, scope: &str, name: Option<&str>) -> Result<bool, StoreError>;

    /// Total rows across all scopes
    fn row_count(&self) -> Result<usize, StoreError>;
}

/// Row store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    rows: Mutex<BTreeMap<(String, String), String>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowStore for MemoryRowStore {
    fn fetch(&self, scope: &str, name: &str) -> Result<Option<String>, StoreError> {
        let rows = self.rows.lock();
        Ok(rows.get(&(scope.to_string(), name.to_string())).cloned())
    }

    fn upsert(&self, scope: &str, name: &str, payload: &str) -> Result<(), StoreError> {
        self.rows
            .lock()
            .insert((scope.to_string(), name.to_string()), payload.to_string());
        Ok(())
    }

    fn remove(&self, scope: &str, name: &str) -> Result<bool, StoreError> {
        let removed = self
            .rows
            .lock()
            .remove(&(scope.to_string(), name.to_string()));
        Ok(removed.is_some())
    }

    fn list(&self, scope: &str, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        let rows = self.rows.lock();
        // Keys sort by (scope, name), so a scope's rows with a given prefix are contiguous
        let start = (scope.to_string(), prefix.to_string());
        Ok(rows
            .range(start..)
            .take_while(|((s, n), _)| s == scope && n.starts_with(prefix))
            .map(|((_, n), payload)| (n.clone(), payload.clone()))
            .collect())
    }

    fn remove_scope(&self, scope: &str) -> Result<usize, StoreError> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|(s, _), _| s != scope);
        Ok(before - rows.len())
    }

    fn scope_has_rows(&self, scope: &str, name: Option<&str>) -> Result<bool, StoreError> {
        let rows = self.rows.lock();
        Ok(match name {
            Some(name) => rows.contains_key(&(scope.to_string(), name.to_string())),
            None => rows.keys().any(|(s, _)| s == scope),
        })
    }

    fn row_count(&self) -> Result<usize, StoreError> {
        Ok(self.rows.lock().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryRowStore {
        let store = MemoryRowStore::new();
        store.upsert("global", "test", "\"foo\"").unwrap();
        store.upsert("global", "test2", "\"bar\"").unwrap();
        store.upsert("User#1", "one", "1").unwrap();
        store.upsert("User#1", "two", "2").unwrap();
        store.upsert("User#10", "one", "10").unwrap();
        store
    }

    #[test]
    fn test_upsert_keeps_pair_unique() {
        let store = seeded();
        store.upsert("global", "test", "\"baz\"").unwrap();
        assert_eq!(store.row_count().unwrap(), 5);
        assert_eq!(store.fetch("global", "test").unwrap(), Some("\"baz\"".into()));
    }

    #[test]
    fn test_list_prefix_stays_in_scope() {
        let store = seeded();
        let names: Vec<_> = store
            .list("User#1", "")
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["one", "two"]);

        assert_eq!(
            store.list("User#1", "o").unwrap(),
            vec![("one".to_string(), "1".to_string())]
        );
        assert!(store.list("User#1", "x").unwrap().is_empty());
        assert_eq!(store.list("global", "test").unwrap().len(), 2);
    }

    #[test]
    fn test_remove_and_remove_scope() {
        let store = seeded();
        assert!(store.remove("global", "test").unwrap());
        assert!(!store.remove("global", "test").unwrap());
        assert_eq!(store.remove_scope("User#1").unwrap(), 2);
        assert_eq!(store.row_count().unwrap(), 2);
        assert!(store.scope_has_rows("User#10", None).unwrap());
        assert!(!store.scope_has_rows("User#1", None).unwrap());
    }

    #[test]
    fn test_scope_has_named_row() {
        let store = seeded();
        assert!(store.scope_has_rows("User#1", Some("two")).unwrap());
        assert!(!store.scope_has_rows("User#10", Some("two")).unwrap());
    }
}
