//! Process-local read cache
//!
//! Holds resolved values keyed by the scope an accessor is bound to, not the
//! scope the value was found in. That keeps repeated reads from re-walking the
//! fallback chain, but means a write must also drop resolutions that may have
//! fallen through to the written scope.
//!
//! Every invalidation bumps a store-wide generation. A reader takes the
//! generation before resolving and passes it to `remember`, which drops the
//! value if anything was invalidated in between.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::scope::{parse_identifier, Scope};
use crate::value::Value;

#[derive(Debug, Default)]
struct CacheState {
    generation: u64,
    /// Resolved `{name -> value}` snapshots per scope identifier
    entries: HashMap<String, HashMap<String, Value>>,
}

impl CacheState {
    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[derive(Debug)]
pub struct ResolutionCache {
    enabled: bool,
    state: Mutex<CacheState>,
}

impl ResolutionCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn lookup(&self, scope_id: &str, name: &str) -> Option<Value> {
        if !self.is_enabled() {
            return None;
        }
        self.state.lock().entries.get(scope_id)?.get(name).cloned()
    }

    /// Current generation; take it before resolving a value to remember.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Cache `value` unless an invalidation happened since `seen` was taken.
    pub fn remember(&self, scope_id: &str, name: &str, value: Value, seen: u64) {
        if !self.is_enabled() {
            return;
        }
        let mut state = self.state.lock();
        if state.generation != seen {
            return;
        }
        state
            .entries
            .entry(scope_id.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }

    /// Drop cached resolutions of `name` that a write at `scope` could change.
    pub fn invalidate(&self, scope: &Scope, name: &str) {
        let mut state = self.state.lock();
        state.bump();
        for (id, snapshot) in state.entries.iter_mut() {
            if affected_by(scope, id) {
                snapshot.remove(name);
            }
        }
    }

    /// Drop every cached resolution a write anywhere in `scope` could change.
    pub fn invalidate_scope(&self, scope: &Scope) {
        let mut state = self.state.lock();
        state.bump();
        state.entries.retain(|id, _| !affected_by(scope, id));
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.bump();
        state.entries.clear();
    }

    pub fn contains(&self, scope_id: &str, name: &str) -> bool {
        self.state
            .lock()
            .entries
            .get(scope_id)
            .is_some_and(|snapshot| snapshot.contains_key(name))
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Whether resolutions cached under `cached_id` can read rows of `written`.
fn affected_by(written: &Scope, cached_id: &str) -> bool {
    let cached = parse_identifier(cached_id);
    if cached == *written {
        return true;
    }
    match (written, &cached) {
        (Scope::TypeDefault { type_name }, Scope::Instance { type_name: owner, .. }) => {
            owner == type_name
        }
        _ => false,
    }
}
