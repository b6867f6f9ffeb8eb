//! Scoped settings engine
//!
//! Named settings stored at three scopes (global, per owner type, per owner
//! instance), resolved through a fallback chain, a defaults registry and a
//! process-local read cache.

pub mod accessor;
pub mod adapter;
pub mod cache;
pub mod defaults;
pub mod error;
pub mod lifecycle;
pub mod owner;
pub mod row_store;
pub mod scope;
pub mod store;
pub mod value;

pub use accessor::ScopedSettings;
pub use error::{Result, SettingsError, StoreError};
pub use owner::SettingsOwner;
pub use row_store::{MemoryRowStore, RowStore};
pub use scope::{Scope, ScopeKind};
pub use store::SettingsStore;
pub use value::{Mapping, Value};
