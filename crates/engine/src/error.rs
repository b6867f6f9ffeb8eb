//! Error types for the settings engine
//!
//! `SettingsError` is what callers of an accessor see. `StoreError` is what a
//! row store backend reports; it converts into `SettingsError::Store`.

use thiserror::Error;

/// Failure reported by a row store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation
    #[error("row store backend error: {0}")]
    Backend(String),

    /// Filesystem failure while opening or writing the backend
    #[error("row store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A stored payload could not be decoded, or a typed value could not be
    /// converted to or from its stored form.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// `destroy` found no row at the accessor's own scope.
    #[error("setting '{name}' not found in scope '{scope}'")]
    SettingNotFound { scope: String, name: String },

    /// `merge` target exists but does not hold a mapping.
    #[error("cannot merge into setting '{name}': existing value is {found}, not a mapping")]
    TypeError { name: String, found: &'static str },

    /// An argument was rejected before touching the store.
    #[error("invalid argument: {0}")]
    ArgumentError(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SettingsError>;
