//! Scope resolution
//!
//! A `Scope` says where a setting row lives:
//! - `Global`: one process-wide bucket, identifier `"global"`
//! - `TypeDefault`: shared by every instance of an owner type, identifier `"User"`
//! - `Instance`: one owner record, identifier `"User#42"`
//!
//! Reads walk the fallback chain, most specific first:
//! Instance -> TypeDefault. Global and TypeDefault resolve only against
//! themselves. Whatever no row answers is left to the defaults registry.

use std::fmt;

use crate::error::{Result, SettingsError};

/// Identifier of the global scope in the row store.
pub const GLOBAL_IDENTIFIER: &str = "global";

/// Separates the type name from the instance id in an instance identifier.
pub const INSTANCE_SEPARATOR: char = '#';

/// The kind of a scope, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    TypeDefault,
    Instance,
}

/// Where a setting row is stored and looked up
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Process-wide settings
    Global,
    /// Defaults shared by every instance of `type_name`
    TypeDefault { type_name: String },
    /// Overrides owned by a single record
    Instance { type_name: String, instance_id: String },
}

impl Scope {
    pub fn global() -> Self {
        Scope::Global
    }

    pub fn for_type(type_name: impl Into<String>) -> Self {
        Scope::TypeDefault {
            type_name: type_name.into(),
        }
    }

    pub fn for_instance(type_name: impl Into<String>, instance_id: impl ToString) -> Self {
        Scope::Instance {
            type_name: type_name.into(),
            instance_id: instance_id.to_string(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::Global => ScopeKind::Global,
            Scope::TypeDefault { .. } => ScopeKind::TypeDefault,
            Scope::Instance { .. } => ScopeKind::Instance,
        }
    }

    /// Owner type name, if the scope belongs to one
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Scope::Global => None,
            Scope::TypeDefault { type_name } | Scope::Instance { type_name, .. } => Some(type_name),
        }
    }

    /// The row-store key for this scope
    pub fn identifier(&self) -> String {
        match self {
            Scope::Global => identifier_for(ScopeKind::Global, "", None),
            Scope::TypeDefault { type_name } => {
                identifier_for(ScopeKind::TypeDefault, type_name, None)
            }
            Scope::Instance {
                type_name,
                instance_id,
            } => identifier_for(ScopeKind::Instance, type_name, Some(instance_id)),
        }
    }

    /// The next broader scope consulted on a read miss
    pub fn parent(&self) -> Option<Scope> {
        match self {
            Scope::Instance { type_name, .. } => Some(Scope::for_type(type_name.clone())),
            Scope::Global | Scope::TypeDefault { .. } => None,
        }
    }

    /// Identifiers consulted on read, most specific first
    pub fn fallback_chain(&self) -> Vec<String> {
        fallback_chain(self)
    }

    /// Reject scopes whose identifier another scope could also produce.
    pub fn validate(&self) -> Result<()> {
        match self.type_name() {
            Some(type_name) => validate_type_name(type_name),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

/// Compute the row-store identifier for a scope.
///
/// `type_name` is ignored for `Global`. An `Instance` without an id has no
/// record to point at and addresses the type-level scope instead.
pub fn identifier_for(kind: ScopeKind, type_name: &str, instance_id: Option<&str>) -> String {
    match (kind, instance_id) {
        (ScopeKind::Global, _) => GLOBAL_IDENTIFIER.to_string(),
        (ScopeKind::TypeDefault, _) | (ScopeKind::Instance, None) => type_name.to_string(),
        (ScopeKind::Instance, Some(id)) => format!("{type_name}{INSTANCE_SEPARATOR}{id}"),
    }
}

/// Identifiers consulted when reading through `scope`, most specific first.
pub fn fallback_chain(scope: &Scope) -> Vec<String> {
    let mut chain = vec![scope.identifier()];
    let mut current = scope.parent();
    while let Some(next) = current {
        chain.push(next.identifier());
        current = next.parent();
    }
    chain
}

/// Check that `type_name` yields identifiers no other scope shares.
///
/// Empty names, the global identifier and names containing the instance
/// separator are rejected with `ArgumentError`.
pub fn validate_type_name(type_name: &str) -> Result<()> {
    let problem = if type_name.is_empty() {
        "must not be empty"
    } else if type_name == GLOBAL_IDENTIFIER {
        "is reserved for global settings"
    } else if type_name.contains(INSTANCE_SEPARATOR) {
        "must not contain the instance separator"
    } else {
        return Ok(());
    };
    Err(SettingsError::ArgumentError(format!(
        "owner type name '{type_name}' {problem}"
    )))
}

/// Inverse of `identifier_for`, for identifiers of validated scopes.
pub fn parse_identifier(identifier: &str) -> Scope {
    if identifier == GLOBAL_IDENTIFIER {
        return Scope::Global;
    }
    match identifier.split_once(INSTANCE_SEPARATOR) {
        Some((type_name, instance_id)) => Scope::for_instance(type_name, instance_id),
        None => Scope::for_type(identifier),
    }
}
