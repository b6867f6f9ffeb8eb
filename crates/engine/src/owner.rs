//! Owner entities
//!
//! Any type whose records carry their own settings implements
//! `SettingsOwner`. The store derives owner queries purely from which
//! instance scopes hold rows; nothing extra is stored.

use crate::error::Result;
use crate::scope::Scope;
use crate::store::SettingsStore;

/// A type whose records own instance-scoped settings.
///
/// Implementors must call `SettingsStore::destroy_owner` (or
/// `on_instance_destroyed`) from their own destruction path; row cleanup is
/// not automatic.
pub trait SettingsOwner {
    /// Stable type name; the `TypeDefault` scope identifier
    const TYPE_NAME: &'static str;

    /// Stable identifier of this record, unique within the type
    fn instance_id(&self) -> String;

    fn settings_scope(&self) -> Scope {
        Scope::for_instance(Self::TYPE_NAME, self.instance_id())
    }
}

impl SettingsStore {
    /// Owners with at least one setting of their own
    pub fn with_settings<'o, O: SettingsOwner>(&self, owners: &'o [O]) -> Result<Vec<&'o O>> {
        self.filter_owners(owners, None, true)
    }

    /// Owners with their own row for `name`
    pub fn with_settings_for<'o, O: SettingsOwner>(
        &self,
        owners: &'o [O],
        name: &str,
    ) -> Result<Vec<&'o O>> {
        self.filter_owners(owners, Some(name), true)
    }

    /// Owners with no settings of their own
    pub fn without_settings<'o, O: SettingsOwner>(&self, owners: &'o [O]) -> Result<Vec<&'o O>> {
        self.filter_owners(owners, None, false)
    }

    /// Owners without their own row for `name`
    pub fn without_settings_for<'o, O: SettingsOwner>(
        &self,
        owners: &'o [O],
        name: &str,
    ) -> Result<Vec<&'o O>> {
        self.filter_owners(owners, Some(name), false)
    }

    fn filter_owners<'o, O: SettingsOwner>(
        &self,
        owners: &'o [O],
        name: Option<&str>,
        present: bool,
    ) -> Result<Vec<&'o O>> {
        let mut matched = Vec::new();
        for owner in owners {
            let scope = owner.settings_scope();
            scope.validate()?;
            let scope_id = scope.identifier();
            if self.adapter().has_rows(&scope_id, name)? == present {
                matched.push(owner);
            }
        }
        Ok(matched)
    }
}
