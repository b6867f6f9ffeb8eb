//! Owner lifecycle hook
//!
//! Instance-scoped rows belong to their owner record. The owner's destruction
//! path must call in here synchronously; type-level and global rows are never
//! touched.

use tracing::info;

use crate::error::Result;
use crate::owner::SettingsOwner;
use crate::scope::Scope;
use crate::store::SettingsStore;

impl SettingsStore {
    /// Delete every row owned by the instance. Returns the number removed.
    ///
    /// Fails with `ArgumentError` for a type name no accessor could use.
    pub fn on_instance_destroyed(&self, type_name: &str, instance_id: &str) -> Result<usize> {
        let scope = Scope::for_instance(type_name, instance_id);
        scope.validate()?;
        let removed = self.adapter().delete_all(&scope)?;
        info!(scope = %scope, removed, "removed settings of destroyed owner");
        Ok(removed)
    }

    pub fn destroy_owner<O: SettingsOwner>(&self, owner: &O) -> Result<usize> {
        self.on_instance_destroyed(O::TYPE_NAME, &owner.instance_id())
    }
}
