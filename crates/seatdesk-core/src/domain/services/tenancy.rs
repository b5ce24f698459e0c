//! Tenant scope resolution

use crate::domain::value_objects::{Actor, Role, TenantId};

/// Maps an actor onto the tenant whose data it may touch
pub struct TenantScope;

impl TenantScope {
    /// Admins own their tenant; subadmins act inside their parent's
    pub fn resolve(actor: &Actor) -> TenantId {
        match actor.role() {
            Role::Admin => TenantId::from(actor.id()),
            Role::Subadmin { parent } => TenantId::from(*parent),
        }
    }
}
