//! Authenticated actor

use serde::{Deserialize, Serialize};

use super::UserId;

/// Role of an authenticated account
///
/// A subadmin always carries the root admin it acts for, so the tenant of
/// every actor is known without further lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    Admin,
    Subadmin { parent: UserId },
}

/// The account on whose behalf an operation runs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    #[serde(flatten)]
    role: Role,
}

impl Actor {
    pub fn admin(id: UserId) -> Self {
        Self { id, role: Role::Admin }
    }

    pub fn subadmin(id: UserId, parent: UserId) -> Self {
        Self { id, role: Role::Subadmin { parent } }
    }

    /// Build an actor from an untyped account record (e.g. token claims)
    pub fn from_parts(id: UserId, role: &str, parent: Option<UserId>) -> Result<Self, ActorError> {
        match (role, parent) {
            ("admin", _) => Ok(Self::admin(id)),
            ("subadmin", Some(parent)) => Ok(Self::subadmin(id, parent)),
            ("subadmin", None) => Err(ActorError::MissingParent),
            (other, _) => Err(ActorError::UnknownRole(other.to_string())),
        }
    }

    pub fn id(&self) -> UserId { self.id }
    pub fn role(&self) -> &Role { &self.role }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    pub fn role_name(&self) -> &'static str {
        match self.role {
            Role::Admin => "admin",
            Role::Subadmin { .. } => "subadmin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    #[error("subadmin account has no parent admin")]
    MissingParent,
    #[error("unknown role `{0}`")]
    UnknownRole(String),
}
