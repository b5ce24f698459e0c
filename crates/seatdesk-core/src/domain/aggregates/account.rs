//! Login accounts (admins and subadmins)

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::{Actor, Role, UserId};

/// An account known to the identity provider
///
/// Credentials never live on this record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    #[serde(flatten)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn admin(username: &str) -> Self {
        Self::with_role(UserId::new(), username, Role::Admin)
    }

    pub fn subadmin(username: &str, parent: UserId) -> Self {
        Self::with_role(UserId::new(), username, Role::Subadmin { parent })
    }

    pub fn with_role(id: UserId, username: &str, role: Role) -> Self {
        Self {
            id,
            username: username.trim().to_lowercase(),
            role,
            created_at: Utc::now(),
        }
    }

    pub fn actor(&self) -> Actor {
        match self.role {
            Role::Admin => Actor::admin(self.id),
            Role::Subadmin { parent } => Actor::subadmin(self.id, parent),
        }
    }
}
