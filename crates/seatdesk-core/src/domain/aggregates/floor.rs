//! Floor Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{FloorId, TenantId, UserId};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Floor {
    pub id: FloorId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: u32,
    pub created_by: UserId,
    pub root_admin: TenantId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FloorPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<u32>,
}

impl Floor {
    pub fn new(
        name: &str,
        description: Option<String>,
        capacity: u32,
        tenant: TenantId,
        created_by: UserId,
    ) -> Result<Self, FloorError> {
        let name = normalize_name(name)?;
        let now = Utc::now();
        Ok(Self {
            id: FloorId::new(),
            name,
            description: description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
            capacity,
            created_by,
            root_admin: tenant,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: FloorPatch) -> Result<(), FloorError> {
        if let Some(name) = patch.name {
            self.name = normalize_name(&name)?;
        }
        if let Some(description) = patch.description {
            let description = description.trim().to_string();
            self.description = (!description.is_empty()).then_some(description);
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Names compare case-insensitively within a tenant
    pub fn same_name(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other.trim())
    }
}

fn normalize_name(name: &str) -> Result<String, FloorError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FloorError::MissingName);
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FloorError {
    #[error("floor name is required")]
    MissingName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_validates() {
        let floor = Floor::new("  Ground ", Some(" ".into()), 0, TenantId::new(), UserId::new()).unwrap();
        assert_eq!(floor.name, "Ground");
        assert!(floor.description.is_none());
        assert!(floor.same_name("ground"));

        assert_eq!(
            Floor::new(" ", None, 0, TenantId::new(), UserId::new()).unwrap_err(),
            FloorError::MissingName
        );
    }
}
