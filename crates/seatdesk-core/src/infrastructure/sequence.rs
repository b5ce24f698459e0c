//! Per-tenant member number counter

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::value_objects::{member_id::MAX_MEMBER_NUMBER, TenantId};
use crate::ports::outbound::{MemberIdSequence, RepositoryError};

/// Counter per tenant, held in a `DashMap` so tenants never contend
#[derive(Default)]
pub struct InMemoryMemberIdSequence {
    last: DashMap<TenantId, u32>,
}

impl InMemoryMemberIdSequence {
    pub fn new() -> Self {
        Self::default()
    }
}

fn exhausted() -> RepositoryError {
    RepositoryError::QueryError(format!("member numbers exhausted (max {MAX_MEMBER_NUMBER})"))
}

#[async_trait]
impl MemberIdSequence for InMemoryMemberIdSequence {
    async fn next(&self, tenant: &TenantId, floor: u32) -> Result<u32, RepositoryError> {
        let mut last = self.last.entry(*tenant).or_insert(0);
        let next = (*last).max(floor).checked_add(1).filter(|n| *n <= MAX_MEMBER_NUMBER).ok_or_else(exhausted)?;
        *last = next;
        Ok(next)
    }

    async fn peek(&self, tenant: &TenantId, floor: u32) -> Result<u32, RepositoryError> {
        let last = self.last.get(tenant).map(|v| *v).unwrap_or(0);
        last.max(floor).checked_add(1).filter(|n| *n <= MAX_MEMBER_NUMBER).ok_or_else(exhausted)
    }

    async fn observe(&self, tenant: &TenantId, number: u32) -> Result<(), RepositoryError> {
        let mut last = self.last.entry(*tenant).or_insert(0);
        if number > *last {
            *last = number;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequence_per_tenant() {
        let seq = InMemoryMemberIdSequence::new();
        let t1 = TenantId::new();
        let t2 = TenantId::new();

        assert_eq!(seq.next(&t1, 0).await.unwrap(), 1);
        assert_eq!(seq.next(&t1, 0).await.unwrap(), 2);
        assert_eq!(seq.next(&t2, 0).await.unwrap(), 1);
        assert_eq!(seq.peek(&t1, 0).await.unwrap(), 3);
        assert_eq!(seq.next(&t1, 0).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_floor_and_observe_skip_taken_numbers() {
        let seq = InMemoryMemberIdSequence::new();
        let tenant = TenantId::new();

        assert_eq!(seq.next(&tenant, 41).await.unwrap(), 42);
        seq.observe(&tenant, 50).await.unwrap();
        seq.observe(&tenant, 10).await.unwrap();
        assert_eq!(seq.next(&tenant, 0).await.unwrap(), 51);
    }

    #[tokio::test]
    async fn test_exhaustion() {
        let seq = InMemoryMemberIdSequence::new();
        let tenant = TenantId::new();
        assert!(seq.next(&tenant, MAX_MEMBER_NUMBER).await.is_err());
    }
}
