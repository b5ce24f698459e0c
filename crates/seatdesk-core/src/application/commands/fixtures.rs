//! Shared test fixtures for the application services

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::aggregates::{Billing, Member, MemberProfile};
use crate::domain::services::TenantScope;
use crate::domain::value_objects::{Actor, BillingId, MemberId, MemberKey, TenantId, UserId};
use crate::infrastructure::persistence::InMemoryMemberRepository;
use crate::infrastructure::FixedClock;
use crate::ports::outbound::{
    BillingFilter, BillingRepository, MemberFilter, MemberRepository, RepositoryError,
};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn today() -> NaiveDate {
    day(2026, 3, 10)
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(today()))
}

pub fn admin() -> Actor {
    Actor::admin(UserId::new())
}

pub fn subadmin_of(admin: &Actor) -> Actor {
    Actor::subadmin(UserId::new(), admin.id())
}

pub fn profile(name: &str) -> MemberProfile {
    MemberProfile {
        name: name.to_string(),
        mobile: "9000000000".to_string(),
        ..Default::default()
    }
}

/// Insert a registered, not yet enrolled member
pub async fn seed_member(repo: &dyn MemberRepository, actor: &Actor, code: &str) -> Member {
    let mut member = Member::register(
        MemberId::parse(code).unwrap(),
        profile("Test Member"),
        TenantScope::resolve(actor),
        actor.id(),
    );
    member.take_events();
    repo.insert(&member).await.unwrap();
    member
}

/// Member store whose updates always fail
#[derive(Default)]
pub struct FailingSaveMemberRepository {
    inner: InMemoryMemberRepository,
}

impl FailingSaveMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberRepository for FailingSaveMemberRepository {
    async fn find_by_key(&self, tenant: &TenantId, key: &MemberKey) -> Result<Option<Member>, RepositoryError> {
        self.inner.find_by_key(tenant, key).await
    }

    async fn find_by_member_id(&self, tenant: &TenantId, id: &MemberId) -> Result<Option<Member>, RepositoryError> {
        self.inner.find_by_member_id(tenant, id).await
    }

    async fn find_by_tenant(&self, tenant: &TenantId, filter: &MemberFilter) -> Result<Vec<Member>, RepositoryError> {
        self.inner.find_by_tenant(tenant, filter).await
    }

    async fn search(&self, tenant: &TenantId, query: &str, limit: usize) -> Result<Vec<Member>, RepositoryError> {
        self.inner.search(tenant, query, limit).await
    }

    async fn max_member_number(&self, tenant: &TenantId) -> Result<Option<u32>, RepositoryError> {
        self.inner.max_member_number(tenant).await
    }

    async fn insert(&self, member: &Member) -> Result<(), RepositoryError> {
        self.inner.insert(member).await
    }

    async fn save(&self, _member: &Member) -> Result<(), RepositoryError> {
        Err(RepositoryError::ConnectionError("member store unavailable".into()))
    }
}

/// Billing store that rejects every write
pub struct FailingBillingRepository;

#[async_trait]
impl BillingRepository for FailingBillingRepository {
    async fn find_by_id(&self, _tenant: &TenantId, _id: &BillingId) -> Result<Option<Billing>, RepositoryError> {
        Ok(None)
    }

    async fn find_by_tenant(&self, _tenant: &TenantId, _filter: &BillingFilter) -> Result<Vec<Billing>, RepositoryError> {
        Ok(vec![])
    }

    async fn insert(&self, _billing: &Billing) -> Result<(), RepositoryError> {
        Err(RepositoryError::ConnectionError("billing store unavailable".into()))
    }
}
