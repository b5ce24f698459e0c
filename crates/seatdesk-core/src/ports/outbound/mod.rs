//! Outbound ports (Repository traits)
//!
//! Hexagonal architecture: these are the interfaces that infrastructure must implement.
//! Every tenant-scoped call carries the tenant id; an entity of another tenant
//! is reported exactly like a missing one.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::aggregates::{
    Attendance, Billing, Floor, Member, MemberStatus, MembershipStatus, Plan, Seat, SmsRecord,
    SmsTemplate, UserAccount,
};
use crate::domain::value_objects::{
    BillingId, FloorId, MemberId, MemberKey, PlanId, SeatId, TenantId, UserId,
};
use crate::domain::DomainEvent;

/// Member listing filter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub status: Option<MemberStatus>,
    pub membership_status: Option<MembershipStatus>,
    /// Inclusive plan expiry window
    pub expiring_between: Option<(NaiveDate, NaiveDate)>,
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        if let Some(status) = self.status {
            if member.status() != status {
                return false;
            }
        }
        if let Some(ms) = self.membership_status {
            if member.membership_status() != ms {
                return false;
            }
        }
        if let Some((from, to)) = self.expiring_between {
            match member.plan_expiry_date() {
                Some(expiry) if expiry >= from && expiry <= to => {}
                _ => return false,
            }
        }
        true
    }
}

/// Billing listing filter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BillingFilter {
    pub member: Option<MemberKey>,
    pub plan: Option<PlanId>,
}

impl BillingFilter {
    pub fn matches(&self, billing: &Billing) -> bool {
        self.member.map_or(true, |m| billing.member == m) && self.plan.map_or(true, |p| billing.plan == p)
    }
}

/// Result of a conditional seat assignment
#[derive(Clone, Debug, PartialEq)]
pub enum AssignOutcome {
    Assigned(Seat),
    AlreadyAssigned(MemberKey),
    NotFound,
}

/// Member repository port
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member by internal key
    async fn find_by_key(&self, tenant: &TenantId, key: &MemberKey) -> Result<Option<Member>, RepositoryError>;

    /// Find member by its `MEM-####` code
    async fn find_by_member_id(&self, tenant: &TenantId, id: &MemberId) -> Result<Option<Member>, RepositoryError>;

    /// List members, newest first
    async fn find_by_tenant(&self, tenant: &TenantId, filter: &MemberFilter) -> Result<Vec<Member>, RepositoryError>;

    /// Case-insensitive substring search over name, mobile and unique id
    async fn search(&self, tenant: &TenantId, query: &str, limit: usize) -> Result<Vec<Member>, RepositoryError>;

    /// Highest member number in use by the tenant
    async fn max_member_number(&self, tenant: &TenantId) -> Result<Option<u32>, RepositoryError>;

    /// Insert a new member; `DuplicateKey` when the code is taken in the tenant
    async fn insert(&self, member: &Member) -> Result<(), RepositoryError>;

    /// Overwrite an existing member
    async fn save(&self, member: &Member) -> Result<(), RepositoryError>;
}

/// Plan repository port
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn find_by_id(&self, tenant: &TenantId, id: &PlanId) -> Result<Option<Plan>, RepositoryError>;

    async fn find_by_tenant(&self, tenant: &TenantId) -> Result<Vec<Plan>, RepositoryError>;

    async fn save(&self, plan: &Plan) -> Result<(), RepositoryError>;

    /// Returns false when nothing was deleted
    async fn delete(&self, tenant: &TenantId, id: &PlanId) -> Result<bool, RepositoryError>;
}

/// Billing repository port (append-only)
#[async_trait]
pub trait BillingRepository: Send + Sync {
    async fn find_by_id(&self, tenant: &TenantId, id: &BillingId) -> Result<Option<Billing>, RepositoryError>;

    /// List billings, newest first
    async fn find_by_tenant(&self, tenant: &TenantId, filter: &BillingFilter) -> Result<Vec<Billing>, RepositoryError>;

    async fn insert(&self, billing: &Billing) -> Result<(), RepositoryError>;
}

/// Floor repository port
#[async_trait]
pub trait FloorRepository: Send + Sync {
    async fn find_by_id(&self, tenant: &TenantId, id: &FloorId) -> Result<Option<Floor>, RepositoryError>;

    async fn find_by_name(&self, tenant: &TenantId, name: &str) -> Result<Option<Floor>, RepositoryError>;

    async fn find_by_tenant(&self, tenant: &TenantId) -> Result<Vec<Floor>, RepositoryError>;

    /// Insert or update; `DuplicateKey` when another floor of the tenant has the name
    async fn save(&self, floor: &Floor) -> Result<(), RepositoryError>;

    async fn delete(&self, tenant: &TenantId, id: &FloorId) -> Result<bool, RepositoryError>;
}

/// Seat repository port
///
/// The seat record owns the assignment, so the assignment itself is a
/// conditional write made under the store's lock.
#[async_trait]
pub trait SeatRepository: Send + Sync {
    async fn find_by_id(&self, tenant: &TenantId, id: &SeatId) -> Result<Option<Seat>, RepositoryError>;

    /// List seats, optionally restricted to one floor, ordered by number
    async fn find_by_tenant(&self, tenant: &TenantId, floor: Option<&FloorId>) -> Result<Vec<Seat>, RepositoryError>;

    async fn count_by_floor(&self, tenant: &TenantId, floor: &FloorId) -> Result<usize, RepositoryError>;

    /// Insert a new seat; `DuplicateKey` when the number exists on the floor
    async fn insert(&self, seat: &Seat) -> Result<(), RepositoryError>;

    /// Delete a seat, returning it
    async fn delete(&self, tenant: &TenantId, id: &SeatId) -> Result<Option<Seat>, RepositoryError>;

    /// Assign the seat only when it is vacant
    async fn assign_if_vacant(
        &self,
        tenant: &TenantId,
        id: &SeatId,
        member: &MemberKey,
    ) -> Result<AssignOutcome, RepositoryError>;

    /// Clear the assignment; `expected` limits it to a specific holder.
    /// Returns the seat after the write, or `None` when nothing changed.
    async fn release(
        &self,
        tenant: &TenantId,
        id: &SeatId,
        expected: Option<&MemberKey>,
    ) -> Result<Option<Seat>, RepositoryError>;
}

/// Attendance repository port
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Insert a record; `DuplicateKey` when the member already has one for the date
    async fn insert(&self, record: &Attendance) -> Result<(), RepositoryError>;

    /// Records of one member within an inclusive date range, oldest first
    async fn find_by_member(
        &self,
        tenant: &TenantId,
        member: &MemberKey,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>, RepositoryError>;
}

/// SMS template and history repository port
#[async_trait]
pub trait SmsRepository: Send + Sync {
    async fn insert_template(&self, template: &SmsTemplate) -> Result<(), RepositoryError>;

    async fn templates(&self, tenant: &TenantId) -> Result<Vec<SmsTemplate>, RepositoryError>;

    async fn insert_record(&self, record: &SmsRecord) -> Result<(), RepositoryError>;

    /// Send history, newest first
    async fn history(&self, tenant: &TenantId) -> Result<Vec<SmsRecord>, RepositoryError>;
}

/// Account repository port
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError>;

    /// `DuplicateKey` when the username is taken
    async fn insert(&self, account: &UserAccount) -> Result<(), RepositoryError>;

    async fn subadmins_of(&self, parent: &UserId) -> Result<Vec<UserAccount>, RepositoryError>;
}

/// Per-tenant member number allocator
#[async_trait]
pub trait MemberIdSequence: Send + Sync {
    /// Reserve the next number for the tenant
    ///
    /// `floor` is the highest number known to be in use; the counter never
    /// hands out anything at or below it.
    async fn next(&self, tenant: &TenantId, floor: u32) -> Result<u32, RepositoryError>;

    /// Peek at the number `next` would hand out, without reserving it
    async fn peek(&self, tenant: &TenantId, floor: u32) -> Result<u32, RepositoryError>;

    /// Record a number that was taken outside the counter
    async fn observe(&self, tenant: &TenantId, number: u32) -> Result<(), RepositoryError>;
}

/// Source of the current calendar day
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish domain events
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError>;
}

/// Outbound SMS delivery
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, recipients: &[String], content: &str) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sms gateway error: {0}")]
pub struct GatewayError(pub String);

/// Repository error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("entity not found")]
    NotFound,
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("query error: {0}")]
    QueryError(String),
}
