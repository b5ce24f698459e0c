//! Inbound ports (Use case traits)
//!
//! Hexagonal architecture: application service interfaces. Every call takes
//! the acting account; the tenant is derived from it, never passed in.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::application::dto::*;
use crate::domain::aggregates::{
    Attendance, Billing, Floor, FloorError, FloorPatch, Member, MemberError, MemberProfilePatch, NewPlan, Plan,
    PlanError, PlanPatch, Seat, SeatError, SmsRecord, SmsTemplate, UserAccount,
};
use crate::domain::services::{PricingError, Quote};
use crate::domain::value_objects::{
    Actor, ActorError, BillingId, FloorId, MemberId, MemberIdError, MemberKey, PlanId, SeatId,
};
use crate::ports::outbound::{BillingFilter, RepositoryError};

/// Member lifecycle use cases
#[async_trait]
pub trait MembershipUseCases: Send + Sync {
    /// Register a member, optionally enrolling it in a plan right away
    async fn add_member(&self, actor: &Actor, command: AddMemberCommand) -> Result<MemberAdded, UseCaseError>;

    async fn get_member(&self, actor: &Actor, key: &MemberKey) -> Result<Member, UseCaseError>;

    async fn list_members(&self, actor: &Actor, category: MemberCategory) -> Result<Vec<Member>, UseCaseError>;

    /// At most 20 matches on name, mobile or unique id
    async fn search_members(&self, actor: &Actor, query: &str) -> Result<Vec<Member>, UseCaseError>;

    /// Update profile fields only
    async fn update_member(
        &self,
        actor: &Actor,
        key: &MemberKey,
        patch: MemberProfilePatch,
    ) -> Result<Member, UseCaseError>;

    async fn block_member(&self, actor: &Actor, key: &MemberKey) -> Result<Member, UseCaseError>;

    async fn unblock_member(&self, actor: &Actor, key: &MemberKey) -> Result<Member, UseCaseError>;

    async fn mark_left(&self, actor: &Actor, key: &MemberKey) -> Result<Member, UseCaseError>;

    async fn freeze_member(
        &self,
        actor: &Actor,
        key: &MemberKey,
        command: FreezeCommand,
    ) -> Result<Member, UseCaseError>;

    async fn unfreeze_member(&self, actor: &Actor, key: &MemberKey) -> Result<UnfreezeResult, UseCaseError>;

    /// Expire lapsed memberships of the actor's tenant; returns how many changed
    async fn mark_expired(&self, actor: &Actor) -> Result<usize, UseCaseError>;

    /// Code the next auto-allocated member would get
    async fn next_member_id(&self, actor: &Actor) -> Result<MemberId, UseCaseError>;
}

/// Enrollment and billing use cases
#[async_trait]
pub trait EnrollmentUseCases: Send + Sync {
    /// Price a plan without writing anything
    async fn quote(&self, actor: &Actor, plan: &PlanId, payment: &PaymentInput) -> Result<Quote, UseCaseError>;

    /// Create or renew a plan for a member and record its billing
    async fn enroll(&self, actor: &Actor, command: EnrollCommand) -> Result<Enrollment, UseCaseError>;

    async fn get_billing(&self, actor: &Actor, id: &BillingId) -> Result<Billing, UseCaseError>;

    async fn list_billings(&self, actor: &Actor, filter: BillingFilter) -> Result<Vec<Billing>, UseCaseError>;

    async fn member_billings(&self, actor: &Actor, member: &MemberKey) -> Result<Vec<Billing>, UseCaseError>;
}

/// Plan catalog use cases
#[async_trait]
pub trait PlanUseCases: Send + Sync {
    async fn create_plan(&self, actor: &Actor, command: NewPlan) -> Result<Plan, UseCaseError>;

    async fn list_plans(&self, actor: &Actor) -> Result<Vec<Plan>, UseCaseError>;

    async fn get_plan(&self, actor: &Actor, id: &PlanId) -> Result<Plan, UseCaseError>;

    async fn update_plan(&self, actor: &Actor, id: &PlanId, patch: PlanPatch) -> Result<Plan, UseCaseError>;

    async fn set_plan_enabled(&self, actor: &Actor, id: &PlanId, enabled: bool) -> Result<Plan, UseCaseError>;

    async fn delete_plan(&self, actor: &Actor, id: &PlanId) -> Result<(), UseCaseError>;
}

/// Floors and seats
#[async_trait]
pub trait SeatingUseCases: Send + Sync {
    async fn create_floor(&self, actor: &Actor, command: CreateFloorCommand) -> Result<Floor, UseCaseError>;

    async fn list_floors(&self, actor: &Actor) -> Result<Vec<FloorWithSeats>, UseCaseError>;

    async fn get_floor(&self, actor: &Actor, id: &FloorId) -> Result<FloorWithSeats, UseCaseError>;

    async fn update_floor(&self, actor: &Actor, id: &FloorId, patch: FloorPatch) -> Result<Floor, UseCaseError>;

    /// Refused while the floor still has seats
    async fn delete_floor(&self, actor: &Actor, id: &FloorId) -> Result<(), UseCaseError>;

    async fn create_seats(&self, actor: &Actor, command: BulkSeatsCommand) -> Result<BulkSeatsReport, UseCaseError>;

    async fn list_seats(&self, actor: &Actor, floor: Option<FloorId>) -> Result<Vec<Seat>, UseCaseError>;

    async fn seats_by_floor(&self, actor: &Actor, floor: &FloorId) -> Result<Vec<Seat>, UseCaseError>;

    async fn get_seat(&self, actor: &Actor, id: &SeatId) -> Result<Seat, UseCaseError>;

    async fn delete_seat(&self, actor: &Actor, id: &SeatId) -> Result<(), UseCaseError>;

    /// Assign a vacant seat to the member with the given code
    async fn assign_seat(&self, actor: &Actor, seat: &SeatId, member: &MemberId) -> Result<Seat, UseCaseError>;

    async fn unassign_seat(&self, actor: &Actor, seat: &SeatId) -> Result<Seat, UseCaseError>;
}

#[async_trait]
pub trait AttendanceUseCases: Send + Sync {
    async fn mark_attendance(&self, actor: &Actor, command: MarkAttendanceCommand) -> Result<Attendance, UseCaseError>;

    async fn attendance_history(
        &self,
        actor: &Actor,
        member: &MemberKey,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>, UseCaseError>;
}

#[async_trait]
pub trait MessagingUseCases: Send + Sync {
    async fn create_template(&self, actor: &Actor, command: CreateTemplateCommand) -> Result<SmsTemplate, UseCaseError>;

    async fn list_templates(&self, actor: &Actor) -> Result<Vec<SmsTemplate>, UseCaseError>;

    /// Record a bulk send; delivery failures never fail the call
    async fn send_bulk(&self, actor: &Actor, command: SendSmsCommand) -> Result<SmsRecord, UseCaseError>;

    async fn sms_history(&self, actor: &Actor) -> Result<Vec<SmsRecord>, UseCaseError>;
}

/// Admin-only account management
#[async_trait]
pub trait AccountUseCases: Send + Sync {
    async fn register_subadmin(&self, actor: &Actor, command: RegisterSubadminCommand) -> Result<UserAccount, UseCaseError>;

    async fn list_subadmins(&self, actor: &Actor) -> Result<Vec<UserAccount>, UseCaseError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UseCaseError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("illegal state: {0}")]
    IllegalState(String),
    /// A billing was written but the member update that follows it failed
    #[error("billing {billing_id} was recorded but the member update failed: {reason}")]
    PartialFailure { billing_id: BillingId, reason: String },
    /// The member was stored but the enrollment that follows it did not complete
    #[error("member {member_id} ({member}) was created but enrollment failed: {reason}")]
    EnrollmentIncomplete { member: MemberKey, member_id: MemberId, reason: String },
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl UseCaseError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{what} {id}"))
    }
}

impl From<RepositoryError> for UseCaseError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::DuplicateKey(k) => Self::Conflict(format!("{k} already exists")),
            RepositoryError::NotFound => Self::NotFound("entity".to_string()),
            other => Self::Repository(other.to_string()),
        }
    }
}

impl From<MemberError> for UseCaseError {
    fn from(e: MemberError) -> Self {
        match e {
            MemberError::AlreadyFrozen => Self::Conflict(e.to_string()),
            MemberError::FreezeStartInPast { .. } | MemberError::ReasonTooLong(_) | MemberError::DateOverflow => {
                Self::ValidationFailed(e.to_string())
            }
            MemberError::NoActivePlan
            | MemberError::NotFrozen
            | MemberError::MissingFreezeStart
            | MemberError::FrozenMemberLocked => Self::IllegalState(e.to_string()),
        }
    }
}

impl From<PlanError> for UseCaseError {
    fn from(e: PlanError) -> Self {
        Self::ValidationFailed(e.to_string())
    }
}

impl From<PricingError> for UseCaseError {
    fn from(e: PricingError) -> Self {
        Self::ValidationFailed(e.to_string())
    }
}

impl From<MemberIdError> for UseCaseError {
    fn from(e: MemberIdError) -> Self {
        Self::ValidationFailed(e.to_string())
    }
}

impl From<SeatError> for UseCaseError {
    fn from(e: SeatError) -> Self {
        match e {
            SeatError::Occupied(_) => Self::Conflict(e.to_string()),
            SeatError::InvalidCount(_) | SeatError::NumberOverflow => Self::ValidationFailed(e.to_string()),
        }
    }
}

impl From<FloorError> for UseCaseError {
    fn from(e: FloorError) -> Self {
        Self::ValidationFailed(e.to_string())
    }
}

impl From<ActorError> for UseCaseError {
    fn from(e: ActorError) -> Self {
        Self::Unauthorized(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_mapping() {
        assert!(matches!(
            UseCaseError::from(RepositoryError::DuplicateKey("MEM-0001".into())),
            UseCaseError::Conflict(_)
        ));
        assert!(matches!(UseCaseError::from(RepositoryError::NotFound), UseCaseError::NotFound(_)));
        assert!(matches!(
            UseCaseError::from(RepositoryError::ConnectionError("down".into())),
            UseCaseError::Repository(_)
        ));
    }

    #[test]
    fn test_member_error_mapping() {
        assert!(matches!(UseCaseError::from(MemberError::AlreadyFrozen), UseCaseError::Conflict(_)));
        assert!(matches!(UseCaseError::from(MemberError::NotFrozen), UseCaseError::IllegalState(_)));
        assert!(matches!(UseCaseError::from(MemberError::ReasonTooLong(201)), UseCaseError::ValidationFailed(_)));
    }
}
