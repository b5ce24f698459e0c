//! SeatDesk Membership Platform
//!
//! Multi-tenant membership management for study halls and co-working spaces:
//! members, plans, billing, seats, attendance and SMS.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SEATDESK CORE                                    │
//! │                                                                         │
//! │   Actor ─► TenantScope ─► Application Service ─► Repositories           │
//! │                                  │                                      │
//! │            ┌─────────────────────┼──────────────────────┐               │
//! │            ▼                     ▼                      ▼               │
//! │   ┌────────────────┐   ┌──────────────────┐   ┌─────────────────┐       │
//! │   │   Enrollment   │   │    Membership    │   │     Pricing     │       │
//! │   │  Orchestrator  │──►│    Lifecycle     │   │   Calculator    │       │
//! │   └────────────────┘   └──────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **Domain Layer**: aggregates (Member, Plan, Billing, Seat, Floor, ...),
//!   value objects, domain events and domain services
//! - **Ports Layer**: use-case traits (inbound) and repository traits (outbound)
//! - **Application Layer**: services that orchestrate the use cases
//! - **Infrastructure Layer**: in-memory stores, clocks, id sequences, SMS stub

pub mod domain;
pub mod application;
pub mod ports;
pub mod infrastructure;

use std::sync::Arc;

pub use domain::aggregates::{
    Member, MemberStatus, MembershipStatus, Plan, Billing, BillingStatus, Seat, Floor,
    Attendance, SmsTemplate, SmsRecord, UserAccount,
};
pub use domain::value_objects::{Actor, Role, TenantId, UserId, MemberId, MemberKey, PlanId};
pub use domain::services::{PricingCalculator, Quote, TenantScope};
pub use domain::events::DomainEvent;
pub use application::{
    AccountService, AttendanceService, EnrollmentService, MembershipService, MessagingService,
    PlanService, SeatingService,
};
pub use ports::inbound::{
    AccountUseCases, AttendanceUseCases, EnrollmentUseCases, MembershipUseCases,
    MessagingUseCases, PlanUseCases, SeatingUseCases, UseCaseError,
};
pub use ports::outbound::{Clock, RepositoryError};

use infrastructure::persistence::{
    InMemoryAccountRepository, InMemoryAttendanceRepository, InMemoryBillingRepository,
    InMemoryFloorRepository, InMemoryMemberRepository, InMemoryPlanRepository,
    InMemorySeatRepository, InMemorySmsRepository,
};
use infrastructure::{InMemoryMemberIdSequence, SystemClock, TracingEventPublisher, TracingSmsGateway};

/// Fully wired platform: one handle per use-case family
#[derive(Clone)]
pub struct SeatDesk {
    /// Member registration, lifecycle and lookups
    pub members: Arc<dyn MembershipUseCases>,
    /// Plan enrollment and billing records
    pub enrollment: Arc<dyn EnrollmentUseCases>,
    /// Plan catalog
    pub plans: Arc<dyn PlanUseCases>,
    /// Floors and seats
    pub seating: Arc<dyn SeatingUseCases>,
    /// Attendance register
    pub attendance: Arc<dyn AttendanceUseCases>,
    /// SMS templates and sends
    pub messaging: Arc<dyn MessagingUseCases>,
    /// Subadmin accounts
    pub accounts: Arc<dyn AccountUseCases>,
}

impl SeatDesk {
    /// Platform backed by in-memory stores and the system clock
    pub fn in_memory() -> Self {
        Self::in_memory_with_clock(Arc::new(SystemClock))
    }

    /// Platform backed by in-memory stores and the given clock
    pub fn in_memory_with_clock(clock: Arc<dyn Clock>) -> Self {
        let member_repo = Arc::new(InMemoryMemberRepository::new());
        let plan_repo = Arc::new(InMemoryPlanRepository::new());
        let billing_repo = Arc::new(InMemoryBillingRepository::new());
        let seat_repo = Arc::new(InMemorySeatRepository::new());
        let floor_repo = Arc::new(InMemoryFloorRepository::new());
        let events = Arc::new(TracingEventPublisher);

        let enrollment = Arc::new(EnrollmentService::new(
            member_repo.clone(),
            plan_repo.clone(),
            billing_repo,
            events.clone(),
            clock.clone(),
        ));

        Self {
            members: Arc::new(MembershipService::new(
                member_repo.clone(),
                Arc::new(InMemoryMemberIdSequence::new()),
                enrollment.clone(),
                events.clone(),
                clock.clone(),
            )),
            enrollment,
            plans: Arc::new(PlanService::new(plan_repo)),
            seating: Arc::new(SeatingService::new(
                floor_repo,
                seat_repo,
                member_repo.clone(),
                events,
            )),
            attendance: Arc::new(AttendanceService::new(
                Arc::new(InMemoryAttendanceRepository::new()),
                member_repo,
            )),
            messaging: Arc::new(MessagingService::new(
                Arc::new(InMemorySmsRepository::new()),
                Arc::new(TracingSmsGateway),
            )),
            accounts: Arc::new(AccountService::new(Arc::new(InMemoryAccountRepository::new()))),
        }
    }
}

impl Default for SeatDesk {
    fn default() -> Self { Self::in_memory() }
}
