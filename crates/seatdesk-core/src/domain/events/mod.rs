//! Domain Events
//!
//! Events raised by aggregates to communicate state changes.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::aggregates::billing::BillingStatus;
use crate::domain::aggregates::member::MemberStatus;
use crate::domain::value_objects::{BillingId, MemberId, MemberKey, PlanId, SeatId, TenantId, UserId};

/// All domain events in the membership bounded context
#[derive(Clone, Debug)]
pub enum DomainEvent {
    Member(MemberEvent),
    Billing(BillingEvent),
    Seat(SeatEvent),
}

/// Member-related domain events
#[derive(Clone, Debug)]
pub enum MemberEvent {
    Registered {
        member: MemberKey,
        member_id: MemberId,
        tenant: TenantId,
        created_by: UserId,
    },

    Enrolled {
        member: MemberKey,
        plan: PlanId,
        start: NaiveDate,
        expiry: NaiveDate,
    },

    Frozen {
        member: MemberKey,
        start: NaiveDate,
        applied_by: UserId,
    },

    Unfrozen {
        member: MemberKey,
        frozen_days: u32,
        new_expiry: Option<NaiveDate>,
        unfrozen_by: UserId,
    },

    StatusChanged {
        member: MemberKey,
        from: MemberStatus,
        to: MemberStatus,
    },

    MembershipExpired {
        member: MemberKey,
        expired_on: NaiveDate,
    },
}

/// Billing-related domain events
#[derive(Clone, Debug)]
pub enum BillingEvent {
    Issued {
        billing: BillingId,
        member: MemberKey,
        total_payable: Decimal,
        due: Decimal,
        status: BillingStatus,
    },
}

/// Seat-related domain events
#[derive(Clone, Debug)]
pub enum SeatEvent {
    Assigned {
        seat: SeatId,
        member: MemberKey,
    },

    Released {
        seat: SeatId,
        member: MemberKey,
    },
}

impl DomainEvent {
    /// Id of the aggregate this event belongs to
    pub fn aggregate_id(&self) -> uuid::Uuid {
        match self {
            DomainEvent::Member(e) => match e {
                MemberEvent::Registered { member, .. }
                | MemberEvent::Enrolled { member, .. }
                | MemberEvent::Frozen { member, .. }
                | MemberEvent::Unfrozen { member, .. }
                | MemberEvent::StatusChanged { member, .. }
                | MemberEvent::MembershipExpired { member, .. } => *member.as_uuid(),
            },
            DomainEvent::Billing(BillingEvent::Issued { billing, .. }) => *billing.as_uuid(),
            DomainEvent::Seat(e) => match e {
                SeatEvent::Assigned { seat, .. } | SeatEvent::Released { seat, .. } => *seat.as_uuid(),
            },
        }
    }

    /// Event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::Member(e) => match e {
                MemberEvent::Registered { .. } => "member.registered",
                MemberEvent::Enrolled { .. } => "member.enrolled",
                MemberEvent::Frozen { .. } => "member.frozen",
                MemberEvent::Unfrozen { .. } => "member.unfrozen",
                MemberEvent::StatusChanged { .. } => "member.status_changed",
                MemberEvent::MembershipExpired { .. } => "member.membership_expired",
            },
            DomainEvent::Billing(BillingEvent::Issued { .. }) => "billing.issued",
            DomainEvent::Seat(e) => match e {
                SeatEvent::Assigned { .. } => "seat.assigned",
                SeatEvent::Released { .. } => "seat.released",
            },
        }
    }
}
