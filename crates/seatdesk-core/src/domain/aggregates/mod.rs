//! Aggregates module
//!
//! Aggregate roots and tenant-scoped records.

pub mod member;
pub mod plan;
pub mod billing;
pub mod seat;
pub mod floor;
pub mod attendance;
pub mod sms;
pub mod account;

pub use member::{
    FreezeEpisode, FreezeHistory, Gender, Member, MemberError, MemberProfile, MemberProfilePatch,
    MemberStatus, MembershipStatus, PaymentSnapshot, UnfreezeOutcome,
};
pub use plan::{NewPlan, Plan, PlanError, PlanPatch};
pub use billing::{Billing, BillingDraft, BillingStatus};
pub use seat::{Seat, SeatError, SeatStatus, SeatType};
pub use floor::{Floor, FloorError, FloorPatch};
pub use attendance::Attendance;
pub use sms::{SmsRecord, SmsTemplate};
pub use account::UserAccount;
