//! Value Objects module
//!
//! Immutable, validated domain primitives.

pub mod member_id;
pub mod actor;
pub mod payment;

pub use member_id::{MemberId, MemberIdError};
pub use actor::{Actor, Role, ActorError};
pub use payment::{Discount, DiscountType, Tax, PaymentMethod};

/// Declares a UUID-backed identifier newtype
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            pub fn from_uuid(id: uuid::Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Tenant identifier; always the id of the owning root admin
    TenantId
);
entity_id!(
    /// Login account identifier (admins and subadmins)
    UserId
);
entity_id!(
    /// Internal member key (the human-facing code is [`MemberId`])
    MemberKey
);
entity_id!(PlanId);
entity_id!(BillingId);
entity_id!(FloorId);
entity_id!(SeatId);
entity_id!(AttendanceId);
entity_id!(SmsTemplateId);
entity_id!(SmsRecordId);

impl From<UserId> for TenantId {
    fn from(root_admin: UserId) -> Self {
        Self(root_admin.0)
    }
}
