//! Data Transfer Objects
//!
//! Commands going into the application services and the views coming out.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{
    Billing, Floor, Member, MemberProfile, MemberStatus, MembershipStatus, Seat, SeatType,
};
use crate::domain::services::Quote;
use crate::domain::value_objects::{
    Discount, DiscountType, FloorId, MemberKey, PaymentMethod, PlanId, Tax,
};
use crate::ports::outbound::MemberFilter;

// ============================================================================
// Billing / enrollment
// ============================================================================

/// Payment terms sent along with an enrollment
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInput {
    pub payment_method: PaymentMethod,
    pub paid_amount: Decimal,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Decimal,
    pub tax_applicable: bool,
    pub tax_amount: Decimal,
    /// Defaults to today
    pub bill_date: Option<NaiveDate>,
    pub billing_remarks: Option<String>,
}

impl PaymentInput {
    pub fn discount(&self) -> Discount {
        Discount::from_parts(self.discount_type, self.discount_value)
    }

    pub fn tax(&self) -> Tax {
        Tax { applicable: self.tax_applicable, amount: self.tax_amount }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EnrollCommand {
    pub member: MemberKey,
    pub plan: PlanId,
    pub start_date: NaiveDate,
    #[serde(flatten)]
    pub payment: PaymentInput,
}

/// Billing written by an enrollment together with the updated member
#[derive(Clone, Debug, Serialize)]
pub struct Enrollment {
    pub billing: Billing,
    pub member: Member,
}

// ============================================================================
// Members
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
pub struct AddMemberCommand {
    /// Explicit `MEM-####` code; allocated when absent
    pub member_id: Option<String>,
    #[serde(flatten)]
    pub profile: MemberProfile,
    pub plan: Option<PlanId>,
    pub start_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub payment: PaymentInput,
    /// Due amount the client displayed; must match the computed one
    pub quoted_due: Option<Decimal>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MemberAdded {
    pub member: Member,
    pub billing: Option<Billing>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FreezeCommand {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

impl FreezeCommand {
    pub fn starting(start_date: NaiveDate) -> Self {
        Self { start_date, reason: None }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct UnfreezeResult {
    pub message: String,
    pub member: Member,
    pub frozen_days: u32,
    pub extension_applied: bool,
    pub new_expiry: Option<NaiveDate>,
}

/// Member listing buckets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MemberCategory {
    #[default]
    Total,
    Active,
    Blocked,
    Left,
    Freeze,
    Expired,
    /// Active memberships expiring between `min` and `max` days from today
    Expiring { min_days: u64, max_days: u64 },
}

impl MemberCategory {
    pub fn to_filter(self, today: NaiveDate) -> MemberFilter {
        match self {
            Self::Total => MemberFilter::default(),
            Self::Active => MemberFilter { status: Some(MemberStatus::Active), ..Default::default() },
            Self::Blocked => MemberFilter { status: Some(MemberStatus::Blocked), ..Default::default() },
            Self::Left => MemberFilter { status: Some(MemberStatus::Left), ..Default::default() },
            Self::Freeze => MemberFilter { status: Some(MemberStatus::Freeze), ..Default::default() },
            Self::Expired => MemberFilter {
                membership_status: Some(MembershipStatus::Expired),
                ..Default::default()
            },
            Self::Expiring { min_days, max_days } => {
                let window = today
                    .checked_add_days(Days::new(min_days))
                    .zip(today.checked_add_days(Days::new(max_days)));
                MemberFilter {
                    membership_status: Some(MembershipStatus::Active),
                    // An unrepresentable window matches nothing
                    expiring_between: Some(window.unwrap_or((NaiveDate::MAX, NaiveDate::MIN))),
                    ..Default::default()
                }
            }
        }
    }
}

impl std::str::FromStr for MemberCategory {
    type Err = String;

    /// Unknown or empty names fall back to `total`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "active" | "live" => Self::Active,
            "blocked" => Self::Blocked,
            "left" => Self::Left,
            "freeze" => Self::Freeze,
            "expired" => Self::Expired,
            "expiring1-3" => Self::Expiring { min_days: 1, max_days: 3 },
            "expiring4-7" => Self::Expiring { min_days: 4, max_days: 7 },
            "expiring8-15" => Self::Expiring { min_days: 8, max_days: 15 },
            _ => Self::Total,
        })
    }
}

// ============================================================================
// Floors / seats
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
pub struct CreateFloorCommand {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct FloorWithSeats {
    #[serde(flatten)]
    pub floor: Floor,
    pub seat_count: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BulkSeatsCommand {
    pub floor: FloorId,
    #[serde(rename = "type")]
    pub seat_type: SeatType,
    pub count: u32,
    #[serde(default = "default_start_number")]
    pub start_number: u32,
    #[serde(default)]
    pub prefix: String,
}

fn default_start_number() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize)]
pub struct BulkSeatsReport {
    pub created: Vec<Seat>,
    /// Numbers that already existed on the floor
    pub skipped: Vec<String>,
}

// ============================================================================
// Attendance / messaging / accounts
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
pub struct MarkAttendanceCommand {
    pub member: MemberKey,
    pub date: NaiveDate,
    #[serde(default = "default_present")]
    pub present: bool,
}

fn default_present() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateTemplateCommand {
    pub name: String,
    pub content: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SendSmsCommand {
    pub recipients: Vec<String>,
    pub content: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RegisterSubadminCommand {
    pub username: String,
}

/// Quote echoed back to clients that want to preview a billing
#[derive(Clone, Debug, Serialize)]
pub struct QuoteView {
    pub plan: PlanId,
    #[serde(flatten)]
    pub quote: Quote,
}
