//! Plan Aggregate

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{PlanId, TenantId, UserId};

/// Sellable membership plan
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub plan_type: String,
    pub duration_months: u32,
    pub amount: Decimal,
    pub enrollment_fee: Decimal,
    pub enabled: bool,
    pub created_by: UserId,
    pub root_admin: TenantId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a plan
#[derive(Clone, Debug, Deserialize)]
pub struct NewPlan {
    pub name: String,
    pub plan_type: String,
    pub duration_months: u32,
    pub amount: Decimal,
    #[serde(default)]
    pub enrollment_fee: Decimal,
}

/// Partial plan update
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlanPatch {
    pub name: Option<String>,
    pub plan_type: Option<String>,
    pub duration_months: Option<u32>,
    pub amount: Option<Decimal>,
    pub enrollment_fee: Option<Decimal>,
}

impl Plan {
    pub fn create(new: NewPlan, tenant: TenantId, created_by: UserId) -> Result<Self, PlanError> {
        let name = new.name.trim().to_string();
        let plan_type = new.plan_type.trim().to_string();
        validate(&name, &plan_type, new.duration_months, new.amount, new.enrollment_fee)?;

        let now = Utc::now();
        Ok(Self {
            id: PlanId::new(),
            name,
            plan_type,
            duration_months: new.duration_months,
            amount: new.amount,
            enrollment_fee: new.enrollment_fee,
            enabled: true,
            created_by,
            root_admin: tenant,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a patch; the plan is left untouched when the result is invalid
    pub fn apply(&mut self, patch: PlanPatch) -> Result<(), PlanError> {
        let name = patch.name.map(|n| n.trim().to_string()).unwrap_or_else(|| self.name.clone());
        let plan_type = patch
            .plan_type
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| self.plan_type.clone());
        let duration = patch.duration_months.unwrap_or(self.duration_months);
        let amount = patch.amount.unwrap_or(self.amount);
        let fee = patch.enrollment_fee.unwrap_or(self.enrollment_fee);

        validate(&name, &plan_type, duration, amount, fee)?;

        self.name = name;
        self.plan_type = plan_type;
        self.duration_months = duration;
        self.amount = amount;
        self.enrollment_fee = fee;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.updated_at = Utc::now();
    }

    /// Last day covered when the plan starts on `start`
    ///
    /// Day-of-month clamps to the end of the target month (Jan 31 + 1 month
    /// is Feb 28/29).
    pub fn end_date_from(&self, start: NaiveDate) -> Result<NaiveDate, PlanError> {
        start
            .checked_add_months(Months::new(self.duration_months))
            .ok_or(PlanError::DateOutOfRange)
    }
}

fn validate(
    name: &str,
    plan_type: &str,
    duration: u32,
    amount: Decimal,
    fee: Decimal,
) -> Result<(), PlanError> {
    if name.is_empty() {
        return Err(PlanError::MissingName);
    }
    if plan_type.is_empty() {
        return Err(PlanError::MissingType);
    }
    if duration == 0 {
        return Err(PlanError::InvalidDuration);
    }
    if amount.is_sign_negative() || fee.is_sign_negative() {
        return Err(PlanError::NegativeAmount);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("plan name is required")]
    MissingName,
    #[error("plan type is required")]
    MissingType,
    #[error("plan duration must be at least one month")]
    InvalidDuration,
    #[error("plan amounts cannot be negative")]
    NegativeAmount,
    #[error("plan end date out of range")]
    DateOutOfRange,
    #[error("plan is disabled")]
    Disabled,
}
