//! Billing Aggregate
//!
//! A billing is written once per enrollment or renewal and never edited.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::events::{BillingEvent, DomainEvent};
use crate::domain::services::pricing::Quote;
use crate::domain::value_objects::{
    BillingId, Discount, MemberKey, PaymentMethod, PlanId, Tax, TenantId, UserId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    Paid,
    Partial,
    Pending,
    Overdue,
}

impl BillingStatus {
    /// Status implied by the outstanding due and the amount paid
    pub fn from_amounts(due: Decimal, paid: Decimal) -> Self {
        if due <= Decimal::ZERO {
            Self::Paid
        } else if paid > Decimal::ZERO {
            Self::Partial
        } else {
            Self::Pending
        }
    }
}

/// Everything about a billing except its priced figures
#[derive(Clone, Debug)]
pub struct BillingDraft {
    pub member: MemberKey,
    pub plan: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub paid: Decimal,
    pub discount: Discount,
    pub tax: Tax,
    pub bill_date: NaiveDate,
    pub remarks: Option<String>,
    pub created_by: UserId,
    pub root_admin: TenantId,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Billing {
    pub id: BillingId,
    pub member: MemberKey,
    pub plan: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub paid_amount: Decimal,
    pub discount: Discount,
    pub discount_amount: Decimal,
    pub tax_applicable: bool,
    pub tax_amount: Decimal,
    pub total_payable: Decimal,
    pub due_amount: Decimal,
    pub bill_date: NaiveDate,
    pub remarks: Option<String>,
    pub status: BillingStatus,
    pub created_by: UserId,
    pub root_admin: TenantId,
    pub created_at: DateTime<Utc>,
}

impl Billing {
    /// Stamp a draft with its quote; returns the billing and its creation event
    pub fn issue(draft: BillingDraft, quote: &Quote) -> (Self, DomainEvent) {
        let billing = Self {
            id: BillingId::new(),
            member: draft.member,
            plan: draft.plan,
            start_date: draft.start_date,
            end_date: draft.end_date,
            payment_method: draft.payment_method,
            paid_amount: draft.paid,
            discount: draft.discount,
            discount_amount: quote.discount,
            tax_applicable: draft.tax.applicable,
            tax_amount: quote.effective_tax,
            total_payable: quote.total_payable,
            due_amount: quote.due,
            bill_date: draft.bill_date,
            remarks: draft.remarks.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()),
            status: quote.status,
            created_by: draft.created_by,
            root_admin: draft.root_admin,
            created_at: Utc::now(),
        };

        let event = DomainEvent::Billing(BillingEvent::Issued {
            billing: billing.id,
            member: billing.member,
            total_payable: billing.total_payable,
            due: billing.due_amount,
            status: billing.status,
        });

        (billing, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_from_amounts() {
        assert_eq!(BillingStatus::from_amounts(dec!(0), dec!(1200)), BillingStatus::Paid);
        assert_eq!(BillingStatus::from_amounts(dec!(-10), dec!(1300)), BillingStatus::Paid);
        assert_eq!(BillingStatus::from_amounts(dec!(630), dec!(500)), BillingStatus::Partial);
        assert_eq!(BillingStatus::from_amounts(dec!(630), dec!(0)), BillingStatus::Pending);
    }
}
