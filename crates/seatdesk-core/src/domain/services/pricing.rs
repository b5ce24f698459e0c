//! Pricing Calculator
//!
//! Single pricing path for enrollment, renewal and inline new-member billing.
//!
//! ```text
//! base     = amount + enrollment_fee
//! discount = base * pct / 100 | flat        (clamped to base)
//! total    = base - discount + effective_tax
//! due      = total - paid
//! ```

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::aggregates::{BillingStatus, Plan};
use crate::domain::value_objects::{Discount, Tax};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Priced figures of one billing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub base: Decimal,
    pub discount: Decimal,
    pub effective_tax: Decimal,
    pub total_payable: Decimal,
    pub due: Decimal,
    pub status: BillingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("{0} cannot be negative")]
    Negative(&'static str),
    #[error("percentage discount must be at most 100, got {0}")]
    PercentageTooLarge(Decimal),
}

/// Stateless calculator
pub struct PricingCalculator;

impl PricingCalculator {
    pub fn price(plan: &Plan, discount: &Discount, tax: &Tax, paid: Decimal) -> Result<Quote, PricingError> {
        Self::price_amounts(plan.amount, plan.enrollment_fee, discount, tax, paid)
    }

    pub fn price_amounts(
        amount: Decimal,
        enrollment_fee: Decimal,
        discount: &Discount,
        tax: &Tax,
        paid: Decimal,
    ) -> Result<Quote, PricingError> {
        non_negative(amount, "plan amount")?;
        non_negative(enrollment_fee, "enrollment fee")?;
        non_negative(discount.value(), "discount")?;
        non_negative(tax.amount, "tax amount")?;
        non_negative(paid, "paid amount")?;

        let base = amount + enrollment_fee;
        let discount_amount = match discount {
            Discount::None => Decimal::ZERO,
            Discount::Percentage(pct) => {
                if *pct > HUNDRED {
                    return Err(PricingError::PercentageTooLarge(*pct));
                }
                base * *pct / HUNDRED
            }
            Discount::Flat(value) => *value,
        }
        .min(base);

        let effective_tax = tax.effective();
        let total_payable = base - discount_amount + effective_tax;
        let due = total_payable - paid;

        Ok(Quote {
            base,
            discount: discount_amount,
            effective_tax,
            total_payable,
            due,
            status: BillingStatus::from_amounts(due, paid),
        })
    }
}

fn non_negative(value: Decimal, what: &'static str) -> Result<(), PricingError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PricingError::Negative(what));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(discount: Discount, tax: Tax, paid: Decimal) -> Quote {
        PricingCalculator::price_amounts(dec!(1000), dec!(200), &discount, &tax, paid).unwrap()
    }

    #[test]
    fn test_percentage_discount_with_tax_partial() {
        let q = quote(Discount::Percentage(dec!(10)), Tax::of(dec!(50)), dec!(500));
        assert_eq!(q.discount, dec!(120));
        assert_eq!(q.total_payable, dec!(1130));
        assert_eq!(q.due, dec!(630));
        assert_eq!(q.status, BillingStatus::Partial);
    }

    #[test]
    fn test_fully_paid() {
        let q = quote(Discount::None, Tax::none(), dec!(1200));
        assert_eq!(q.total_payable, dec!(1200));
        assert_eq!(q.due, dec!(0));
        assert_eq!(q.status, BillingStatus::Paid);
    }

    #[test]
    fn test_unpaid_is_pending() {
        let q = quote(Discount::Flat(dec!(200)), Tax::none(), dec!(0));
        assert_eq!(q.total_payable, dec!(1000));
        assert_eq!(q.status, BillingStatus::Pending);
    }

    #[test]
    fn test_tax_not_applicable_is_ignored() {
        let tax = Tax { applicable: false, amount: dec!(99) };
        let q = quote(Discount::None, tax, dec!(0));
        assert_eq!(q.effective_tax, dec!(0));
        assert_eq!(q.total_payable, dec!(1200));
    }

    #[test]
    fn test_flat_discount_clamped_to_base() {
        let q = quote(Discount::Flat(dec!(5000)), Tax::of(dec!(50)), dec!(0));
        assert_eq!(q.discount, dec!(1200));
        assert_eq!(q.total_payable, dec!(50));
    }

    #[test]
    fn test_overpayment_is_paid_with_negative_due() {
        let q = quote(Discount::None, Tax::none(), dec!(1300));
        assert_eq!(q.due, dec!(-100));
        assert_eq!(q.status, BillingStatus::Paid);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let err = PricingCalculator::price_amounts(
            dec!(1000),
            dec!(0),
            &Discount::Percentage(dec!(101)),
            &Tax::none(),
            dec!(0),
        )
        .unwrap_err();
        assert_eq!(err, PricingError::PercentageTooLarge(dec!(101)));

        let err = PricingCalculator::price_amounts(dec!(1000), dec!(0), &Discount::None, &Tax::none(), dec!(-1))
            .unwrap_err();
        assert_eq!(err, PricingError::Negative("paid amount"));
    }
}
