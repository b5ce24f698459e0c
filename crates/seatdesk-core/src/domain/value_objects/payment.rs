//! Payment terms: discount, tax and payment method

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discount kind as sent by clients
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Flat,
}

/// Discount applied to a billing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    #[default]
    None,
    /// Percent of plan amount + enrollment fee
    Percentage(Decimal),
    /// Absolute amount
    Flat(Decimal),
}

impl Discount {
    /// Build from the loose `(type, value)` pair used on the wire
    pub fn from_parts(kind: Option<DiscountType>, value: Decimal) -> Self {
        match kind {
            Some(DiscountType::Percentage) => Self::Percentage(value),
            Some(DiscountType::Flat) => Self::Flat(value),
            None => Self::None,
        }
    }

    pub fn value(&self) -> Decimal {
        match self {
            Self::None => Decimal::ZERO,
            Self::Percentage(v) | Self::Flat(v) => *v,
        }
    }
}

/// Tax line of a billing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tax {
    pub applicable: bool,
    pub amount: Decimal,
}

impl Tax {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(amount: Decimal) -> Self {
        Self { applicable: true, amount }
    }

    /// Amount that actually gets charged
    pub fn effective(&self) -> Decimal {
        if self.applicable { self.amount } else { Decimal::ZERO }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Upi,
    Card,
    Bank,
}
