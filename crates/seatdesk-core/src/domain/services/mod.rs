//! Domain Services
//!
//! Stateless logic that does not belong to a single aggregate.

pub mod pricing;
pub mod tenancy;

pub use pricing::{PricingCalculator, PricingError, Quote};
pub use tenancy::TenantScope;
