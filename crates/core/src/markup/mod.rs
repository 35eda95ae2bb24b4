//! Direct-cost to sale-price markup chain.
//!
//! Overhead applies to the direct cost; financial cost and profit both
//! apply to the overhead-inclusive subtotal; tax applies to the combined
//! pre-tax subtotal. The order is contractual and never changes.

pub mod calculator;
pub mod types;

#[cfg(test)]
mod calculator_props;

pub use calculator::MarkupCalculator;
pub use types::{MarkupBreakdown, MarkupPercentages};
