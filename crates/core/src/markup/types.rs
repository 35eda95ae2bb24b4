//! Markup domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use obralis_shared::config::MarkupConfig;
use obralis_shared::types::{Percent, PercentOutOfRange};

/// The four percentage markups applied to a direct cost.
///
/// Stored as raw percentages; division by 100 happens at the point of
/// use, never ahead of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupPercentages {
    /// General overhead, applied to the direct cost.
    pub overhead: Percent,
    /// Financial cost, applied to the overhead-inclusive subtotal.
    pub financial: Percent,
    /// Industrial profit, applied to the overhead-inclusive subtotal.
    pub profit: Percent,
    /// Tax, applied to the pre-tax subtotal.
    pub tax: Percent,
}

impl MarkupPercentages {
    /// Creates a markup set, validating every percentage into [0, 100].
    ///
    /// # Errors
    ///
    /// Returns `PercentOutOfRange` for the first out-of-range value.
    pub fn new(
        overhead: Decimal,
        financial: Decimal,
        profit: Decimal,
        tax: Decimal,
    ) -> Result<Self, PercentOutOfRange> {
        Ok(Self {
            overhead: Percent::new(overhead)?,
            financial: Percent::new(financial)?,
            profit: Percent::new(profit)?,
            tax: Percent::new(tax)?,
        })
    }

    /// A markup set with every percentage at zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            overhead: Percent::ZERO,
            financial: Percent::ZERO,
            profit: Percent::ZERO,
            tax: Percent::ZERO,
        }
    }

    /// Builds the set from configured defaults.
    ///
    /// # Errors
    ///
    /// Returns `PercentOutOfRange` if the configuration carries an
    /// out-of-range percentage.
    pub fn from_config(config: &MarkupConfig) -> Result<Self, PercentOutOfRange> {
        Self::new(
            config.overhead_pct,
            config.financial_pct,
            config.profit_pct,
            config.tax_pct,
        )
    }
}

/// The ordered breakdown from direct cost to sale price.
///
/// Produced per unit and scaled to line totals by multiplying the final
/// breakdown, so unit price and extended price stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupBreakdown {
    /// The input direct cost.
    pub direct_cost: Decimal,
    /// `direct_cost * overhead%`.
    pub overhead_amount: Decimal,
    /// `direct_cost + overhead_amount`.
    pub subtotal_after_overhead: Decimal,
    /// `subtotal_after_overhead * financial%`.
    pub financial_amount: Decimal,
    /// `subtotal_after_overhead * profit%`.
    pub profit_amount: Decimal,
    /// `subtotal_after_overhead + financial_amount + profit_amount`.
    pub subtotal_before_tax: Decimal,
    /// `subtotal_before_tax * tax%`.
    pub tax_amount: Decimal,
    /// `subtotal_before_tax + tax_amount`.
    pub total_sale: Decimal,
}
