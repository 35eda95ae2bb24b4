//! The markup chain from direct cost to sale price.

use rust_decimal::Decimal;

use super::types::{MarkupBreakdown, MarkupPercentages};

/// Stateless markup calculator.
///
/// Pure and deterministic: identical inputs produce bit-identical
/// fixed-point output. Intermediate values are carried exact, without
/// rounding, so totals reproduce across thousands of lines.
pub struct MarkupCalculator;

impl MarkupCalculator {
    /// Applies the markup chain to a direct cost.
    ///
    /// Financial cost and profit are both computed against the
    /// overhead-inclusive subtotal, not chained on each other; tax is
    /// computed against their combined subtotal. The ordering is
    /// contractual.
    #[must_use]
    pub fn breakdown(direct_cost: Decimal, markups: &MarkupPercentages) -> MarkupBreakdown {
        let overhead_amount = markups.overhead.of(direct_cost);
        let subtotal_after_overhead = direct_cost + overhead_amount;

        let financial_amount = markups.financial.of(subtotal_after_overhead);
        let profit_amount = markups.profit.of(subtotal_after_overhead);
        let subtotal_before_tax = subtotal_after_overhead + financial_amount + profit_amount;

        let tax_amount = markups.tax.of(subtotal_before_tax);
        let total_sale = subtotal_before_tax + tax_amount;

        MarkupBreakdown {
            direct_cost,
            overhead_amount,
            subtotal_after_overhead,
            financial_amount,
            profit_amount,
            subtotal_before_tax,
            tax_amount,
            total_sale,
        }
    }

    /// Scales a per-unit breakdown to a line total.
    ///
    /// The final breakdown is multiplied field by field; percentages are
    /// never re-derived from scaled inputs, so the extended price is
    /// exactly `quantity` times the unit price.
    #[must_use]
    pub fn extend(unit: &MarkupBreakdown, quantity: Decimal) -> MarkupBreakdown {
        MarkupBreakdown {
            direct_cost: unit.direct_cost * quantity,
            overhead_amount: unit.overhead_amount * quantity,
            subtotal_after_overhead: unit.subtotal_after_overhead * quantity,
            financial_amount: unit.financial_amount * quantity,
            profit_amount: unit.profit_amount * quantity,
            subtotal_before_tax: unit.subtotal_before_tax * quantity,
            tax_amount: unit.tax_amount * quantity,
            total_sale: unit.total_sale * quantity,
        }
    }
}
