//! Property-based tests for the markup calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::markup::calculator::MarkupCalculator;
use crate::markup::types::MarkupPercentages;

/// Strategy for non-negative direct costs with cent precision.
fn arb_direct_cost() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_00i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for percentages in [0, 100] with two decimals.
fn arb_pct() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_markups() -> impl Strategy<Value = MarkupPercentages> {
    (arb_pct(), arb_pct(), arb_pct(), arb_pct())
        .prop_map(|(o, f, p, t)| MarkupPercentages::new(o, f, p, t).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Each stage of the chain is monotonically non-decreasing for
    /// non-negative inputs.
    #[test]
    fn prop_breakdown_monotonic(
        direct_cost in arb_direct_cost(),
        markups in arb_markups()
    ) {
        let b = MarkupCalculator::breakdown(direct_cost, &markups);

        prop_assert!(b.subtotal_after_overhead >= b.direct_cost);
        prop_assert!(b.subtotal_before_tax >= b.subtotal_after_overhead);
        prop_assert!(b.total_sale >= b.subtotal_before_tax);
    }

    /// Recomputing on identical inputs yields bit-identical output.
    #[test]
    fn prop_breakdown_idempotent(
        direct_cost in arb_direct_cost(),
        markups in arb_markups()
    ) {
        let first = MarkupCalculator::breakdown(direct_cost, &markups);
        let second = MarkupCalculator::breakdown(direct_cost, &markups);
        prop_assert_eq!(first, second);
    }

    /// The breakdown is internally consistent: every derived field equals
    /// the sum of its parts.
    #[test]
    fn prop_breakdown_sums_consistent(
        direct_cost in arb_direct_cost(),
        markups in arb_markups()
    ) {
        let b = MarkupCalculator::breakdown(direct_cost, &markups);

        prop_assert_eq!(b.subtotal_after_overhead, b.direct_cost + b.overhead_amount);
        prop_assert_eq!(
            b.subtotal_before_tax,
            b.subtotal_after_overhead + b.financial_amount + b.profit_amount
        );
        prop_assert_eq!(b.total_sale, b.subtotal_before_tax + b.tax_amount);
    }

    /// Extending by quantity scales the total exactly.
    #[test]
    fn prop_extend_scales_exactly(
        direct_cost in arb_direct_cost(),
        markups in arb_markups(),
        quantity in 0i64..100_000i64
    ) {
        let quantity = Decimal::new(quantity, 2);
        let unit = MarkupCalculator::breakdown(direct_cost, &markups);
        let extended = MarkupCalculator::extend(&unit, quantity);

        prop_assert_eq!(extended.total_sale, unit.total_sale * quantity);
        prop_assert_eq!(extended.direct_cost, unit.direct_cost * quantity);
    }
}
