//! Property-based tests for cumulative certification invariants.

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use obralis_shared::types::{
    BudgetLineId, BudgetVersionId, Percent, ProjectId, UserId, WbsNodeId,
};

use crate::budget::{BudgetLine, BudgetVersion, VersionStatus, VersionType};
use crate::certification::engine::CertificationEngine;
use crate::certification::error::CertificationError;
use crate::certification::types::{Certification, CertificationLine, LineProgress, Period};
use crate::markup::MarkupPercentages;

fn baseline_version() -> BudgetVersion {
    BudgetVersion {
        id: BudgetVersionId::new(),
        project_id: ProjectId::new(),
        version_code: "V1".to_string(),
        version_type: VersionType::Initial,
        status: VersionStatus::Baseline,
        markups: MarkupPercentages::zero(),
        created_by: UserId::new(),
        created_at: Utc::now(),
        approved_by: None,
        approved_at: None,
    }
}

fn budget_line(version: &BudgetVersion, quantity: Decimal, unit_price: Decimal) -> BudgetLine {
    BudgetLine {
        id: BudgetLineId::new(),
        version_id: version.id,
        wbs_node_id: WbsNodeId::new(),
        description: "line".to_string(),
        unit: "u".to_string(),
        quantity,
        unit_direct_cost: unit_price,
        unit_sale_price: unit_price,
        direct_cost_total: unit_price * quantity,
        sale_price_total: unit_price * quantity,
        markups: None,
        sort_order: 1,
    }
}

/// Per-period inputs: requested percent (two decimals) and whether the
/// certification gets rejected after issue.
fn arb_periods() -> impl Strategy<Value = Vec<(Decimal, bool)>> {
    prop::collection::vec(
        ((0i64..=4000i64).prop_map(|n| Decimal::new(n, 2)), any::<bool>()),
        1..6,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Across any sequence of certifications with some rejected, the
    /// cumulative invariants hold on every accepted document: totals are
    /// additive, bounded by the contractual quantity, and non-decreasing
    /// across binding certifications.
    #[test]
    fn prop_cumulative_invariants_hold(
        quantity in (1i64..=100_000i64).prop_map(|n| Decimal::new(n, 2)),
        unit_price in (1i64..=1_000_00i64).prop_map(|n| Decimal::new(n, 2)),
        periods in arb_periods()
    ) {
        let version = baseline_version();
        let line = budget_line(&version, quantity, unit_price);
        let lines = vec![line.clone()];
        let user = UserId::new();

        let mut history: Vec<(Certification, Vec<CertificationLine>)> = Vec::new();
        let mut last_binding_pct = Decimal::ZERO;
        let mut month = 0u32;

        for (pct, rejected) in periods {
            month += 1;
            let prior = CertificationEngine::prior_progress(&history);
            let numbers: Vec<u32> = history.iter().map(|(c, _)| c.number).collect();
            let result = CertificationEngine::prepare_draft(
                &version,
                &lines,
                Period::new(2026 + (month / 12) as i32, month % 12 + 1).unwrap(),
                &[LineProgress {
                    budget_line_id: line.id,
                    period_progress_pct: Percent::new(pct).unwrap(),
                }],
                &prior,
                &numbers,
                user,
                Utc::now(),
            );

            let expected_total = last_binding_pct + pct;
            if expected_total > Decimal::ONE_HUNDRED {
                prop_assert!(
                    matches!(
                        result,
                        Err(CertificationError::ProgressExceedsContract { .. })
                    ),
                    "expected ProgressExceedsContract error"
                );
                continue;
            }

            let mut draft = result.unwrap();
            let cert_line = draft.lines[0].clone();

            // Additive identities hold by construction
            prop_assert_eq!(
                cert_line.total_progress_pct,
                cert_line.prev_progress_pct + cert_line.period_progress_pct
            );
            prop_assert_eq!(cert_line.total_qty, cert_line.prev_qty + cert_line.period_qty);
            prop_assert_eq!(
                cert_line.total_amount,
                cert_line.prev_amount + cert_line.period_amount
            );

            // Bounds against the contractual snapshot
            prop_assert!(cert_line.total_qty <= cert_line.contractual_qty);
            prop_assert_eq!(
                cert_line.remaining_qty,
                cert_line.contractual_qty - cert_line.total_qty
            );
            prop_assert!(cert_line.remaining_qty >= Decimal::ZERO);
            prop_assert!(cert_line.total_progress_pct <= Decimal::ONE_HUNDRED);

            // Prev always equals the latest binding total
            prop_assert_eq!(cert_line.prev_progress_pct, last_binding_pct);

            // Issue, then maybe reject
            let (action, _) = CertificationEngine::issue(
                &draft.certification,
                &draft.lines,
                "salt",
                Utc::now(),
            )
            .unwrap();
            draft.certification.status = action.new_status();
            if let crate::certification::types::CertificationAction::Issue {
                integrity_seal, ..
            } = action
            {
                draft.certification.integrity_seal = Some(integrity_seal);
            }

            if rejected {
                let (action, _) = CertificationEngine::reject(
                    &draft.certification,
                    user,
                    "refused".to_string(),
                    Utc::now(),
                    |_, _| true,
                )
                .unwrap();
                draft.certification.status = action.new_status();
            } else {
                last_binding_pct = cert_line.total_progress_pct;
            }

            history.push((draft.certification, draft.lines));
        }

        // Total certified across binding certifications never exceeds the
        // contract, and progress is non-decreasing along the binding chain.
        let binding: Vec<&CertificationLine> = history
            .iter()
            .filter(|(c, _)| c.status.is_binding())
            .flat_map(|(_, ls)| ls)
            .collect();
        let period_qty_sum: Decimal = binding.iter().map(|l| l.period_qty).sum();
        prop_assert!(period_qty_sum <= quantity);

        let mut previous = Decimal::ZERO;
        for cert_line in binding {
            prop_assert!(cert_line.total_progress_pct >= previous);
            previous = cert_line.total_progress_pct;
        }
    }

    /// Certification numbers are strictly increasing and gap-free under
    /// sequential creation.
    #[test]
    fn prop_numbers_are_gap_free(count in 1usize..10) {
        let version = baseline_version();
        let line = budget_line(&version, Decimal::new(100, 0), Decimal::ONE);
        let lines = vec![line];
        let user = UserId::new();

        let mut numbers: Vec<u32> = Vec::new();
        for i in 0..count {
            let draft = CertificationEngine::prepare_draft(
                &version,
                &lines,
                Period::new(2026, (i % 12) as u32 + 1).unwrap(),
                &[],
                &HashMap::new(),
                &numbers,
                user,
                Utc::now(),
            )
            .unwrap();
            prop_assert!(CertificationEngine::ensure_number_free(
                &numbers,
                draft.certification.number
            )
            .is_ok());
            numbers.push(draft.certification.number);
        }

        let expected: Vec<u32> = (1..=count as u32).collect();
        prop_assert_eq!(numbers, expected);
    }
}
