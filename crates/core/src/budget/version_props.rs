//! Property-based tests for the version lifecycle.

use chrono::Utc;
use proptest::prelude::*;

use obralis_shared::types::{BudgetVersionId, ProjectId, UserId};

use crate::budget::error::BudgetError;
use crate::budget::types::{BudgetVersion, VersionStatus, VersionType};
use crate::budget::version::VersionService;
use crate::markup::MarkupPercentages;

fn arb_status() -> impl Strategy<Value = VersionStatus> {
    prop_oneof![
        Just(VersionStatus::Draft),
        Just(VersionStatus::Baseline),
        Just(VersionStatus::Approved),
    ]
}

fn version_with(status: VersionStatus) -> BudgetVersion {
    BudgetVersion {
        id: BudgetVersionId::new(),
        project_id: ProjectId::new(),
        version_code: "V1".to_string(),
        version_type: VersionType::Initial,
        status,
        markups: MarkupPercentages::zero(),
        created_by: UserId::new(),
        created_at: Utc::now(),
        approved_by: None,
        approved_at: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// No transition ever targets Draft: once locked, always locked.
    #[test]
    fn prop_no_path_back_to_draft(from in arb_status()) {
        prop_assert!(!VersionService::is_valid_transition(from, VersionStatus::Draft));
    }

    /// Statuses are monotonic: a valid transition always moves forward.
    #[test]
    fn prop_transitions_move_forward(from in arb_status(), to in arb_status()) {
        if VersionService::is_valid_transition(from, to) {
            let rank = |s: VersionStatus| match s {
                VersionStatus::Draft => 0,
                VersionStatus::Baseline => 1,
                VersionStatus::Approved => 2,
            };
            prop_assert!(rank(to) == rank(from) + 1);
        }
    }

    /// Locked versions always refuse line modification.
    #[test]
    fn prop_locked_versions_are_immutable(status in arb_status()) {
        let result = VersionService::validate_can_modify(status);
        if status.is_locked() {
            prop_assert!(matches!(result, Err(BudgetError::ImmutableVersion(_))));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// Baseline succeeds from Draft with lines, and only from Draft.
    #[test]
    fn prop_baseline_only_from_draft(
        status in arb_status(),
        line_count in 1usize..100
    ) {
        let version = version_with(status);
        let result = VersionService::baseline(&version, line_count, Utc::now());
        prop_assert_eq!(result.is_ok(), status == VersionStatus::Draft);
    }

    /// Approval succeeds only from Baseline, and only when authorized.
    #[test]
    fn prop_approve_requires_baseline_and_authorization(
        status in arb_status(),
        authorized in any::<bool>()
    ) {
        let version = version_with(status);
        let result =
            VersionService::approve(&version, UserId::new(), Utc::now(), |_, _| authorized);
        prop_assert_eq!(
            result.is_ok(),
            status == VersionStatus::Baseline && authorized
        );
    }
}
