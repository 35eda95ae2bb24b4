//! Budget version lifecycle state machine.
//!
//! Transitions consume the freshly read current state and return an
//! audit action plus the outbox event to persist in the same
//! transaction. Persistence commits with a compare-and-swap on status;
//! a lost race maps onto `BudgetError::StatusConflict`.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;

use obralis_shared::types::{BudgetLineId, BudgetVersionId, UserId};

use crate::access::AccessAction;
use crate::apu::BudgetResource;
use crate::events::{EntityType, EventType, OutboxEvent};

use super::error::BudgetError;
use super::types::{
    BudgetLine, BudgetVersion, CopiedVersion, VersionAction, VersionStatus, VersionType,
};

/// Stateless service for budget version transitions.
pub struct VersionService;

impl VersionService {
    /// Locks a draft version as a baseline.
    ///
    /// # Errors
    ///
    /// * `BudgetError::InvalidTransition` if the version is not draft
    /// * `BudgetError::EmptyVersion` if the version has no lines
    pub fn baseline(
        version: &BudgetVersion,
        line_count: usize,
        now: DateTime<Utc>,
    ) -> Result<(VersionAction, OutboxEvent), BudgetError> {
        if version.status != VersionStatus::Draft {
            return Err(BudgetError::InvalidTransition {
                from: version.status,
                to: VersionStatus::Baseline,
            });
        }
        if line_count == 0 {
            return Err(BudgetError::EmptyVersion);
        }

        info!(version_id = %version.id, code = %version.version_code, "budget version baselined");

        let action = VersionAction::Baseline {
            new_status: VersionStatus::Baseline,
            baselined_at: now,
        };
        let event = OutboxEvent::new(
            EventType::VersionBaselined,
            EntityType::BudgetVersion,
            version.id.into_inner(),
            json!({
                "project_id": version.project_id,
                "version_code": version.version_code,
                "line_count": line_count,
            }),
            now,
        );
        Ok((action, event))
    }

    /// Approves a baselined version.
    ///
    /// The `authorize` closure is the host's access-control collaborator;
    /// it decides whether `approved_by` may perform the action.
    ///
    /// # Errors
    ///
    /// * `BudgetError::InvalidTransition` if the version is not baselined
    ///   (draft versions must be baselined first; approval never applies
    ///   twice)
    /// * `BudgetError::NotAuthorizedToApprove` if the check fails
    pub fn approve<F>(
        version: &BudgetVersion,
        approved_by: UserId,
        now: DateTime<Utc>,
        authorize: F,
    ) -> Result<(VersionAction, OutboxEvent), BudgetError>
    where
        F: FnOnce(UserId, AccessAction) -> bool,
    {
        if version.status != VersionStatus::Baseline {
            return Err(BudgetError::InvalidTransition {
                from: version.status,
                to: VersionStatus::Approved,
            });
        }
        if !authorize(approved_by, AccessAction::ApproveVersion) {
            return Err(BudgetError::NotAuthorizedToApprove {
                user_id: approved_by,
            });
        }

        info!(version_id = %version.id, approved_by = %approved_by, "budget version approved");

        let action = VersionAction::Approve {
            new_status: VersionStatus::Approved,
            approved_by,
            approved_at: now,
        };
        let event = OutboxEvent::new(
            EventType::VersionApproved,
            EntityType::BudgetVersion,
            version.id.into_inner(),
            json!({
                "project_id": version.project_id,
                "version_code": version.version_code,
                "approved_by": approved_by,
            }),
            now,
        );
        Ok((action, event))
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Draft → Baseline (lock)
    /// - Baseline → Approved (sign-off)
    ///
    /// There is no path back to Draft and no direct Draft → Approved.
    #[must_use]
    pub fn is_valid_transition(from: VersionStatus, to: VersionStatus) -> bool {
        matches!(
            (from, to),
            (VersionStatus::Draft, VersionStatus::Baseline)
                | (VersionStatus::Baseline, VersionStatus::Approved)
        )
    }

    /// Validates that lines and resources of a version may be modified.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::ImmutableVersion` once the version left draft.
    pub fn validate_can_modify(status: VersionStatus) -> Result<(), BudgetError> {
        if status.is_locked() {
            return Err(BudgetError::ImmutableVersion(status));
        }
        Ok(())
    }

    /// Compares the status an operation was computed against with the
    /// status found at commit time.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::StatusConflict` when they differ; the caller
    /// retries the whole operation from a fresh read.
    pub fn ensure_status_unchanged(
        expected: VersionStatus,
        found: VersionStatus,
    ) -> Result<(), BudgetError> {
        if expected != found {
            return Err(BudgetError::StatusConflict { expected, found });
        }
        Ok(())
    }

    /// Validates a new version code against the project's existing codes.
    ///
    /// # Errors
    ///
    /// * `BudgetError::VersionCodeRequired` if the code is blank
    /// * `BudgetError::DuplicateVersionCode` if it already exists
    pub fn validate_version_code(
        existing_codes: &[String],
        code: &str,
    ) -> Result<(), BudgetError> {
        if code.trim().is_empty() {
            return Err(BudgetError::VersionCodeRequired);
        }
        if existing_codes.iter().any(|c| c == code) {
            return Err(BudgetError::DuplicateVersionCode(code.to_string()));
        }
        Ok(())
    }

    /// Copies a version into a brand-new draft.
    ///
    /// Line and resource identities are freshly generated; attributes and
    /// `sort_order` are preserved; the source version is unaffected.
    #[must_use]
    pub fn copy(
        source: &BudgetVersion,
        lines: &[BudgetLine],
        resources: &[BudgetResource],
        new_code: String,
        version_type: VersionType,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> CopiedVersion {
        let new_version_id = BudgetVersionId::new();

        let mut copied_lines = Vec::with_capacity(lines.len());
        let mut copied_resources = Vec::with_capacity(resources.len());

        for line in lines {
            let new_line_id = BudgetLineId::new();
            copied_lines.push(BudgetLine {
                id: new_line_id,
                version_id: new_version_id,
                ..line.clone()
            });
            for resource in resources.iter().filter(|r| r.budget_line_id == line.id) {
                copied_resources.push(BudgetResource {
                    id: obralis_shared::types::BudgetResourceId::new(),
                    budget_line_id: new_line_id,
                    ..resource.clone()
                });
            }
        }

        let version = BudgetVersion {
            id: new_version_id,
            project_id: source.project_id,
            version_code: new_code,
            version_type,
            status: VersionStatus::Draft,
            markups: source.markups,
            created_by,
            created_at: now,
            approved_by: None,
            approved_at: None,
        };

        CopiedVersion {
            version,
            lines: copied_lines,
            resources: copied_resources,
        }
    }

    /// Repoints the project's baseline pointer.
    ///
    /// The pointer is a separate concern from the Baseline status: it may
    /// move among locked versions at will and the update is idempotent.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::BaselinePointerUnlocked` when the target is
    /// still draft.
    pub fn set_baseline_pointer(
        current: Option<BudgetVersionId>,
        target: &BudgetVersion,
    ) -> Result<BudgetVersionId, BudgetError> {
        if !target.status.is_locked() {
            return Err(BudgetError::BaselinePointerUnlocked(target.status));
        }
        if current != Some(target.id) {
            info!(version_id = %target.id, "project baseline pointer updated");
        }
        Ok(target.id)
    }
}
