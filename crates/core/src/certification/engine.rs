//! Certification billing computations and lifecycle transitions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use obralis_shared::types::{
    BudgetLineId, CertificationId, CertificationLineId, PageRequest, PageResponse, Percent,
    UserId,
};

use crate::access::AccessAction;
use crate::budget::{BudgetLine, BudgetVersion};
use crate::events::{EntityType, EventType, OutboxEvent};

use super::error::CertificationError;
use super::seal::compute_seal;
use super::types::{
    Certification, CertificationAction, CertificationLine, CertificationStatus,
    DraftCertification, LineProgress, Period, PriorProgress,
};

/// Stateless certification billing engine.
///
/// All computations are synchronous and single-pass; persistence wraps
/// them in a transaction serialized per project so numbering stays
/// gap-free and prior-progress reads never go stale.
pub struct CertificationEngine;

impl CertificationEngine {
    /// Computes each line's cumulative state as of the latest binding
    /// certification.
    ///
    /// Certifications are ordered by number; rejected ones are excluded
    /// as if they never existed, while issued-but-undecided ones bind
    /// just like approved ones. Lines never certified are absent from
    /// the map (zero state).
    #[must_use]
    pub fn prior_progress(
        history: &[(Certification, Vec<CertificationLine>)],
    ) -> HashMap<BudgetLineId, PriorProgress> {
        let mut ordered: Vec<&(Certification, Vec<CertificationLine>)> = history.iter().collect();
        ordered.sort_by_key(|(c, _)| c.number);

        let mut latest = HashMap::new();
        for (certification, lines) in ordered {
            if !certification.status.is_binding() {
                continue;
            }
            for line in lines {
                latest.insert(
                    line.budget_line_id,
                    PriorProgress {
                        progress_pct: line.total_progress_pct,
                        qty: line.total_qty,
                        amount: line.total_amount,
                    },
                );
            }
        }
        latest
    }

    /// Prepares a new draft certification for a period.
    ///
    /// One line is produced per baseline budget line, whether or not the
    /// caller supplied progress for it: omitted lines carry their
    /// cumulative state forward with a zero period. Quantities and
    /// amounts are derived with exact decimal arithmetic from the
    /// snapshot values, so the cumulative invariants hold bit-for-bit.
    ///
    /// The number is `max(existing) + 1`; the caller persists the result
    /// in the same transaction as the read, and maps a unique-constraint
    /// violation onto [`CertificationError::NumberConflict`].
    ///
    /// # Errors
    ///
    /// * `CertificationError::BillingAgainstUnlockedVersion` if the
    ///   version is still draft
    /// * `CertificationError::UnknownLine` / `DuplicateProgress` for bad
    ///   progress input
    /// * `CertificationError::ProgressExceedsContract` when a line would
    ///   exceed 100% cumulative progress
    pub fn prepare_draft(
        version: &BudgetVersion,
        baseline_lines: &[BudgetLine],
        period: Period,
        progress: &[LineProgress],
        prior: &HashMap<BudgetLineId, PriorProgress>,
        existing_numbers: &[u32],
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<DraftCertification, CertificationError> {
        if !version.status.is_locked() {
            return Err(CertificationError::BillingAgainstUnlockedVersion(
                version.status,
            ));
        }

        let mut progress_by_line: HashMap<BudgetLineId, Percent> = HashMap::new();
        for entry in progress {
            if !baseline_lines.iter().any(|l| l.id == entry.budget_line_id) {
                return Err(CertificationError::UnknownLine(entry.budget_line_id));
            }
            if progress_by_line
                .insert(entry.budget_line_id, entry.period_progress_pct)
                .is_some()
            {
                return Err(CertificationError::DuplicateProgress(entry.budget_line_id));
            }
        }

        let number = existing_numbers.iter().max().map_or(1, |n| n + 1);
        let certification_id = CertificationId::new();

        let mut ordered_lines: Vec<&BudgetLine> = baseline_lines.iter().collect();
        ordered_lines.sort_by(|a, b| (a.sort_order, a.id).cmp(&(b.sort_order, b.id)));

        let mut lines = Vec::with_capacity(ordered_lines.len());
        for budget_line in ordered_lines {
            let prev = prior.get(&budget_line.id).copied().unwrap_or_default();
            let period_pct = progress_by_line
                .get(&budget_line.id)
                .copied()
                .unwrap_or(Percent::ZERO);

            let total_pct = prev.progress_pct + period_pct.value();
            if total_pct > Decimal::ONE_HUNDRED {
                return Err(CertificationError::ProgressExceedsContract {
                    budget_line_id: budget_line.id,
                    prev_pct: prev.progress_pct,
                    period_pct: period_pct.value(),
                });
            }

            let period_qty = period_pct.of(budget_line.quantity);
            let total_qty = prev.qty + period_qty;
            let period_amount = period_qty * budget_line.unit_sale_price;

            lines.push(CertificationLine {
                id: CertificationLineId::new(),
                certification_id,
                budget_line_id: budget_line.id,
                contractual_qty: budget_line.quantity,
                unit_price: budget_line.unit_sale_price,
                prev_progress_pct: prev.progress_pct,
                period_progress_pct: period_pct.value(),
                total_progress_pct: total_pct,
                prev_qty: prev.qty,
                period_qty,
                total_qty,
                remaining_qty: budget_line.quantity - total_qty,
                prev_amount: prev.amount,
                period_amount,
                total_amount: prev.amount + period_amount,
            });
        }

        let certification = Certification {
            id: certification_id,
            project_id: version.project_id,
            budget_version_id: version.id,
            number,
            period,
            status: CertificationStatus::Draft,
            integrity_seal: None,
            issued_date: None,
            approved_by: None,
            rejection_reason: None,
            created_by,
            created_at: now,
        };

        Ok(DraftCertification {
            certification,
            lines,
        })
    }

    /// Issues a draft certification: freezes its lines, stamps the issue
    /// date, and computes the integrity seal.
    ///
    /// `chain_key` is the previous certification's seal, or the project
    /// salt when this is the first.
    ///
    /// # Errors
    ///
    /// Returns `CertificationError::InvalidTransition` if the
    /// certification is not draft.
    pub fn issue(
        certification: &Certification,
        lines: &[CertificationLine],
        chain_key: &str,
        now: DateTime<Utc>,
    ) -> Result<(CertificationAction, OutboxEvent), CertificationError> {
        if certification.status != CertificationStatus::Draft {
            return Err(CertificationError::InvalidTransition {
                from: certification.status,
                to: CertificationStatus::Issued,
            });
        }

        let integrity_seal = compute_seal(certification.number, lines, chain_key);

        info!(
            certification_id = %certification.id,
            number = certification.number,
            "certification issued"
        );

        let action = CertificationAction::Issue {
            new_status: CertificationStatus::Issued,
            issued_date: now,
            integrity_seal: integrity_seal.clone(),
        };
        let event = OutboxEvent::new(
            EventType::CertificationIssued,
            EntityType::Certification,
            certification.id.into_inner(),
            json!({
                "project_id": certification.project_id,
                "number": certification.number,
                "period": certification.period.to_string(),
                "integrity_seal": integrity_seal,
            }),
            now,
        );
        Ok((action, event))
    }

    /// Approves an issued certification (terminal).
    ///
    /// # Errors
    ///
    /// * `CertificationError::InvalidTransition` if not issued
    /// * `CertificationError::NotAuthorized` if the access check fails
    pub fn approve<F>(
        certification: &Certification,
        approved_by: UserId,
        now: DateTime<Utc>,
        authorize: F,
    ) -> Result<(CertificationAction, OutboxEvent), CertificationError>
    where
        F: FnOnce(UserId, AccessAction) -> bool,
    {
        if certification.status != CertificationStatus::Issued {
            return Err(CertificationError::InvalidTransition {
                from: certification.status,
                to: CertificationStatus::Approved,
            });
        }
        if !authorize(approved_by, AccessAction::ApproveCertification) {
            return Err(CertificationError::NotAuthorized {
                user_id: approved_by,
                action: AccessAction::ApproveCertification,
            });
        }

        info!(
            certification_id = %certification.id,
            number = certification.number,
            approved_by = %approved_by,
            "certification approved"
        );

        let action = CertificationAction::Approve {
            new_status: CertificationStatus::Approved,
            approved_by,
            approved_at: now,
        };
        let event = OutboxEvent::new(
            EventType::CertificationApproved,
            EntityType::Certification,
            certification.id.into_inner(),
            json!({
                "project_id": certification.project_id,
                "number": certification.number,
                "approved_by": approved_by,
            }),
            now,
        );
        Ok((action, event))
    }

    /// Rejects an issued certification (terminal).
    ///
    /// Rejected certifications are excluded from future cumulative
    /// progress as if they never existed; their number is not reused.
    ///
    /// # Errors
    ///
    /// * `CertificationError::InvalidTransition` if not issued
    /// * `CertificationError::RejectionReasonRequired` if the reason is
    ///   blank
    /// * `CertificationError::NotAuthorized` if the access check fails
    pub fn reject<F>(
        certification: &Certification,
        rejected_by: UserId,
        reason: String,
        now: DateTime<Utc>,
        authorize: F,
    ) -> Result<(CertificationAction, OutboxEvent), CertificationError>
    where
        F: FnOnce(UserId, AccessAction) -> bool,
    {
        if reason.trim().is_empty() {
            return Err(CertificationError::RejectionReasonRequired);
        }
        if certification.status != CertificationStatus::Issued {
            return Err(CertificationError::InvalidTransition {
                from: certification.status,
                to: CertificationStatus::Rejected,
            });
        }
        if !authorize(rejected_by, AccessAction::RejectCertification) {
            return Err(CertificationError::NotAuthorized {
                user_id: rejected_by,
                action: AccessAction::RejectCertification,
            });
        }

        info!(
            certification_id = %certification.id,
            number = certification.number,
            "certification rejected"
        );

        let action = CertificationAction::Reject {
            new_status: CertificationStatus::Rejected,
            rejected_by,
            reason: reason.clone(),
        };
        let event = OutboxEvent::new(
            EventType::CertificationRejected,
            EntityType::Certification,
            certification.id.into_inner(),
            json!({
                "project_id": certification.project_id,
                "number": certification.number,
                "rejected_by": rejected_by,
                "reason": reason,
            }),
            now,
        );
        Ok((action, event))
    }

    /// Validates that a certification's lines may be modified.
    ///
    /// # Errors
    ///
    /// Returns `CertificationError::ImmutableCertification` once issued.
    pub fn validate_can_modify(status: CertificationStatus) -> Result<(), CertificationError> {
        if !status.is_editable() {
            return Err(CertificationError::ImmutableCertification(status));
        }
        Ok(())
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Draft → Issued (freeze and seal)
    /// - Issued → Approved (sign-off)
    /// - Issued → Rejected (refusal)
    #[must_use]
    pub fn is_valid_transition(from: CertificationStatus, to: CertificationStatus) -> bool {
        matches!(
            (from, to),
            (CertificationStatus::Draft, CertificationStatus::Issued)
                | (
                    CertificationStatus::Issued,
                    CertificationStatus::Approved | CertificationStatus::Rejected
                )
        )
    }

    /// Checks a freshly assigned number against the numbers visible at
    /// commit time.
    ///
    /// # Errors
    ///
    /// Returns `CertificationError::NumberConflict` when the number is
    /// already taken; the caller retries from a fresh read.
    pub fn ensure_number_free(
        existing_numbers: &[u32],
        number: u32,
    ) -> Result<(), CertificationError> {
        if existing_numbers.contains(&number) {
            return Err(CertificationError::NumberConflict(number));
        }
        Ok(())
    }

    /// Lists a project's certifications ordered by number.
    #[must_use]
    pub fn list_certifications(
        certifications: &[Certification],
        page: &PageRequest,
    ) -> PageResponse<Certification> {
        let mut ordered: Vec<Certification> = certifications.to_vec();
        ordered.sort_by_key(|c| c.number);
        PageResponse::paginate(&ordered, page)
    }

    /// Finds one certification line by id.
    #[must_use]
    pub fn line_detail(
        lines: &[CertificationLine],
        id: CertificationLineId,
    ) -> Option<&CertificationLine> {
        lines.iter().find(|l| l.id == id)
    }
}
