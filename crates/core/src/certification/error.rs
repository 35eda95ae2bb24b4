//! Certification error types.

use rust_decimal::Decimal;
use thiserror::Error;

use obralis_shared::types::{BudgetLineId, UserId};
use obralis_shared::AppError;

use crate::access::AccessAction;
use crate::budget::VersionStatus;

use super::types::CertificationStatus;

/// Errors that can occur during certification operations.
#[derive(Debug, Error)]
pub enum CertificationError {
    /// Only locked budget versions may be billed against.
    #[error("Cannot certify against a {0} budget version")]
    BillingAgainstUnlockedVersion(VersionStatus),

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: CertificationStatus,
        /// The attempted target status.
        to: CertificationStatus,
    },

    /// Attempted to modify a non-draft certification.
    #[error("Certification is {0} and its lines are immutable")]
    ImmutableCertification(CertificationStatus),

    /// Cumulative progress would exceed 100% for a line.
    #[error(
        "Progress for line {budget_line_id} exceeds 100%: {prev_pct}% certified plus {period_pct}% requested"
    )]
    ProgressExceedsContract {
        /// The offending budget line.
        budget_line_id: BudgetLineId,
        /// Cumulative progress before this period.
        prev_pct: Decimal,
        /// The requested period progress.
        period_pct: Decimal,
    },

    /// Progress was supplied for a line outside the baseline version.
    #[error("Progress supplied for unknown budget line {0}")]
    UnknownLine(BudgetLineId),

    /// Two progress entries target the same line.
    #[error("Duplicate progress entry for budget line {0}")]
    DuplicateProgress(BudgetLineId),

    /// Month outside 1-12.
    #[error("Invalid period month {0}")]
    InvalidPeriodMonth(u32),

    /// User is not authorized for the certification action.
    #[error("User {user_id} is not authorized to {action}")]
    NotAuthorized {
        /// The user who attempted the action.
        user_id: UserId,
        /// The gated action.
        action: AccessAction,
    },

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// The certification number was taken by a concurrent request.
    #[error("Certification number {0} already exists for this project; retry from a fresh read")]
    NumberConflict(u32),

    /// An issued certification carries no seal.
    #[error("Certification is {0} but carries no integrity seal")]
    SealMissing(CertificationStatus),

    /// The stored seal does not match the recomputed one.
    #[error("Integrity seal mismatch: stored {stored}, recomputed {computed}")]
    SealMismatch {
        /// The seal stored at issue time.
        stored: String,
        /// The seal recomputed from current amounts.
        computed: String,
    },
}

impl CertificationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BillingAgainstUnlockedVersion(_)
            | Self::InvalidTransition { .. }
            | Self::ImmutableCertification(_) => 422,

            Self::NotAuthorized { .. } => 403,

            Self::NumberConflict(_) => 409,

            Self::ProgressExceedsContract { .. }
            | Self::UnknownLine(_)
            | Self::DuplicateProgress(_)
            | Self::InvalidPeriodMonth(_)
            | Self::RejectionReasonRequired => 400,

            Self::SealMissing(_) | Self::SealMismatch { .. } => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BillingAgainstUnlockedVersion(_) => "BILLING_AGAINST_UNLOCKED_VERSION",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ImmutableCertification(_) => "IMMUTABLE_CERTIFICATION",
            Self::ProgressExceedsContract { .. } => "PROGRESS_EXCEEDS_CONTRACT",
            Self::UnknownLine(_) => "UNKNOWN_LINE",
            Self::DuplicateProgress(_) => "DUPLICATE_PROGRESS",
            Self::InvalidPeriodMonth(_) => "INVALID_PERIOD_MONTH",
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::NumberConflict(_) => "NUMBER_CONFLICT",
            Self::SealMissing(_) => "SEAL_MISSING",
            Self::SealMismatch { .. } => "SEAL_MISMATCH",
        }
    }
}

impl From<CertificationError> for AppError {
    fn from(err: CertificationError) -> Self {
        match err {
            CertificationError::BillingAgainstUnlockedVersion(_)
            | CertificationError::InvalidTransition { .. } => {
                Self::StateTransition(err.to_string())
            }
            CertificationError::ImmutableCertification(_) => Self::Immutable(err.to_string()),
            CertificationError::NotAuthorized { .. } => Self::Forbidden(err.to_string()),
            CertificationError::NumberConflict(_) => Self::ConcurrencyConflict(err.to_string()),
            CertificationError::SealMissing(_) | CertificationError::SealMismatch { .. } => {
                Self::Integrity(err.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}
