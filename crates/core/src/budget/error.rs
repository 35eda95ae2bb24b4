//! Budget error types.

use rust_decimal::Decimal;
use thiserror::Error;

use obralis_shared::types::UserId;
use obralis_shared::AppError;

use crate::apu::ApuError;
use crate::wbs::WbsError;

use super::types::VersionStatus;

/// Errors that can occur during budget operations.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: VersionStatus,
        /// The attempted target status.
        to: VersionStatus,
    },

    /// Baseline requires at least one budget line.
    #[error("Cannot baseline a version with no budget lines")]
    EmptyVersion,

    /// Attempted to modify lines of a locked version.
    #[error("Version is {0} and its lines are immutable")]
    ImmutableVersion(VersionStatus),

    /// User is not authorized to approve the version.
    #[error("User {user_id} is not authorized to approve this version")]
    NotAuthorizedToApprove {
        /// The user who attempted the approval.
        user_id: UserId,
    },

    /// The baseline pointer may only reference locked versions.
    #[error("Cannot point the project baseline at a {0} version")]
    BaselinePointerUnlocked(VersionStatus),

    /// The version status changed under the caller; retry from a fresh read.
    #[error("Version status changed concurrently: expected {expected}, found {found}")]
    StatusConflict {
        /// The status the operation was computed against.
        expected: VersionStatus,
        /// The status found at commit time.
        found: VersionStatus,
    },

    /// Version code already exists for this project.
    #[error("Version code {0} already exists for this project")]
    DuplicateVersionCode(String),

    /// Version code is required but empty.
    #[error("Version code is required")]
    VersionCodeRequired,

    /// Line quantity cannot be negative.
    #[error("Line quantity {0} is negative")]
    NegativeQuantity(Decimal),

    /// Direct cost cannot be negative.
    #[error("Direct cost {0} is negative")]
    NegativeDirectCost(Decimal),

    /// Sale price cannot be negative.
    #[error("Sale price {0} is negative")]
    NegativeSalePrice(Decimal),

    /// WBS validation failed.
    #[error(transparent)]
    Wbs(#[from] WbsError),

    /// APU validation failed.
    #[error(transparent)]
    Apu(#[from] ApuError),
}

impl BudgetError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. }
            | Self::EmptyVersion
            | Self::ImmutableVersion(_)
            | Self::BaselinePointerUnlocked(_) => 422,

            Self::NotAuthorizedToApprove { .. } => 403,

            Self::StatusConflict { .. } | Self::DuplicateVersionCode(_) => 409,

            Self::VersionCodeRequired
            | Self::NegativeQuantity(_)
            | Self::NegativeDirectCost(_)
            | Self::NegativeSalePrice(_)
            | Self::Wbs(_)
            | Self::Apu(_) => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::EmptyVersion => "EMPTY_VERSION",
            Self::ImmutableVersion(_) => "IMMUTABLE_VERSION",
            Self::NotAuthorizedToApprove { .. } => "NOT_AUTHORIZED_TO_APPROVE",
            Self::BaselinePointerUnlocked(_) => "BASELINE_POINTER_UNLOCKED",
            Self::StatusConflict { .. } => "STATUS_CONFLICT",
            Self::DuplicateVersionCode(_) => "DUPLICATE_VERSION_CODE",
            Self::VersionCodeRequired => "VERSION_CODE_REQUIRED",
            Self::NegativeQuantity(_) => "NEGATIVE_QUANTITY",
            Self::NegativeDirectCost(_) => "NEGATIVE_DIRECT_COST",
            Self::NegativeSalePrice(_) => "NEGATIVE_SALE_PRICE",
            Self::Wbs(_) => "WBS_VALIDATION",
            Self::Apu(_) => "APU_VALIDATION",
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::InvalidTransition { .. } | BudgetError::EmptyVersion => {
                Self::StateTransition(err.to_string())
            }
            BudgetError::ImmutableVersion(_) => Self::Immutable(err.to_string()),
            BudgetError::NotAuthorizedToApprove { .. } => Self::Forbidden(err.to_string()),
            BudgetError::StatusConflict { .. } | BudgetError::DuplicateVersionCode(_) => {
                Self::ConcurrencyConflict(err.to_string())
            }
            BudgetError::Wbs(inner) => inner.into(),
            BudgetError::Apu(inner) => inner.into(),
            _ => Self::Validation(err.to_string()),
        }
    }
}
