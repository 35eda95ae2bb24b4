//! Certification domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use obralis_shared::types::{
    BudgetLineId, BudgetVersionId, CertificationId, CertificationLineId, Percent, ProjectId,
    UserId,
};

use super::error::CertificationError;

/// A billing period identified by calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl Period {
    /// Creates a period, validating the month.
    ///
    /// # Errors
    ///
    /// Returns `CertificationError::InvalidPeriodMonth` for months
    /// outside 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self, CertificationError> {
        if !(1..=12).contains(&month) {
            return Err(CertificationError::InvalidPeriodMonth(month));
        }
        Ok(Self { year, month })
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Lifecycle status of a certification.
///
/// The valid transitions are:
/// - Draft → Issued (freeze and seal)
/// - Issued → Approved (sign-off)
/// - Issued → Rejected (refusal)
///
/// Approved and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificationStatus {
    /// Editable working document.
    Draft,
    /// Frozen and sealed; binding for subsequent periods.
    Issued,
    /// Signed off (terminal).
    Approved,
    /// Refused (terminal); excluded from cumulative progress.
    Rejected,
}

impl CertificationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Issued => "issued",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "issued" => Some(Self::Issued),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true while line amounts may still be edited.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true for terminal statuses.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Returns true when the certification counts toward cumulative
    /// progress: issued documents bind before formal approval.
    #[must_use]
    pub const fn is_binding(self) -> bool {
        matches!(self, Self::Issued | Self::Approved)
    }
}

impl std::fmt::Display for CertificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A periodic progress-billing document for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    /// Unique identifier.
    pub id: CertificationId,
    /// Project being billed.
    pub project_id: ProjectId,
    /// The locked budget version used as the billing baseline.
    pub budget_version_id: BudgetVersionId,
    /// Sequential number per project, gap-free.
    pub number: u32,
    /// The billed period.
    pub period: Period,
    /// Lifecycle status.
    pub status: CertificationStatus,
    /// Tamper-evident hash, set only at issue.
    pub integrity_seal: Option<String>,
    /// When the certification was issued.
    pub issued_date: Option<DateTime<Utc>>,
    /// User who approved the certification.
    pub approved_by: Option<UserId>,
    /// Reason given on rejection.
    pub rejection_reason: Option<String>,
    /// User who created the certification.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Per-line billing amounts for one certification period.
///
/// The contractual quantity and unit price are snapshots copied from the
/// baseline line at creation time, never recomputed later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationLine {
    /// Unique identifier.
    pub id: CertificationLineId,
    /// Owning certification.
    pub certification_id: CertificationId,
    /// The billed budget line.
    pub budget_line_id: BudgetLineId,
    /// Contractual quantity snapshot from the baseline line.
    pub contractual_qty: Decimal,
    /// Sale unit price snapshot from the baseline line.
    pub unit_price: Decimal,
    /// Cumulative progress before this period, percent.
    pub prev_progress_pct: Decimal,
    /// Progress billed this period, percent.
    pub period_progress_pct: Decimal,
    /// `prev_progress_pct + period_progress_pct`.
    pub total_progress_pct: Decimal,
    /// Quantity certified before this period.
    pub prev_qty: Decimal,
    /// Quantity certified this period.
    pub period_qty: Decimal,
    /// `prev_qty + period_qty`.
    pub total_qty: Decimal,
    /// `contractual_qty - total_qty`.
    pub remaining_qty: Decimal,
    /// Amount billed before this period.
    pub prev_amount: Decimal,
    /// Amount billed this period.
    pub period_amount: Decimal,
    /// `prev_amount + period_amount`.
    pub total_amount: Decimal,
}

/// Caller-supplied progress for one line in a new certification.
#[derive(Debug, Clone)]
pub struct LineProgress {
    /// The budget line being billed.
    pub budget_line_id: BudgetLineId,
    /// Progress to bill this period.
    pub period_progress_pct: Percent,
}

/// Cumulative state of a line as of the latest binding certification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorProgress {
    /// Cumulative progress percent.
    pub progress_pct: Decimal,
    /// Cumulative certified quantity.
    pub qty: Decimal,
    /// Cumulative billed amount.
    pub amount: Decimal,
}

/// A prepared draft certification ready for persistence.
#[derive(Debug, Clone)]
pub struct DraftCertification {
    /// The certification entity.
    pub certification: Certification,
    /// One line per baseline budget line.
    pub lines: Vec<CertificationLine>,
}

impl DraftCertification {
    /// Total amount billed in this period across all lines.
    #[must_use]
    pub fn period_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.period_amount).sum()
    }

    /// Cumulative amount billed through this period across all lines.
    #[must_use]
    pub fn cumulative_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.total_amount).sum()
    }
}

/// A certification state transition with audit data.
#[derive(Debug, Clone)]
pub enum CertificationAction {
    /// Freeze a draft and seal its amounts.
    Issue {
        /// The new status (Issued).
        new_status: CertificationStatus,
        /// When the certification was issued.
        issued_date: DateTime<Utc>,
        /// The computed integrity seal.
        integrity_seal: String,
    },
    /// Approve an issued certification.
    Approve {
        /// The new status (Approved).
        new_status: CertificationStatus,
        /// The user who approved.
        approved_by: UserId,
        /// When the certification was approved.
        approved_at: DateTime<Utc>,
    },
    /// Reject an issued certification.
    Reject {
        /// The new status (Rejected).
        new_status: CertificationStatus,
        /// The user who rejected.
        rejected_by: UserId,
        /// The reason for rejection.
        reason: String,
    },
}

impl CertificationAction {
    /// Returns the status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> CertificationStatus {
        match self {
            Self::Issue { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. } => *new_status,
        }
    }
}
