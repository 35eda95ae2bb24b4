//! Budget domain types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use obralis_shared::types::{
    BudgetLineId, BudgetVersionId, Percent, ProjectId, UserId, WbsNodeId,
};

use crate::apu::{ApuBreakdown, BudgetResource, ResourceInput};
use crate::markup::{MarkupBreakdown, MarkupPercentages};

/// Classification of a budget version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    /// The first budget of a project.
    Initial,
    /// A revision of an earlier budget.
    Revision,
    /// A client-driven change order.
    ChangeOrder,
}

impl VersionType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Revision => "revision",
            Self::ChangeOrder => "change_order",
        }
    }

    /// Parses a version type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "initial" => Some(Self::Initial),
            "revision" => Some(Self::Revision),
            "change_order" => Some(Self::ChangeOrder),
            _ => None,
        }
    }
}

/// Lifecycle status of a budget version.
///
/// The valid transitions are:
/// - Draft → Baseline (lock)
/// - Baseline → Approved (sign-off)
///
/// Once a version leaves Draft it never returns; approved versions are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    /// Editable working copy.
    Draft,
    /// Locked snapshot usable for comparisons and billing.
    Baseline,
    /// Signed-off version, eligible as a certification baseline.
    Approved,
}

impl VersionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Baseline => "baseline",
            Self::Approved => "approved",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "baseline" => Some(Self::Baseline),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Returns true if lines and resources may still be modified.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true once the version is locked against line edits.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Baseline | Self::Approved)
    }
}

impl std::fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named budget snapshot of one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVersion {
    /// Unique identifier.
    pub id: BudgetVersionId,
    /// Project this version belongs to.
    pub project_id: ProjectId,
    /// Version code, unique per project (e.g. "V1", "REV-2026-03").
    pub version_code: String,
    /// Version classification.
    pub version_type: VersionType,
    /// Lifecycle status.
    pub status: VersionStatus,
    /// Markup percentages used when a line does not override them.
    pub markups: MarkupPercentages,
    /// User who created the version.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// User who approved the version, set only on approval.
    pub approved_by: Option<UserId>,
    /// Approval timestamp, set only on approval.
    pub approved_at: Option<DateTime<Utc>>,
}

/// A costed, WBS-linked line belonging to one budget version.
///
/// Created while the version is draft; frozen once the version is
/// locked. Stored totals are authoritative: reads never re-derive
/// markups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLine {
    /// Unique identifier.
    pub id: BudgetLineId,
    /// Owning budget version.
    pub version_id: BudgetVersionId,
    /// The budget-item leaf this line costs.
    pub wbs_node_id: WbsNodeId,
    /// Display description.
    pub description: String,
    /// Measurement unit.
    pub unit: String,
    /// Contracted quantity.
    pub quantity: Decimal,
    /// Direct cost per unit (APU result or imported).
    pub unit_direct_cost: Decimal,
    /// Sale price per unit (markup output or imported).
    pub unit_sale_price: Decimal,
    /// `unit_direct_cost * quantity`.
    pub direct_cost_total: Decimal,
    /// `unit_sale_price * quantity`.
    pub sale_price_total: Decimal,
    /// Per-line markup override; None inherits the version's.
    pub markups: Option<MarkupPercentages>,
    /// Display ordering within the version.
    pub sort_order: i32,
}

impl BudgetLine {
    /// Returns the markups effective for this line: its own override or
    /// the version's defaults.
    #[must_use]
    pub fn effective_markups<'a>(&'a self, version: &'a BudgetVersion) -> &'a MarkupPercentages {
        self.markups.as_ref().unwrap_or(&version.markups)
    }
}

/// Input for pricing a new budget line.
#[derive(Debug, Clone)]
pub struct LineInput {
    /// The budget-item leaf to cost.
    pub wbs_node_id: WbsNodeId,
    /// Display description.
    pub description: String,
    /// Measurement unit.
    pub unit: String,
    /// Contracted quantity.
    pub quantity: Decimal,
    /// Display ordering within the version.
    pub sort_order: i32,
    /// Per-line markup override; None inherits the version's.
    pub markups: Option<MarkupPercentages>,
    /// APU resource consumptions; may be empty for imported lines.
    pub resources: Vec<ResourceInput>,
    /// Optional indirect cost applied on top of the APU direct cost.
    pub indirect_cost_pct: Option<Percent>,
    /// Direct unit cost for lines without an APU.
    pub imported_unit_direct_cost: Option<Decimal>,
    /// Sale price override bypassing the markup chain.
    pub imported_unit_sale_price: Option<Decimal>,
}

/// A priced line ready for persistence, with its calculation detail.
#[derive(Debug, Clone)]
pub struct PricedLine {
    /// The line entity.
    pub line: BudgetLine,
    /// The resources materialized for the line.
    pub resources: Vec<BudgetResource>,
    /// The APU detail behind `unit_direct_cost`.
    pub apu: ApuBreakdown,
    /// The per-unit markup detail, None when the sale price was imported.
    pub markup: Option<MarkupBreakdown>,
}

/// A version copied into a fresh draft with new identities.
#[derive(Debug, Clone)]
pub struct CopiedVersion {
    /// The new draft version.
    pub version: BudgetVersion,
    /// Copied lines with fresh ids.
    pub lines: Vec<BudgetLine>,
    /// Copied resources re-owned by the new lines.
    pub resources: Vec<BudgetResource>,
}

/// A version state transition with audit data.
#[derive(Debug, Clone)]
pub enum VersionAction {
    /// Lock a draft version as a baseline.
    Baseline {
        /// The new status (Baseline).
        new_status: VersionStatus,
        /// When the version was baselined.
        baselined_at: DateTime<Utc>,
    },
    /// Approve a baselined version.
    Approve {
        /// The new status (Approved).
        new_status: VersionStatus,
        /// The user who approved the version.
        approved_by: UserId,
        /// When the version was approved.
        approved_at: DateTime<Utc>,
    },
}

impl VersionAction {
    /// Returns the status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> VersionStatus {
        match self {
            Self::Baseline { new_status, .. } | Self::Approve { new_status, .. } => *new_status,
        }
    }
}

/// WBS-subtree rollup totals of one version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRollup {
    /// Rolled-up direct cost per WBS node.
    pub direct_cost_by_node: HashMap<WbsNodeId, Decimal>,
    /// Rolled-up sale price per WBS node.
    pub sale_price_by_node: HashMap<WbsNodeId, Decimal>,
    /// Version-wide direct cost.
    pub total_direct_cost: Decimal,
    /// Version-wide sale price.
    pub total_sale_price: Decimal,
    /// Number of lines aggregated.
    pub line_count: usize,
}

/// Version summary for list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSummary {
    /// Version identifier.
    pub id: BudgetVersionId,
    /// Version code.
    pub version_code: String,
    /// Version classification.
    pub version_type: VersionType,
    /// Lifecycle status.
    pub status: VersionStatus,
    /// Number of lines.
    pub line_count: usize,
    /// Version-wide direct cost.
    pub total_direct_cost: Decimal,
    /// Version-wide sale price.
    pub total_sale_price: Decimal,
}
