//! WBS domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use obralis_shared::types::{ProjectId, WbsNodeId};

/// Classification of a WBS node.
///
/// Only `BudgetItem` leaves may carry budget lines; phases and tasks
/// aggregate their descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WbsCategory {
    /// Top-level grouping of project scope.
    Phase,
    /// Intermediate grouping under a phase.
    Task,
    /// Costed leaf eligible to carry budget lines.
    BudgetItem,
}

impl WbsCategory {
    /// Returns the string representation of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phase => "phase",
            Self::Task => "task",
            Self::BudgetItem => "budget_item",
        }
    }

    /// Parses a category from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "phase" => Some(Self::Phase),
            "task" => Some(Self::Task),
            "budget_item" => Some(Self::BudgetItem),
            _ => None,
        }
    }
}

impl std::fmt::Display for WbsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in the work-breakdown structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WbsNode {
    /// Unique identifier.
    pub id: WbsNodeId,
    /// Project this node belongs to.
    pub project_id: ProjectId,
    /// Hierarchical segmented code (e.g. "01.02.003"), unique within the project.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Node classification.
    pub category: WbsCategory,
    /// Owning parent node, None for roots.
    pub parent_id: Option<WbsNodeId>,
    /// Measurement unit (e.g. "m2", "kg").
    pub unit: String,
    /// Contracted quantity for the node.
    pub quantity: Decimal,
    /// Soft-deactivation flag; deactivated nodes cannot receive new lines.
    pub is_active: bool,
    /// Display ordering among siblings.
    pub sort_order: i32,
}
