//! WBS error types.

use rust_decimal::Decimal;
use thiserror::Error;

use obralis_shared::types::WbsNodeId;
use obralis_shared::AppError;

use super::types::WbsCategory;

/// WBS-related errors.
#[derive(Debug, Error)]
pub enum WbsError {
    /// Node not found in the tree.
    #[error("WBS node not found: {0}")]
    NotFound(WbsNodeId),

    /// Two nodes share the same id.
    #[error("Duplicate WBS node id: {0}")]
    DuplicateId(WbsNodeId),

    /// Two nodes share the same code.
    #[error("Duplicate WBS code: {0}")]
    DuplicateCode(String),

    /// A node references a parent that is not in the tree.
    #[error("WBS node {node} references unknown parent {parent}")]
    UnknownParent {
        /// The referencing node.
        node: WbsNodeId,
        /// The missing parent id.
        parent: WbsNodeId,
    },

    /// The parent chain loops back on itself.
    #[error("WBS parent references form a cycle through node {0}")]
    CycleDetected(WbsNodeId),

    /// Node quantity is negative.
    #[error("WBS node {node} has negative quantity {quantity}")]
    NegativeQuantity {
        /// The offending node.
        node: WbsNodeId,
        /// The negative quantity.
        quantity: Decimal,
    },

    /// A budget-item node has children.
    #[error("Budget item {0} must be a leaf but has children")]
    BudgetItemWithChildren(WbsNodeId),

    /// Budget lines may only attach to budget-item leaves.
    #[error("WBS node {node} ({category}) is not eligible to carry budget lines")]
    NotLineEligible {
        /// The targeted node.
        node: WbsNodeId,
        /// Its category.
        category: WbsCategory,
    },

    /// The node has been soft-deactivated.
    #[error("WBS node {0} is deactivated")]
    NodeInactive(WbsNodeId),
}

impl From<WbsError> for AppError {
    fn from(err: WbsError) -> Self {
        match err {
            WbsError::NotFound(_) => Self::NotFound(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
