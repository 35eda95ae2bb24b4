//! Arena-backed WBS tree with index-based traversal.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use obralis_shared::types::WbsNodeId;

use super::error::WbsError;
use super::types::{WbsCategory, WbsNode};

/// Parent-to-children map built once per operation.
///
/// Traversal never follows live parent references; everything goes
/// through this index, which is validated to be acyclic at tree
/// construction.
#[derive(Debug, Clone)]
pub struct ChildrenIndex {
    children: HashMap<Option<WbsNodeId>, Vec<WbsNodeId>>,
}

impl ChildrenIndex {
    /// Returns the ordered children of a parent (None = roots).
    #[must_use]
    pub fn children(&self, parent: Option<WbsNodeId>) -> &[WbsNodeId] {
        self.children.get(&parent).map_or(&[], Vec::as_slice)
    }

    /// Returns the ordered root nodes.
    #[must_use]
    pub fn roots(&self) -> &[WbsNodeId] {
        self.children(None)
    }

    /// Returns true if the node has no children.
    #[must_use]
    pub fn is_leaf(&self, id: WbsNodeId) -> bool {
        self.children(Some(id)).is_empty()
    }
}

/// The work-breakdown structure of one project.
///
/// Nodes live in an arena; lookups go through an id index.
#[derive(Debug, Clone)]
pub struct WbsTree {
    nodes: Vec<WbsNode>,
    by_id: HashMap<WbsNodeId, usize>,
}

impl WbsTree {
    /// Builds a tree from a flat node list.
    ///
    /// # Errors
    ///
    /// Returns `WbsError` on duplicate ids or codes, unknown parent
    /// references, or a cyclic parent chain.
    pub fn new(nodes: Vec<WbsNode>) -> Result<Self, WbsError> {
        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut codes = HashSet::with_capacity(nodes.len());

        for (idx, node) in nodes.iter().enumerate() {
            if by_id.insert(node.id, idx).is_some() {
                return Err(WbsError::DuplicateId(node.id));
            }
            if !codes.insert(node.code.clone()) {
                return Err(WbsError::DuplicateCode(node.code.clone()));
            }
        }

        for node in &nodes {
            if let Some(parent) = node.parent_id {
                if parent == node.id {
                    return Err(WbsError::CycleDetected(node.id));
                }
                if !by_id.contains_key(&parent) {
                    return Err(WbsError::UnknownParent {
                        node: node.id,
                        parent,
                    });
                }
            }
        }

        let tree = Self { nodes, by_id };
        tree.check_acyclic()?;
        Ok(tree)
    }

    /// All parents resolve, so any node unreachable from the roots sits
    /// on a parent cycle.
    fn check_acyclic(&self) -> Result<(), WbsError> {
        let index = self.children_index();
        let mut visited = HashSet::with_capacity(self.nodes.len());
        let mut stack: Vec<WbsNodeId> = index.roots().to_vec();

        while let Some(id) = stack.pop() {
            if visited.insert(id) {
                stack.extend_from_slice(index.children(Some(id)));
            }
        }

        if visited.len() < self.nodes.len() {
            let orphan = self
                .nodes
                .iter()
                .find(|n| !visited.contains(&n.id))
                .map(|n| n.id)
                .unwrap_or_default();
            return Err(WbsError::CycleDetected(orphan));
        }
        Ok(())
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn get(&self, id: WbsNodeId) -> Option<&WbsNode> {
        self.by_id.get(&id).map(|&idx| &self.nodes[idx])
    }

    /// Returns all nodes in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[WbsNode] {
        &self.nodes
    }

    /// Builds the parent-to-children index, siblings ordered by
    /// `sort_order` then code.
    #[must_use]
    pub fn children_index(&self) -> ChildrenIndex {
        let mut children: HashMap<Option<WbsNodeId>, Vec<WbsNodeId>> = HashMap::new();
        for node in &self.nodes {
            children.entry(node.parent_id).or_default().push(node.id);
        }
        for ids in children.values_mut() {
            ids.sort_by(|a, b| {
                let na = &self.nodes[self.by_id[a]];
                let nb = &self.nodes[self.by_id[b]];
                (na.sort_order, na.code.as_str()).cmp(&(nb.sort_order, nb.code.as_str()))
            });
        }
        ChildrenIndex { children }
    }

    /// Returns the node and all its descendants, depth-first in sibling
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `WbsError::NotFound` if the node is not in the tree.
    pub fn subtree(&self, id: WbsNodeId) -> Result<Vec<WbsNodeId>, WbsError> {
        if !self.by_id.contains_key(&id) {
            return Err(WbsError::NotFound(id));
        }
        let index = self.children_index();
        let mut out = Vec::new();
        self.collect_subtree(&index, id, &mut out);
        Ok(out)
    }

    fn collect_subtree(&self, index: &ChildrenIndex, id: WbsNodeId, out: &mut Vec<WbsNodeId>) {
        out.push(id);
        for &child in index.children(Some(id)) {
            self.collect_subtree(index, child, out);
        }
    }

    /// Returns the ids of all budget-item leaves.
    #[must_use]
    pub fn leaves(&self) -> Vec<WbsNodeId> {
        let index = self.children_index();
        self.nodes
            .iter()
            .filter(|n| n.category == WbsCategory::BudgetItem && index.is_leaf(n.id))
            .map(|n| n.id)
            .collect()
    }

    /// Validates structural invariants: non-negative quantities and the
    /// category/leaf rule (budget items are leaves).
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), WbsError> {
        let index = self.children_index();
        for node in &self.nodes {
            if node.quantity < Decimal::ZERO {
                return Err(WbsError::NegativeQuantity {
                    node: node.id,
                    quantity: node.quantity,
                });
            }
            if node.category == WbsCategory::BudgetItem && !index.is_leaf(node.id) {
                return Err(WbsError::BudgetItemWithChildren(node.id));
            }
        }
        Ok(())
    }

    /// Checks that a node may carry budget lines: it must exist, be
    /// active, and be a budget-item leaf.
    ///
    /// # Errors
    ///
    /// Returns `WbsError` describing the failed eligibility check.
    pub fn line_eligible(&self, id: WbsNodeId) -> Result<(), WbsError> {
        let node = self.get(id).ok_or(WbsError::NotFound(id))?;
        if !node.is_active {
            return Err(WbsError::NodeInactive(id));
        }
        let index = self.children_index();
        if node.category != WbsCategory::BudgetItem || !index.is_leaf(id) {
            return Err(WbsError::NotLineEligible {
                node: id,
                category: node.category,
            });
        }
        Ok(())
    }

    /// Soft-deactivates a node. Nodes referenced by budget lines are
    /// never hard-deleted.
    ///
    /// # Errors
    ///
    /// Returns `WbsError::NotFound` if the node is not in the tree.
    pub fn deactivate(&mut self, id: WbsNodeId) -> Result<(), WbsError> {
        let idx = *self.by_id.get(&id).ok_or(WbsError::NotFound(id))?;
        self.nodes[idx].is_active = false;
        Ok(())
    }

    /// Reactivates a previously deactivated node.
    ///
    /// # Errors
    ///
    /// Returns `WbsError::NotFound` if the node is not in the tree.
    pub fn reactivate(&mut self, id: WbsNodeId) -> Result<(), WbsError> {
        let idx = *self.by_id.get(&id).ok_or(WbsError::NotFound(id))?;
        self.nodes[idx].is_active = true;
        Ok(())
    }

    /// Aggregates per-leaf amounts over every subtree.
    ///
    /// Returns the rolled-up total for each node id: its own amount (if
    /// any) plus the totals of all descendants.
    #[must_use]
    pub fn rollup(
        &self,
        amount_by_leaf: &HashMap<WbsNodeId, Decimal>,
    ) -> HashMap<WbsNodeId, Decimal> {
        let index = self.children_index();
        let mut totals = HashMap::with_capacity(self.nodes.len());
        for &root in index.roots() {
            self.rollup_node(&index, root, amount_by_leaf, &mut totals);
        }
        totals
    }

    fn rollup_node(
        &self,
        index: &ChildrenIndex,
        id: WbsNodeId,
        amount_by_leaf: &HashMap<WbsNodeId, Decimal>,
        totals: &mut HashMap<WbsNodeId, Decimal>,
    ) -> Decimal {
        let mut total = amount_by_leaf.get(&id).copied().unwrap_or(Decimal::ZERO);
        for &child in index.children(Some(id)) {
            total += self.rollup_node(index, child, amount_by_leaf, totals);
        }
        totals.insert(id, total);
        total
    }
}
