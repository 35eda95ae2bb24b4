//! Budget line pricing, validation, and rollup queries.

use std::collections::HashMap;

use rust_decimal::Decimal;

use obralis_shared::types::{BudgetLineId, PageRequest, PageResponse, WbsNodeId};

use crate::apu::{ApuService, BudgetResource};
use crate::markup::MarkupCalculator;
use crate::wbs::WbsTree;

use super::error::BudgetError;
use super::types::{
    BudgetLine, BudgetVersion, LineInput, PricedLine, VersionRollup, VersionSummary,
};
use super::version::VersionService;

/// Stateless service for budget line operations.
pub struct BudgetLineService;

impl BudgetLineService {
    /// Prices a new line for a draft version.
    ///
    /// The direct unit cost comes from the APU when resources are given,
    /// or from the imported value otherwise. The sale price comes from
    /// the markup chain (per-line override, falling back to the
    /// version's percentages) unless an imported sale price bypasses it.
    /// Totals are the unit values extended by the line quantity.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError` when the version is locked, the WBS node is
    /// not an active budget-item leaf, or any amount is negative.
    pub fn price_line(
        version: &BudgetVersion,
        tree: &WbsTree,
        input: LineInput,
    ) -> Result<PricedLine, BudgetError> {
        VersionService::validate_can_modify(version.status)?;
        tree.line_eligible(input.wbs_node_id)?;

        if input.quantity < Decimal::ZERO {
            return Err(BudgetError::NegativeQuantity(input.quantity));
        }

        let line_id = BudgetLineId::new();
        let resources: Vec<BudgetResource> = input
            .resources
            .into_iter()
            .map(|r| r.into_resource(line_id))
            .collect();

        let apu = ApuService::unit_price(&resources, input.indirect_cost_pct)?;
        let unit_direct_cost = if resources.is_empty() {
            input.imported_unit_direct_cost.unwrap_or(Decimal::ZERO)
        } else {
            apu.total_unit_price
        };
        if unit_direct_cost < Decimal::ZERO {
            return Err(BudgetError::NegativeDirectCost(unit_direct_cost));
        }

        let markups = input.markups.unwrap_or(version.markups);
        let (unit_sale_price, markup) = match input.imported_unit_sale_price {
            Some(imported) => {
                if imported < Decimal::ZERO {
                    return Err(BudgetError::NegativeSalePrice(imported));
                }
                (imported, None)
            }
            None => {
                let breakdown = MarkupCalculator::breakdown(unit_direct_cost, &markups);
                (breakdown.total_sale, Some(breakdown))
            }
        };

        let line = BudgetLine {
            id: line_id,
            version_id: version.id,
            wbs_node_id: input.wbs_node_id,
            description: input.description,
            unit: input.unit,
            quantity: input.quantity,
            unit_direct_cost,
            unit_sale_price,
            direct_cost_total: unit_direct_cost * input.quantity,
            sale_price_total: unit_sale_price * input.quantity,
            markups: input.markups,
            sort_order: input.sort_order,
        };

        Ok(PricedLine {
            line,
            resources,
            apu,
            markup,
        })
    }

    /// Validates a stored line against its invariants.
    ///
    /// Checks non-negative quantity and totals, WBS eligibility, and
    /// (when resources exist) that `direct_cost_total` equals the
    /// resource aggregate with exact fixed-point equality.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate_line(
        tree: &WbsTree,
        line: &BudgetLine,
        resources: &[BudgetResource],
    ) -> Result<(), BudgetError> {
        if line.quantity < Decimal::ZERO {
            return Err(BudgetError::NegativeQuantity(line.quantity));
        }
        if line.direct_cost_total < Decimal::ZERO {
            return Err(BudgetError::NegativeDirectCost(line.direct_cost_total));
        }
        if line.sale_price_total < Decimal::ZERO {
            return Err(BudgetError::NegativeSalePrice(line.sale_price_total));
        }
        tree.line_eligible(line.wbs_node_id)?;

        let owned: Vec<BudgetResource> = resources
            .iter()
            .filter(|r| r.budget_line_id == line.id)
            .cloned()
            .collect();
        ApuService::validate_direct_cost_total(&owned, line.quantity, line.direct_cost_total)?;
        Ok(())
    }

    /// Lists a version's lines ordered by `sort_order` then id.
    #[must_use]
    pub fn list_lines(lines: &[BudgetLine], page: &PageRequest) -> PageResponse<BudgetLine> {
        let mut ordered: Vec<BudgetLine> = lines.to_vec();
        ordered.sort_by(|a, b| (a.sort_order, a.id).cmp(&(b.sort_order, b.id)));
        PageResponse::paginate(&ordered, page)
    }

    /// Rolls up a version's stored totals over the WBS.
    ///
    /// Stored line totals are authoritative; markups are never re-derived
    /// on read.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Wbs` if a line references a node outside the
    /// tree.
    pub fn rollup_totals(
        tree: &WbsTree,
        lines: &[BudgetLine],
    ) -> Result<VersionRollup, BudgetError> {
        let mut direct_by_leaf: HashMap<WbsNodeId, Decimal> = HashMap::new();
        let mut sale_by_leaf: HashMap<WbsNodeId, Decimal> = HashMap::new();
        let mut total_direct_cost = Decimal::ZERO;
        let mut total_sale_price = Decimal::ZERO;

        for line in lines {
            if tree.get(line.wbs_node_id).is_none() {
                return Err(crate::wbs::WbsError::NotFound(line.wbs_node_id).into());
            }
            *direct_by_leaf.entry(line.wbs_node_id).or_default() += line.direct_cost_total;
            *sale_by_leaf.entry(line.wbs_node_id).or_default() += line.sale_price_total;
            total_direct_cost += line.direct_cost_total;
            total_sale_price += line.sale_price_total;
        }

        Ok(VersionRollup {
            direct_cost_by_node: tree.rollup(&direct_by_leaf),
            sale_price_by_node: tree.rollup(&sale_by_leaf),
            total_direct_cost,
            total_sale_price,
            line_count: lines.len(),
        })
    }

    /// Builds a list-view summary of a version.
    #[must_use]
    pub fn summarize(version: &BudgetVersion, lines: &[BudgetLine]) -> VersionSummary {
        VersionSummary {
            id: version.id,
            version_code: version.version_code.clone(),
            version_type: version.version_type,
            status: version.status,
            line_count: lines.len(),
            total_direct_cost: lines.iter().map(|l| l.direct_cost_total).sum(),
            total_sale_price: lines.iter().map(|l| l.sale_price_total).sum(),
        }
    }
}
