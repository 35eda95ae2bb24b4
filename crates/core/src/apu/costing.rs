//! Unit-price computation from resource consumptions.

use rust_decimal::Decimal;

use obralis_shared::types::Percent;

use super::error::ApuError;
use super::types::{ApuBreakdown, BudgetResource, ResourceSubtotal, ResourceType, TypeSubtotal};

/// Stateless APU costing service.
pub struct ApuService;

impl ApuService {
    /// Computes a line's unit price from its resource consumptions.
    ///
    /// Each resource contributes `unit_cost * quantity_per_unit`; the sum
    /// is the direct cost, and the optional indirect percentage is applied
    /// on top. An empty resource list is valid and yields a zero direct
    /// cost (imported or manual lines carry no APU).
    ///
    /// # Errors
    ///
    /// Returns `ApuError` if any resource has a negative quantity or
    /// unit cost.
    pub fn unit_price(
        resources: &[BudgetResource],
        indirect_cost_pct: Option<Percent>,
    ) -> Result<ApuBreakdown, ApuError> {
        let mut items = Vec::with_capacity(resources.len());
        let mut direct_cost = Decimal::ZERO;

        for resource in resources {
            if resource.quantity_per_unit < Decimal::ZERO {
                return Err(ApuError::NegativeQuantity {
                    resource: resource.id,
                    quantity: resource.quantity_per_unit,
                });
            }
            if resource.unit_cost < Decimal::ZERO {
                return Err(ApuError::NegativeUnitCost {
                    resource: resource.id,
                    unit_cost: resource.unit_cost,
                });
            }

            let subtotal = resource.subtotal();
            direct_cost += subtotal;
            items.push(ResourceSubtotal {
                resource_id: resource.id,
                resource_type: resource.resource_type,
                description: resource.description.clone(),
                subtotal,
            });
        }

        let by_type = Self::group_by_type(&items);
        let indirect_cost = indirect_cost_pct.map_or(Decimal::ZERO, |pct| pct.of(direct_cost));

        Ok(ApuBreakdown {
            items,
            by_type,
            direct_cost,
            indirect_cost,
            total_unit_price: direct_cost + indirect_cost,
        })
    }

    fn group_by_type(items: &[ResourceSubtotal]) -> Vec<TypeSubtotal> {
        ResourceType::ALL
            .into_iter()
            .filter_map(|resource_type| {
                let subtotal: Decimal = items
                    .iter()
                    .filter(|i| i.resource_type == resource_type)
                    .map(|i| i.subtotal)
                    .sum();
                (!subtotal.is_zero()).then_some(TypeSubtotal {
                    resource_type,
                    subtotal,
                })
            })
            .collect()
    }

    /// Extends a unit price to a line total: `total_unit_price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns `ApuError::NegativeLineQuantity` if the quantity is negative.
    pub fn extend(breakdown: &ApuBreakdown, quantity: Decimal) -> Result<Decimal, ApuError> {
        if quantity < Decimal::ZERO {
            return Err(ApuError::NegativeLineQuantity(quantity));
        }
        Ok(breakdown.total_unit_price * quantity)
    }

    /// Validates a stored direct cost total against the resource
    /// aggregate with exact fixed-point equality.
    ///
    /// A line with no resources is exempt: imported and manual lines
    /// keep their stored total.
    ///
    /// # Errors
    ///
    /// Returns `ApuError::DirectCostMismatch` on any difference.
    pub fn validate_direct_cost_total(
        resources: &[BudgetResource],
        line_quantity: Decimal,
        stored_total: Decimal,
    ) -> Result<(), ApuError> {
        if resources.is_empty() {
            return Ok(());
        }
        let breakdown = Self::unit_price(resources, None)?;
        let computed = Self::extend(&breakdown, line_quantity)?;
        if computed != stored_total {
            return Err(ApuError::DirectCostMismatch {
                stored: stored_total,
                computed,
            });
        }
        Ok(())
    }
}
