//! APU error types.

use rust_decimal::Decimal;
use thiserror::Error;

use obralis_shared::types::BudgetResourceId;
use obralis_shared::AppError;

/// APU costing errors.
#[derive(Debug, Error)]
pub enum ApuError {
    /// A resource has a negative consumption quantity.
    #[error("Resource {resource} has negative quantity per unit {quantity}")]
    NegativeQuantity {
        /// The offending resource.
        resource: BudgetResourceId,
        /// The negative quantity.
        quantity: Decimal,
    },

    /// A resource has a negative unit cost.
    #[error("Resource {resource} has negative unit cost {unit_cost}")]
    NegativeUnitCost {
        /// The offending resource.
        resource: BudgetResourceId,
        /// The negative unit cost.
        unit_cost: Decimal,
    },

    /// The line quantity used to extend a unit price is negative.
    #[error("Line quantity {0} is negative")]
    NegativeLineQuantity(Decimal),

    /// A stored direct cost total does not match the resource aggregate.
    #[error("Direct cost total {stored} does not match resource aggregate {computed}")]
    DirectCostMismatch {
        /// The stored total under validation.
        stored: Decimal,
        /// The total recomputed from resources.
        computed: Decimal,
    },
}

impl From<ApuError> for AppError {
    fn from(err: ApuError) -> Self {
        Self::Validation(err.to_string())
    }
}
