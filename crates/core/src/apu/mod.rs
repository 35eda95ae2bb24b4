//! Unit-price analysis (APU) resource costing.
//!
//! An APU derives a budget line's direct unit cost from its weighted
//! resource consumptions: materials, labor, equipment, and subcontracts.

pub mod costing;
pub mod error;
pub mod types;

pub use costing::ApuService;
pub use error::ApuError;
pub use types::{
    ApuBreakdown, BudgetResource, ResourceInput, ResourceSubtotal, ResourceType, TypeSubtotal,
};
