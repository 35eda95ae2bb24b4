//! APU domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use obralis_shared::types::{BudgetLineId, BudgetResourceId};

/// Classification of an APU resource consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Consumable materials.
    Material,
    /// Workforce hours.
    Labor,
    /// Machinery and equipment.
    Equipment,
    /// Subcontracted work packages.
    Subcontract,
}

impl ResourceType {
    /// All resource types in canonical order.
    pub const ALL: [Self; 4] = [Self::Material, Self::Labor, Self::Equipment, Self::Subcontract];

    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Labor => "labor",
            Self::Equipment => "equipment",
            Self::Subcontract => "subcontract",
        }
    }

    /// Parses a resource type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "material" => Some(Self::Material),
            "labor" => Some(Self::Labor),
            "equipment" => Some(Self::Equipment),
            "subcontract" => Some(Self::Subcontract),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A weighted resource consumption belonging to one budget line.
///
/// Editable while the owning version is draft; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetResource {
    /// Unique identifier.
    pub id: BudgetResourceId,
    /// Owning budget line.
    pub budget_line_id: BudgetLineId,
    /// Resource classification.
    pub resource_type: ResourceType,
    /// Display description.
    pub description: String,
    /// Measurement unit of the resource (e.g. "h", "kg").
    pub unit: String,
    /// Quantity consumed per unit of the owning line.
    pub quantity_per_unit: Decimal,
    /// Cost per unit of the resource.
    pub unit_cost: Decimal,
}

impl BudgetResource {
    /// The resource's contribution to the line's direct unit cost.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_cost * self.quantity_per_unit
    }
}

/// Input shape for a resource consumption on a new or repriced line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInput {
    /// Resource classification.
    pub resource_type: ResourceType,
    /// Display description.
    pub description: String,
    /// Measurement unit of the resource.
    pub unit: String,
    /// Quantity consumed per unit of the owning line.
    pub quantity_per_unit: Decimal,
    /// Cost per unit of the resource.
    pub unit_cost: Decimal,
}

impl ResourceInput {
    /// Materializes the input as a resource owned by `budget_line_id`,
    /// with a freshly generated id.
    #[must_use]
    pub fn into_resource(self, budget_line_id: BudgetLineId) -> BudgetResource {
        BudgetResource {
            id: BudgetResourceId::new(),
            budget_line_id,
            resource_type: self.resource_type,
            description: self.description,
            unit: self.unit,
            quantity_per_unit: self.quantity_per_unit,
            unit_cost: self.unit_cost,
        }
    }
}

/// One itemized row of an APU breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSubtotal {
    /// The contributing resource.
    pub resource_id: BudgetResourceId,
    /// Resource classification.
    pub resource_type: ResourceType,
    /// Display description.
    pub description: String,
    /// `unit_cost * quantity_per_unit`.
    pub subtotal: Decimal,
}

/// Direct cost grouped by resource class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSubtotal {
    /// Resource classification.
    pub resource_type: ResourceType,
    /// Sum of subtotals for the class.
    pub subtotal: Decimal,
}

/// The itemized result of a unit-price analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApuBreakdown {
    /// Per-resource rows in input order.
    pub items: Vec<ResourceSubtotal>,
    /// Direct cost grouped by resource class, canonical type order.
    pub by_type: Vec<TypeSubtotal>,
    /// Sum of all resource subtotals.
    pub direct_cost: Decimal,
    /// Indirect cost applied on top of the direct cost.
    pub indirect_cost: Decimal,
    /// `direct_cost + indirect_cost`.
    pub total_unit_price: Decimal,
}
