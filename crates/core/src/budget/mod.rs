//! Budget versions, lines, and the version lifecycle.
//!
//! A budget version is a named snapshot of costed, WBS-linked lines.
//! Versions start as editable drafts, get locked as baselines, and are
//! finally approved for progress billing. Lines derive their direct cost
//! from an APU and their sale price from the markup chain.

pub mod error;
pub mod lines;
pub mod types;
pub mod version;

#[cfg(test)]
mod tests;
#[cfg(test)]
mod version_props;

pub use error::BudgetError;
pub use lines::BudgetLineService;
pub use types::{
    BudgetLine, BudgetVersion, CopiedVersion, LineInput, PricedLine, VersionAction, VersionRollup,
    VersionStatus, VersionSummary, VersionType,
};
pub use version::VersionService;
