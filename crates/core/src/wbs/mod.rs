//! Work-breakdown-structure tree and subtree rollups.
//!
//! The WBS decomposes a project into phases, tasks, and costed budget
//! items. Nodes are held in an arena indexed by id; all traversal goes
//! through a children index built per operation, never through live
//! parent references.

pub mod error;
pub mod tree;
pub mod types;

pub use error::WbsError;
pub use tree::{ChildrenIndex, WbsTree};
pub use types::{WbsCategory, WbsNode};
