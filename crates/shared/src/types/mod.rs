//! Common types used across the application.

pub mod id;
pub mod pagination;
pub mod percent;

pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use percent::{Percent, PercentOutOfRange};
