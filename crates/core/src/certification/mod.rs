//! Progress-certification billing engine.
//!
//! A certification bills one period of progress against a locked budget
//! version. Lines snapshot the baseline quantities and unit prices at
//! creation and accumulate cumulative progress across periods. Issuing
//! freezes the document and chains an integrity seal over its amounts.

pub mod engine;
pub mod error;
pub mod seal;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::CertificationEngine;
pub use error::CertificationError;
pub use seal::{compute_seal, verify_seal};
pub use types::{
    Certification, CertificationAction, CertificationLine, CertificationStatus,
    DraftCertification, LineProgress, Period, PriorProgress,
};
