//! Tamper-evident integrity seal over certified amounts.
//!
//! The seal is a SHA-256 digest over the ordered, canonicalized line
//! amounts, chained onto the previous certification's seal (or the
//! project salt for the first certification). Re-verifying a stored
//! certification detects any later tampering with historical amounts.

use sha2::{Digest, Sha256};

use super::error::CertificationError;
use super::types::{Certification, CertificationLine};

/// Computes the integrity seal for a certification's lines.
///
/// Lines are canonicalized by `budget_line_id` order; decimal values are
/// normalized so trailing zeros never change the digest. `chain_key` is
/// the previous certification's seal, or the project salt when there is
/// none.
#[must_use]
pub fn compute_seal(number: u32, lines: &[CertificationLine], chain_key: &str) -> String {
    let mut ordered: Vec<&CertificationLine> = lines.iter().collect();
    ordered.sort_by_key(|l| l.budget_line_id);

    let mut hasher = Sha256::new();
    hasher.update(chain_key.as_bytes());
    hasher.update(b"\n");
    hasher.update(number.to_string().as_bytes());
    for line in ordered {
        hasher.update(b"\n");
        hasher.update(line.budget_line_id.to_string().as_bytes());
        hasher.update(b"|");
        hasher.update(line.total_progress_pct.normalize().to_string().as_bytes());
        hasher.update(b"|");
        hasher.update(line.total_amount.normalize().to_string().as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Re-verifies a previously issued certification against its stored seal.
///
/// # Errors
///
/// * `CertificationError::SealMissing` if the certification left draft
///   without a seal
/// * `CertificationError::SealMismatch` if the recomputed digest differs
///   from the stored one; the certification must be reported, never
///   auto-corrected
pub fn verify_seal(
    certification: &Certification,
    lines: &[CertificationLine],
    chain_key: &str,
) -> Result<(), CertificationError> {
    let stored = certification
        .integrity_seal
        .as_deref()
        .ok_or(CertificationError::SealMissing(certification.status))?;

    let computed = compute_seal(certification.number, lines, chain_key);
    if stored != computed {
        tracing::warn!(
            certification_id = %certification.id,
            number = certification.number,
            "integrity seal mismatch"
        );
        return Err(CertificationError::SealMismatch {
            stored: stored.to_string(),
            computed,
        });
    }
    Ok(())
}
