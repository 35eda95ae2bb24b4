//! Actions gated by the host's access-control collaborator.
//!
//! The core never resolves roles itself. Operations that require elevated
//! authorization take an `authorize` closure supplied by the caller and
//! fail with a typed error when it returns false.

use serde::{Deserialize, Serialize};

/// An action the access-control collaborator can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    /// Promote a baselined budget version to approved.
    ApproveVersion,
    /// Approve an issued certification.
    ApproveCertification,
    /// Reject an issued certification.
    RejectCertification,
}

impl AccessAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApproveVersion => "approve_version",
            Self::ApproveCertification => "approve_certification",
            Self::RejectCertification => "reject_certification",
        }
    }
}

impl std::fmt::Display for AccessAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_as_str() {
        assert_eq!(AccessAction::ApproveVersion.as_str(), "approve_version");
        assert_eq!(
            AccessAction::ApproveCertification.as_str(),
            "approve_certification"
        );
        assert_eq!(
            AccessAction::RejectCertification.as_str(),
            "reject_certification"
        );
    }
}
