use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which part of a session policy a call batch violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyViolationKind {
    Calls,
    Target,
    Selector,
    Value,
}

impl PolicyViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyViolationKind::Calls => "calls",
            PolicyViolationKind::Target => "target",
            PolicyViolationKind::Selector => "selector",
            PolicyViolationKind::Value => "value",
        }
    }
}

impl fmt::Display for PolicyViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SDK-specific error types for session and paymaster operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    /// No wallet provider could be reached
    #[error("{0}")]
    ProviderUnavailable(String),

    /// Session is revoked, not yet valid, expired or unknown
    #[error("{0}")]
    SessionExpired(String),

    /// Call batch falls outside the session policy
    #[error("{message}")]
    PolicyViolation {
        kind: PolicyViolationKind,
        detail: Option<String>,
        message: String,
    },

    /// Sponsor refused to decorate the transaction
    #[error("{0}")]
    PaymasterDenied(String),

    /// Revert code raised by the account contract
    #[error("{message}")]
    Contract { code: String, message: String },

    /// Input could not be encoded as a felt
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Transport or RPC error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid account configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SdkError {
    /// Code used when a revert payload carries no recognizable error token.
    pub const UNKNOWN_CONTRACT_ERROR: &'static str = "UnknownContractError";

    pub fn session_expired() -> Self {
        SdkError::SessionExpired("Session is inactive or expired.".to_string())
    }

    pub fn policy_violation(kind: PolicyViolationKind, detail: Option<String>) -> Self {
        let message = match &detail {
            Some(d) => format!("Session policy violation: {} ({}).", kind, d),
            None => format!("Session policy violation: {}.", kind),
        };
        SdkError::PolicyViolation {
            kind,
            detail,
            message,
        }
    }

    pub fn paymaster_denied() -> Self {
        SdkError::PaymasterDenied("Paymaster rejected the transaction.".to_string())
    }

    pub fn provider_unavailable() -> Self {
        SdkError::ProviderUnavailable("No available wallet connectors.".to_string())
    }

    /// Taxonomy code of this error.
    pub fn code(&self) -> &str {
        match self {
            SdkError::ProviderUnavailable(_) => "ProviderUnavailable",
            SdkError::SessionExpired(_) => "SessionExpired",
            SdkError::PolicyViolation { .. } => "PolicyViolation",
            SdkError::PaymasterDenied(_) => "PaymasterDenied",
            SdkError::Contract { code, .. } => code,
            SdkError::Encoding(_) => "EncodingError",
            SdkError::Connection(_) => "ConnectionError",
            SdkError::Config(_) => "ConfigError",
        }
    }

    pub fn policy_kind(&self) -> Option<PolicyViolationKind> {
        match self {
            SdkError::PolicyViolation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_violation_message_includes_detail() {
        let err = SdkError::policy_violation(PolicyViolationKind::Target, Some("0xdead".into()));
        assert_eq!(err.to_string(), "Session policy violation: target (0xdead).");
        assert_eq!(err.code(), "PolicyViolation");
        assert_eq!(err.policy_kind(), Some(PolicyViolationKind::Target));
    }

    #[test]
    fn test_contract_error_code_is_literal() {
        let err = SdkError::Contract {
            code: "ERR_NOT_OWNER".into(),
            message: "nope".into(),
        };
        assert_eq!(err.code(), "ERR_NOT_OWNER");
        assert_eq!(err.policy_kind(), None);
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(
            SdkError::session_expired().to_string(),
            "Session is inactive or expired."
        );
        assert_eq!(
            SdkError::paymaster_denied().to_string(),
            "Paymaster rejected the transaction."
        );
        assert_eq!(SdkError::provider_unavailable().code(), "ProviderUnavailable");
    }
}
