use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{PolicyViolationKind, SdkError};

static REVERT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ERR_[A-Z0-9_]+").expect("valid revert pattern"));

/// Revert codes raised by the session account contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertCode {
    SessionExpired,
    SessionInactive,
    SessionNotReady,
    SessionStale,
    PolicyCallCap,
    PolicyTargetDenied,
    PolicySelectorDenied,
    ValueLimitExceeded,
    NotOwner,
    NotGuardian,
    BadSessionSignature,
    GuardianExists,
    RecoveryInProgress,
    NotEnoughConfirmations,
    Unrecognized(String),
}

impl RevertCode {
    pub fn parse(token: &str) -> Self {
        match token {
            "ERR_SESSION_EXPIRED" => RevertCode::SessionExpired,
            "ERR_SESSION_INACTIVE" => RevertCode::SessionInactive,
            "ERR_SESSION_NOT_READY" => RevertCode::SessionNotReady,
            "ERR_SESSION_STALE" => RevertCode::SessionStale,
            "ERR_POLICY_CALLCAP" => RevertCode::PolicyCallCap,
            "ERR_POLICY_TARGET_DENIED" => RevertCode::PolicyTargetDenied,
            "ERR_POLICY_SELECTOR_DENIED" => RevertCode::PolicySelectorDenied,
            "ERR_VALUE_LIMIT_EXCEEDED" => RevertCode::ValueLimitExceeded,
            "ERR_NOT_OWNER" => RevertCode::NotOwner,
            "ERR_NOT_GUARDIAN" => RevertCode::NotGuardian,
            "ERR_BAD_SESSION_SIGNATURE" => RevertCode::BadSessionSignature,
            "ERR_GUARDIAN_EXISTS" => RevertCode::GuardianExists,
            "ERR_RECOVERY_IN_PROGRESS" => RevertCode::RecoveryInProgress,
            "ERR_NOT_ENOUGH_CONFIRMATIONS" => RevertCode::NotEnoughConfirmations,
            other => RevertCode::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RevertCode::SessionExpired => "ERR_SESSION_EXPIRED",
            RevertCode::SessionInactive => "ERR_SESSION_INACTIVE",
            RevertCode::SessionNotReady => "ERR_SESSION_NOT_READY",
            RevertCode::SessionStale => "ERR_SESSION_STALE",
            RevertCode::PolicyCallCap => "ERR_POLICY_CALLCAP",
            RevertCode::PolicyTargetDenied => "ERR_POLICY_TARGET_DENIED",
            RevertCode::PolicySelectorDenied => "ERR_POLICY_SELECTOR_DENIED",
            RevertCode::ValueLimitExceeded => "ERR_VALUE_LIMIT_EXCEEDED",
            RevertCode::NotOwner => "ERR_NOT_OWNER",
            RevertCode::NotGuardian => "ERR_NOT_GUARDIAN",
            RevertCode::BadSessionSignature => "ERR_BAD_SESSION_SIGNATURE",
            RevertCode::GuardianExists => "ERR_GUARDIAN_EXISTS",
            RevertCode::RecoveryInProgress => "ERR_RECOVERY_IN_PROGRESS",
            RevertCode::NotEnoughConfirmations => "ERR_NOT_ENOUGH_CONFIRMATIONS",
            RevertCode::Unrecognized(token) => token,
        }
    }

    /// Convert to the matching SDK error.
    pub fn into_error(self) -> SdkError {
        let session = |msg: &str| SdkError::SessionExpired(msg.to_string());
        let policy = |kind| SdkError::policy_violation(kind, None);

        match self {
            RevertCode::SessionExpired => session("Session has expired."),
            RevertCode::SessionInactive => session("Session is inactive or revoked."),
            RevertCode::SessionNotReady => session("Session is not valid yet."),
            RevertCode::SessionStale => {
                session("Session was invalidated by an owner rotation.")
            },
            RevertCode::PolicyCallCap => policy(PolicyViolationKind::Calls),
            RevertCode::PolicyTargetDenied => policy(PolicyViolationKind::Target),
            RevertCode::PolicySelectorDenied => policy(PolicyViolationKind::Selector),
            RevertCode::ValueLimitExceeded => policy(PolicyViolationKind::Value),
            RevertCode::Unrecognized(token) => SdkError::Contract {
                message: format!("Contract reverted with {}.", token),
                code: token,
            },
            known => {
                let message = match known {
                    RevertCode::NotOwner => "Caller is not the account owner.",
                    RevertCode::NotGuardian => "Caller is not a registered guardian.",
                    RevertCode::BadSessionSignature => "Session signature is invalid.",
                    RevertCode::GuardianExists => "Guardian is already registered.",
                    RevertCode::RecoveryInProgress => "Account recovery is already in progress.",
                    _ => "Not enough guardian confirmations for recovery.",
                };
                SdkError::Contract {
                    code: known.as_str().to_string(),
                    message: message.to_string(),
                }
            },
        }
    }
}

/// A failure as received from a transport or wallet.
#[derive(Debug, Clone)]
pub enum RawFailure {
    /// Already classified; returned unchanged.
    Typed(SdkError),
    Message(String),
    Json(Value),
}

/// Transport, encoding and config errors still carry raw revert text and go
/// through the token search. Every other variant is already classified.
impl From<SdkError> for RawFailure {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::Connection(_) | SdkError::Encoding(_) | SdkError::Config(_) => {
                RawFailure::Message(err.to_string())
            },
            classified => RawFailure::Typed(classified),
        }
    }
}

impl From<String> for RawFailure {
    fn from(msg: String) -> Self {
        RawFailure::Message(msg)
    }
}

impl From<&str> for RawFailure {
    fn from(msg: &str) -> Self {
        RawFailure::Message(msg.to_string())
    }
}

impl From<Value> for RawFailure {
    fn from(value: Value) -> Self {
        RawFailure::Json(value)
    }
}

impl RawFailure {
    fn message(&self) -> String {
        match self {
            RawFailure::Typed(err) => err.to_string(),
            RawFailure::Message(msg) => msg.clone(),
            RawFailure::Json(Value::String(msg)) => msg.clone(),
            RawFailure::Json(value) => match value.get("message").and_then(Value::as_str) {
                Some(msg) => msg.to_string(),
                None => value.to_string(),
            },
        }
    }
}

/// Map a raw contract or wallet failure to an [`SdkError`].
///
/// The first `ERR_*` token in the failure text selects the error; text with no
/// token becomes `UnknownContractError` carrying the raw text.
pub fn map_contract_error(raw: impl Into<RawFailure>) -> SdkError {
    let raw = raw.into();
    if let RawFailure::Typed(err) = raw {
        return err;
    }

    let message = raw.message();
    match REVERT_TOKEN.find(&message) {
        Some(token) => {
            let code = RevertCode::parse(token.as_str());
            debug!(code = code.as_str(), "Mapped contract revert");
            code.into_error()
        },
        None => SdkError::Contract {
            code: SdkError::UNKNOWN_CONTRACT_ERROR.to_string(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_errors_pass_through() {
        let err = SdkError::SessionExpired("custom".to_string());
        assert_eq!(map_contract_error(err.clone()), err);
    }

    #[test]
    fn test_transport_errors_are_searched() {
        let err = SdkError::Connection(
            "Transaction execution error: ERR_POLICY_TARGET_DENIED".to_string(),
        );
        assert_eq!(
            map_contract_error(err).policy_kind(),
            Some(PolicyViolationKind::Target)
        );

        let err = SdkError::Connection("timeout".to_string());
        let mapped = map_contract_error(err);
        assert_eq!(mapped.code(), "UnknownContractError");
        assert_eq!(mapped.to_string(), "Connection error: timeout");
    }

    #[test]
    fn test_session_lifecycle_codes() {
        let mapped = map_contract_error("Execution reverted: ERR_SESSION_STALE");
        assert!(matches!(mapped, SdkError::SessionExpired(ref m) if m.contains("owner rotation")));

        for token in [
            "ERR_SESSION_EXPIRED",
            "ERR_SESSION_INACTIVE",
            "ERR_SESSION_NOT_READY",
        ] {
            assert_eq!(map_contract_error(token).code(), "SessionExpired");
        }
    }

    #[test]
    fn test_policy_codes() {
        let mapped = map_contract_error(json!({ "message": "Error: ERR_POLICY_TARGET_DENIED" }));
        assert_eq!(mapped.policy_kind(), Some(PolicyViolationKind::Target));

        let cases = [
            ("ERR_POLICY_CALLCAP", PolicyViolationKind::Calls),
            ("ERR_POLICY_SELECTOR_DENIED", PolicyViolationKind::Selector),
            ("ERR_VALUE_LIMIT_EXCEEDED", PolicyViolationKind::Value),
        ];
        for (token, kind) in cases {
            assert_eq!(map_contract_error(token).policy_kind(), Some(kind));
        }
    }

    #[test]
    fn test_guardian_code_is_preserved() {
        let mapped = map_contract_error("ERR_NOT_GUARDIAN");
        assert_eq!(mapped.code(), "ERR_NOT_GUARDIAN");
        assert!(mapped.to_string().contains("not a registered guardian"));
    }

    #[test]
    fn test_unrecognized_token() {
        let mapped = map_contract_error("failure ERR_SOMETHING_NEW in call");
        assert_eq!(
            mapped,
            SdkError::Contract {
                code: "ERR_SOMETHING_NEW".to_string(),
                message: "Contract reverted with ERR_SOMETHING_NEW.".to_string(),
            }
        );
    }

    #[test]
    fn test_no_token_falls_back_to_unknown() {
        let mapped = map_contract_error("something else");
        assert_eq!(mapped.code(), "UnknownContractError");
        assert_eq!(mapped.to_string(), "something else");

        let mapped = map_contract_error(json!({ "code": 7 }));
        assert_eq!(mapped.code(), "UnknownContractError");
        assert_eq!(mapped.to_string(), r#"{"code":7}"#);
    }

    #[test]
    fn test_first_token_wins() {
        let mapped = map_contract_error("ERR_NOT_OWNER then ERR_SESSION_EXPIRED");
        assert_eq!(mapped.code(), "ERR_NOT_OWNER");
    }

    #[test]
    fn test_mapping_is_idempotent() {
        for raw in ["ERR_SESSION_STALE", "ERR_POLICY_CALLCAP", "ERR_NOT_OWNER", "nope"] {
            let once = map_contract_error(raw);
            assert_eq!(map_contract_error(once.clone()), once);
        }
    }
}
