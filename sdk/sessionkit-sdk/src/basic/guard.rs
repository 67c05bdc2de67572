use tracing::debug;

use crate::basic::sessions::SessionStore;
use crate::error::{PolicyViolationKind, Result, SdkError};
use crate::types::{AccountCall, Felt, Session};
use crate::utils::unix_now;

/// Options for [`use_session`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionUseOptions {
    /// Override "now" in seconds since epoch (defaults to the wall clock).
    pub now: Option<u64>,
}

impl SessionUseOptions {
    pub fn at(now: u64) -> Self {
        Self { now: Some(now) }
    }

    fn now(&self) -> u64 {
        self.now.unwrap_or_else(unix_now)
    }
}

/// A loaded session that checks call batches against its policy.
#[derive(Debug, Clone)]
pub struct SessionUsage {
    session: Session,
    opts: SessionUseOptions,
}

impl SessionUsage {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Check liveness again, then check `calls` against the policy.
    pub fn ensure_allowed(&self, calls: &[AccountCall]) -> Result<()> {
        ensure_session_active(&self.session, self.opts.now())?;
        ensure_policy(&self.session, calls)
    }

    pub fn ensure_call_allowed(&self, call: &AccountCall) -> Result<()> {
        self.ensure_allowed(std::slice::from_ref(call))
    }
}

/// Load `session_id` from `store` and check that it is live.
///
/// An unknown id is reported as `SessionExpired`, same as a dead session.
pub fn use_session(
    store: &SessionStore,
    session_id: &Felt,
    opts: SessionUseOptions,
) -> Result<SessionUsage> {
    let session = store.get(session_id).ok_or_else(|| {
        debug!(session_id = %session_id, "Session lookup failed");
        SdkError::SessionExpired(format!("Session {} not found.", session_id))
    })?;

    ensure_session_active(&session, opts.now())?;

    Ok(SessionUsage { session, opts })
}

/// Fail with `SessionExpired` unless the session is active and
/// `valid_after <= now < valid_until`.
pub fn ensure_session_active(session: &Session, now: u64) -> Result<()> {
    let policy = &session.policy;

    if !policy.active {
        return Err(SdkError::SessionExpired(format!(
            "Session {} is inactive.",
            session.id
        )));
    }
    if now < policy.valid_after {
        return Err(SdkError::SessionExpired(format!(
            "Session {} not active until {}.",
            session.id, policy.valid_after
        )));
    }
    if policy.valid_until <= now {
        return Err(SdkError::SessionExpired(format!(
            "Session {} expired at {}.",
            session.id, policy.valid_until
        )));
    }
    Ok(())
}

/// Check a batch against the session's call cap and allowlists.
/// The first violation found is returned.
pub fn ensure_policy(session: &Session, calls: &[AccountCall]) -> Result<()> {
    let policy = &session.policy;
    let max_calls = policy.limits.max_calls as usize;

    if calls.len() > max_calls {
        debug!(session_id = %session.id, calls = calls.len(), max_calls, "Call cap exceeded");
        return Err(SdkError::policy_violation(
            PolicyViolationKind::Calls,
            Some(format!("{} > {}", calls.len(), max_calls)),
        ));
    }

    for call in calls {
        if !policy.allows_target(&call.to) {
            debug!(session_id = %session.id, target = %call.to, "Target not allowlisted");
            return Err(SdkError::policy_violation(
                PolicyViolationKind::Target,
                Some(call.to.to_string()),
            ));
        }
        if !policy.allows_selector(&call.selector) {
            debug!(session_id = %session.id, selector = %call.selector, "Selector not allowlisted");
            return Err(SdkError::policy_violation(
                PolicyViolationKind::Selector,
                Some(call.selector.to_string()),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::policy::{guard, GuardInit};
    use crate::types::SessionPolicy;
    use crate::utils::to_felt;
    use proptest::prelude::*;

    fn felt(s: &str) -> Felt {
        to_felt(s).unwrap()
    }

    fn session(policy: SessionPolicy) -> Session {
        Session {
            id: felt("0x5e55"),
            pubkey: felt("0x5e55"),
            policy,
            created_at: 0,
        }
    }

    fn window_policy(max_calls: i64) -> SessionPolicy {
        guard(GuardInit {
            valid_after: Some(100),
            valid_until: Some(200),
            max_calls: Some(max_calls),
            ..Default::default()
        })
        .build()
        .unwrap()
    }

    fn call(to: &str, selector: &str) -> AccountCall {
        AccountCall::new(felt(to), felt(selector), vec![])
    }

    #[test]
    fn test_liveness_window_bounds() {
        let s = session(window_policy(1));
        assert!(ensure_session_active(&s, 99).is_err());
        assert!(ensure_session_active(&s, 100).is_ok());
        assert!(ensure_session_active(&s, 199).is_ok());
        assert!(ensure_session_active(&s, 200).is_err());
    }

    #[test]
    fn test_inactive_session_fails_liveness() {
        let mut policy = window_policy(1);
        policy.active = false;
        let err = ensure_session_active(&session(policy), 150).unwrap_err();
        assert!(matches!(err, SdkError::SessionExpired(ref m) if m.contains("inactive")));
    }

    #[test]
    fn test_call_cap_boundary() {
        let s = session(window_policy(2));
        let batch = vec![call("0x1", "0x2"); 2];
        assert!(ensure_policy(&s, &batch).is_ok());

        let batch = vec![call("0x1", "0x2"); 3];
        let err = ensure_policy(&s, &batch).unwrap_err();
        assert_eq!(err.policy_kind(), Some(PolicyViolationKind::Calls));
    }

    #[test]
    fn test_empty_allowlists_allow_anything() {
        let s = session(window_policy(5));
        let batch = vec![call("0xabc", "0x1"), call("0xdef", "0x2")];
        assert!(ensure_policy(&s, &batch).is_ok());
    }

    #[test]
    fn test_target_allowlist() {
        let mut policy = window_policy(5);
        policy.allow.targets = vec![felt("0xdead")];
        let s = session(policy);

        assert!(ensure_policy(&s, &[call("0xDEAD", "0x1")]).is_ok());
        let err = ensure_policy(&s, &[call("0xdead", "0x1"), call("0xbeef", "0x1")]).unwrap_err();
        assert_eq!(err.policy_kind(), Some(PolicyViolationKind::Target));
        assert!(matches!(err, SdkError::PolicyViolation { ref detail, .. } if detail.as_deref() == Some("0xbeef")));
    }

    #[test]
    fn test_selector_allowlist() {
        let mut policy = window_policy(5);
        policy.allow.selectors = vec![felt("0x1234")];
        let s = session(policy);

        assert!(ensure_policy(&s, &[call("0x9", "0x1234")]).is_ok());
        let err = ensure_policy(&s, &[call("0x9", "0x5678")]).unwrap_err();
        assert_eq!(err.policy_kind(), Some(PolicyViolationKind::Selector));
    }

    #[test]
    fn test_first_violation_wins() {
        let mut policy = window_policy(1);
        policy.allow.targets = vec![felt("0xdead")];
        policy.allow.selectors = vec![felt("0x1234")];
        let s = session(policy);

        // Cap is checked before allowlists
        let err = ensure_policy(&s, &[call("0xbad", "0xbad"), call("0xbad", "0xbad")]).unwrap_err();
        assert_eq!(err.policy_kind(), Some(PolicyViolationKind::Calls));

        // Target is checked before selector on the same call
        let err = ensure_policy(&s, &[call("0xbad", "0xbad")]).unwrap_err();
        assert_eq!(err.policy_kind(), Some(PolicyViolationKind::Target));
    }

    #[tokio::test]
    async fn test_use_session_rechecks_liveness() {
        let mut store = SessionStore::new();
        let created = store.create(window_policy(2)).await.unwrap();

        let usage = use_session(&store, &created.id, SessionUseOptions::at(150)).unwrap();
        assert_eq!(usage.session().id, created.id);
        assert!(usage.ensure_call_allowed(&call("0x1", "0x2")).is_ok());

        // The handle keeps its own snapshot; a later clock shows expiry
        let late = use_session(&store, &created.id, SessionUseOptions::at(150))
            .map(|u| SessionUsage {
                opts: SessionUseOptions::at(250),
                ..u
            })
            .unwrap();
        let err = late.ensure_allowed(&[call("0x1", "0x2")]).unwrap_err();
        assert!(matches!(err, SdkError::SessionExpired(_)));
    }

    #[tokio::test]
    async fn test_use_session_rejects_dead_sessions() {
        let mut store = SessionStore::new();
        let created = store.create(window_policy(2)).await.unwrap();

        let err = use_session(&store, &created.id, SessionUseOptions::at(50)).unwrap_err();
        assert!(matches!(err, SdkError::SessionExpired(_)));

        store.revoke(&created.id);
        let err = use_session(&store, &created.id, SessionUseOptions::at(150)).unwrap_err();
        assert!(matches!(err, SdkError::SessionExpired(ref m) if m.contains("inactive")));
    }

    proptest! {
        #[test]
        fn prop_cap_enforced_at_boundary(n in 1u32..64) {
            let s = session(window_policy(n as i64));
            let ok = vec![call("0x1", "0x2"); n as usize];
            let over = vec![call("0x1", "0x2"); n as usize + 1];
            prop_assert!(ensure_policy(&s, &ok).is_ok());
            let err = ensure_policy(&s, &over).unwrap_err();
            prop_assert_eq!(err.policy_kind(), Some(PolicyViolationKind::Calls));
        }

        #[test]
        fn prop_dead_sessions_fail_regardless_of_calls(
            now in 0u64..400,
            active in any::<bool>(),
            batch in 0usize..5,
        ) {
            let mut policy = window_policy(1);
            policy.active = active;
            let s = session(policy);
            let live = active && (100..200).contains(&now);
            prop_assert_eq!(ensure_session_active(&s, now).is_ok(), live);
            if !live {
                let usage = SessionUsage { session: s, opts: SessionUseOptions::at(now) };
                let calls = vec![call("0x1", "0x2"); batch];
                let err = usage.ensure_allowed(&calls).unwrap_err();
                prop_assert!(matches!(err, SdkError::SessionExpired(_)));
            }
        }
    }
}
