use std::sync::Arc;

use tracing::{debug, info};

use crate::advanced::calldata;
use crate::basic::guard::{self, SessionUsage, SessionUseOptions};
use crate::core::connection::CallTransport;
use crate::core::constants::ADD_SESSION_ENTRYPOINT;
use crate::error::Result;
use crate::types::{Felt, Session, SessionPolicy};
use crate::utils::{gen_session_key, unix_now};

/// In-memory registry of the session keys issued for one account.
///
/// Sessions are appended and never removed. Callers get clones, never references
/// into the store. Mutating methods take `&mut self`, so concurrent writers must
/// be serialized by whoever owns the store.
pub struct SessionStore {
    transport: Option<Arc<dyn CallTransport>>,
    account_address: Option<Felt>,
    sessions: Vec<Session>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Local-only store: sessions are never sent on-chain.
    pub fn new() -> Self {
        Self {
            transport: None,
            account_address: None,
            sessions: Vec::new(),
        }
    }

    /// Store that registers each new session with the account contract at
    /// `account_address`.
    pub fn with_transport(transport: Arc<dyn CallTransport>, account_address: Felt) -> Self {
        Self {
            transport: Some(transport),
            account_address: Some(account_address),
            sessions: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        transport: Option<Arc<dyn CallTransport>>,
        account_address: Option<Felt>,
    ) -> Self {
        Self {
            transport,
            account_address,
            sessions: Vec::new(),
        }
    }

    /// Whether `create` will dispatch to the account contract.
    pub fn is_connected(&self) -> bool {
        self.transport.is_some() && self.account_address.is_some()
    }

    /// Issue a new session key for `policy`.
    ///
    /// With a transport and account address configured, the key is registered
    /// through `add_session_with_allowlists` first. A failed dispatch is returned
    /// unchanged and nothing is stored.
    pub async fn create(&mut self, policy: SessionPolicy) -> Result<Session> {
        let policy = SessionPolicy {
            calls_used: 0,
            ..policy.normalized()
        };
        let pubkey = gen_session_key();
        let call_data = calldata::encode_add_session(&pubkey, &policy);

        if let (Some(transport), Some(address)) = (&self.transport, &self.account_address) {
            let result = transport
                .invoke(address, ADD_SESSION_ENTRYPOINT, &call_data)
                .await?;
            info!(
                session_id = %pubkey,
                account = %address,
                tx_hash = %result.tx_hash,
                "Registered session key on-chain"
            );
        } else {
            debug!(session_id = %pubkey, "No transport configured; session kept local");
        }

        let session = Session {
            id: pubkey,
            pubkey,
            policy,
            created_at: unix_now(),
        };
        self.sessions.push(session.clone());

        info!(
            session_id = %session.id,
            valid_after = session.policy.valid_after,
            valid_until = session.policy.valid_until,
            max_calls = session.policy.limits.max_calls,
            targets = session.policy.allow.targets.len(),
            selectors = session.policy.allow.selectors.len(),
            "Session created"
        );
        Ok(session)
    }

    /// Deactivate a session locally. Unknown ids are ignored.
    ///
    /// The account contract is not called; use
    /// [`calldata::encode_revoke_session`] to revoke on-chain.
    pub fn revoke(&mut self, session_id: &Felt) {
        match self.sessions.iter_mut().find(|s| &s.id == session_id) {
            Some(session) => {
                session.policy.active = false;
                info!(session_id = %session_id, "Session revoked");
            },
            None => {
                debug!(session_id = %session_id, "Revoke ignored for unknown session");
            },
        }
    }

    /// Snapshot of all sessions, in creation order.
    pub fn list(&self) -> Vec<Session> {
        self.sessions.clone()
    }

    pub fn get(&self, session_id: &Felt) -> Option<Session> {
        self.sessions.iter().find(|s| &s.id == session_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Load a session for client-side policy enforcement.
    pub fn use_session(&self, session_id: &Felt, opts: SessionUseOptions) -> Result<SessionUsage> {
        guard::use_session(self, session_id, opts)
    }
}
