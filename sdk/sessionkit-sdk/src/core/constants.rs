/// Account entrypoint that registers a session key with its allowlists.
pub const ADD_SESSION_ENTRYPOINT: &str = "add_session_with_allowlists";

/// Account entrypoint that revokes a session key on-chain.
pub const REVOKE_SESSION_ENTRYPOINT: &str = "revoke_session";

// Default execute entrypoint of the account contract
pub const DEFAULT_EXECUTE_ENTRYPOINT: &str = "__execute__";

/// Lifetime given to a policy built without any expiry input.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
