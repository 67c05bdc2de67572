use crate::types::{AccountCall, Felt, SessionPolicy, SponsoredTransaction};

/// The account's `SessionPolicy` struct, field for field, in on-chain order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyCalldata {
    pub is_active: Felt,
    pub valid_after: Felt,
    pub valid_until: Felt,
    pub max_calls: Felt,
    pub calls_used: Felt,
    pub max_value_per_call_low: Felt,
    pub max_value_per_call_high: Felt,
}

impl PolicyCalldata {
    /// Shape a policy for the account. The window is normalized so that
    /// `valid_until > valid_after` even for hand-built policies.
    pub fn from_policy(policy: &SessionPolicy) -> Self {
        let (valid_after, valid_until) = policy.window();

        Self {
            is_active: Felt::from(policy.active),
            valid_after: Felt::from(valid_after),
            valid_until: Felt::from(valid_until),
            max_calls: Felt::from(policy.limits.max_calls),
            calls_used: Felt::ZERO,
            max_value_per_call_low: policy.limits.max_value_per_call.low,
            max_value_per_call_high: policy.limits.max_value_per_call.high,
        }
    }

    /// Full struct layout:
    /// `[is_active, valid_after, valid_until, max_calls, calls_used, low, high]`
    pub fn to_felts(&self) -> Vec<Felt> {
        vec![
            self.is_active,
            self.valid_after,
            self.valid_until,
            self.max_calls,
            self.calls_used,
            self.max_value_per_call_low,
            self.max_value_per_call_high,
        ]
    }
}

/// Target and selector allowlists, in the order they will be written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllowCalldata {
    pub targets: Vec<Felt>,
    pub selectors: Vec<Felt>,
}

impl AllowCalldata {
    pub fn from_policy(policy: &SessionPolicy) -> Self {
        Self {
            targets: policy.allow.targets.clone(),
            selectors: policy.allow.selectors.clone(),
        }
    }
}

fn push_array(out: &mut Vec<Felt>, items: &[Felt]) {
    out.push(Felt::from(items.len()));
    out.extend_from_slice(items);
}

/// Calldata for `add_session_with_allowlists`.
///
/// # Layout
/// ```text
/// [session_key,
///  valid_after, valid_until, max_calls, max_value_low, max_value_high,
///  targets_len, ...targets,
///  selectors_len, ...selectors]
/// ```
/// `is_active` and `calls_used` are owned by the account and not sent.
pub fn encode_add_session(session_key: &Felt, policy: &SessionPolicy) -> Vec<Felt> {
    let shaped = PolicyCalldata::from_policy(policy);
    let allow = AllowCalldata::from_policy(policy);

    let mut out = Vec::with_capacity(8 + allow.targets.len() + allow.selectors.len());
    out.push(*session_key);
    out.extend_from_slice(&[
        shaped.valid_after,
        shaped.valid_until,
        shaped.max_calls,
        shaped.max_value_per_call_low,
        shaped.max_value_per_call_high,
    ]);
    push_array(&mut out, &allow.targets);
    push_array(&mut out, &allow.selectors);
    out
}

/// Calldata for `revoke_session`.
pub fn encode_revoke_session(session_id: &Felt) -> Vec<Felt> {
    vec![*session_id]
}

/// Calldata for the account's execute entrypoint.
///
/// # Layout
/// ```text
/// [num_calls,
///  to_0, selector_0, len_0, ...calldata_0,
///  ...,
///  sponsor_len, ...sponsor_data]
/// ```
pub fn encode_calls(calls: &[AccountCall], sponsor_data: &[Felt]) -> Vec<Felt> {
    let mut out = Vec::new();
    out.push(Felt::from(calls.len()));
    for call in calls {
        out.push(call.to);
        out.push(call.selector);
        push_array(&mut out, &call.calldata);
    }
    push_array(&mut out, sponsor_data);
    out
}

/// Execute calldata for a sponsored transaction.
pub fn encode_execute(tx: &SponsoredTransaction) -> Vec<Felt> {
    encode_calls(&tx.calls, tx.sponsor_data())
}
