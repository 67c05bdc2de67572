use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::SdkError;

/// A field element, always rendered in canonical form: lowercase, `0x`-prefixed,
/// no leading zeros (`0x0` for zero).
///
/// Equality and hashing are on the numeric value, so `"0xDEAD"` and `"0x00dead"`
/// parse to the same `Felt`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Felt(U256);

impl Felt {
    pub const ZERO: Felt = Felt(U256::ZERO);

    pub const fn from_u256(value: U256) -> Self {
        Felt(value)
    }

    pub fn value(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Hex digits without prefix and without leading zeros.
    pub(crate) fn hex_body(&self) -> String {
        let raw = format!("{:x}", self.0);
        let trimmed = raw.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.hex_body())
    }
}

impl fmt::Debug for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Felt({})", self)
    }
}

impl FromStr for Felt {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::utils::to_felt(s)
    }
}

impl From<U256> for Felt {
    fn from(value: U256) -> Self {
        Felt(value)
    }
}

impl From<bool> for Felt {
    fn from(value: bool) -> Self {
        Felt(U256::from(value as u8))
    }
}

macro_rules! felt_from_uint {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Felt {
                fn from(value: $t) -> Self {
                    Felt(U256::from(value))
                }
            }
        )*
    };
}

felt_from_uint!(u8, u16, u32, u64, u128, usize);

impl Serialize for Felt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        crate::utils::to_felt(s.as_str()).map_err(serde::de::Error::custom)
    }
}

/// 256-bit value split into two felts: `low + high * 2^128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Uint256 {
    pub low: Felt,
    pub high: Felt,
}

impl Uint256 {
    pub fn new(low: Felt, high: Felt) -> Self {
        Self { low, high }
    }

    /// Recombine the limbs.
    pub fn to_u256(&self) -> U256 {
        self.low.value() | (self.high.value() << 128usize)
    }

    pub fn is_zero(&self) -> bool {
        self.low.is_zero() && self.high.is_zero()
    }
}

/// Single call made by the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCall {
    pub to: Felt,
    pub selector: Felt,
    #[serde(default)]
    pub calldata: Vec<Felt>,
}

impl AccountCall {
    pub fn new(to: Felt, selector: Felt, calldata: Vec<Felt>) -> Self {
        Self {
            to,
            selector,
            calldata,
        }
    }
}

/// Batch of calls executed by the account in one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountTransaction {
    pub calls: Vec<AccountCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee: Option<Felt>,
}

impl AccountTransaction {
    pub fn new(calls: Vec<AccountCall>, max_fee: Option<Felt>) -> Self {
        Self { calls, max_fee }
    }
}

/// A transaction after a paymaster has looked at it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SponsoredTransaction {
    pub calls: Vec<AccountCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee: Option<Felt>,
    /// Opaque to the account; appended after the calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor_data: Option<Vec<Felt>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor_name: Option<String>,
}

impl SponsoredTransaction {
    pub fn sponsor_data(&self) -> &[Felt] {
        self.sponsor_data.as_deref().unwrap_or(&[])
    }

    /// True when the sponsor attached data, a name or a fee cap.
    pub fn is_decorated(&self) -> bool {
        !self.sponsor_data().is_empty() || self.sponsor_name.is_some() || self.max_fee.is_some()
    }
}

impl From<AccountTransaction> for SponsoredTransaction {
    fn from(tx: AccountTransaction) -> Self {
        Self {
            calls: tx.calls,
            max_fee: tx.max_fee,
            sponsor_data: None,
            sponsor_name: None,
        }
    }
}

/// Returned by the transport after submitting an invoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeResult {
    pub tx_hash: Felt,
}

/// Outcome of a paymaster-backed execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsoredExecuteResult {
    pub tx_hash: Felt,
    pub sponsored: bool,
    /// Name set by the sponsor, else the adapter's name
    pub sponsor_name: String,
}

/// Caps attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLimits {
    /// Max number of calls in one batch
    pub max_calls: u32,
    /// Max value per call, as (low, high) limbs
    pub max_value_per_call: Uint256,
}

/// Allowlists attached to a session. Empty means unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionAllow {
    #[serde(default)]
    pub targets: Vec<Felt>,
    #[serde(default)]
    pub selectors: Vec<Felt>,
}

/// Constraints for one session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPolicy {
    /// Earliest usable timestamp (seconds since epoch)
    pub valid_after: u64,
    /// Expiration timestamp (seconds since epoch), exclusive
    pub valid_until: u64,
    pub limits: SessionLimits,
    #[serde(default)]
    pub allow: SessionAllow,
    pub active: bool,
    /// Local mirror of the on-chain counter; the chain is authoritative.
    #[serde(default)]
    pub calls_used: u32,
}

impl SessionPolicy {
    /// Latest start time that still leaves room for a non-empty window.
    pub const MAX_VALID_AFTER: u64 = u64::MAX - 1;

    /// `(valid_after, valid_until)` with `valid_until > valid_after`.
    /// `valid_after` is capped at [`SessionPolicy::MAX_VALID_AFTER`].
    pub fn window(&self) -> (u64, u64) {
        let valid_after = self.valid_after.min(Self::MAX_VALID_AFTER);
        let valid_until = if self.valid_until <= valid_after {
            valid_after + 1
        } else {
            self.valid_until
        };
        (valid_after, valid_until)
    }

    /// Enforce `valid_until > valid_after` and `max_calls >= 1`.
    pub fn normalized(mut self) -> Self {
        (self.valid_after, self.valid_until) = self.window();
        self.limits.max_calls = self.limits.max_calls.max(1);
        self
    }

    pub fn allows_target(&self, target: &Felt) -> bool {
        self.allow.targets.is_empty() || self.allow.targets.contains(target)
    }

    pub fn allows_selector(&self, selector: &Felt) -> bool {
        self.allow.selectors.is_empty() || self.allow.selectors.contains(selector)
    }
}

/// A session key registered for the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Assigned once at creation; equal to `pubkey`.
    pub id: Felt,
    pub pubkey: Felt,
    pub policy: SessionPolicy,
    /// Creation time (seconds since epoch)
    pub created_at: u64,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.policy.active
    }
}
