use crate::core::constants::DEFAULT_SESSION_TTL_SECS;
use crate::error::{Result, SdkError};
use crate::types::{Felt, SessionAllow, SessionLimits, SessionPolicy, Uint256};
use crate::utils::{to_uint256, unix_now, ToFelt, ToUint256};

/// Initial values for [`guard`]. Every field is optional.
///
/// Expiry precedence: `valid_until`, then `expires_at`, then
/// `expires_in_seconds`, then one hour from `now`.
#[derive(Debug, Clone, Default)]
pub struct GuardInit {
    pub valid_after: Option<i64>,
    pub valid_until: Option<i64>,
    /// Legacy alias for `valid_until`
    pub expires_at: Option<i64>,
    pub expires_in_seconds: Option<i64>,
    pub max_calls: Option<i64>,
    /// Decimal or `0x` hex amount
    pub max_value: Option<String>,
    pub targets: Vec<Felt>,
    pub selectors: Vec<Felt>,
    pub active: Option<bool>,
    /// Reference time in seconds; wall clock when unset
    pub now: Option<u64>,
}

/// Fluent builder for a [`SessionPolicy`].
///
/// Timestamps are seconds since epoch. Negative inputs clamp to zero and
/// `valid_until` is always kept strictly after `valid_after`.
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    clock: Option<u64>,
    valid_after: u64,
    valid_until: u64,
    max_calls: u32,
    max_value: Uint256,
    targets: Vec<Felt>,
    selectors: Vec<Felt>,
    active: bool,
    error: Option<SdkError>,
}

/// Start a policy builder from `init`.
pub fn guard(init: GuardInit) -> PolicyBuilder {
    PolicyBuilder::from_init(init)
}

/// Convenience for hand-built policies: cap plus max value per call.
pub fn limits(max_calls: u32, max_value: impl ToUint256) -> Result<SessionLimits> {
    Ok(SessionLimits {
        max_calls: max_calls.max(1),
        max_value_per_call: to_uint256(max_value)?,
    })
}

fn clamp_timestamp(ts: i64) -> u64 {
    ts.max(0) as u64
}

fn clamp_calls(count: i64) -> u32 {
    count.clamp(1, u32::MAX as i64) as u32
}

fn normalize_valid_until(value: u64, valid_after: u64) -> u64 {
    if value <= valid_after {
        valid_after.saturating_add(1)
    } else {
        value
    }
}

fn push_unique(list: &mut Vec<Felt>, felt: Felt) {
    if !list.contains(&felt) {
        list.push(felt);
    }
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self::from_init(GuardInit::default())
    }

    pub fn from_init(init: GuardInit) -> Self {
        let clock = init.now;
        let now = clock.unwrap_or_else(unix_now);
        let valid_after = clamp_timestamp(init.valid_after.unwrap_or(0));

        let requested_until = if let Some(ts) = init.valid_until {
            clamp_timestamp(ts)
        } else if let Some(ts) = init.expires_at {
            clamp_timestamp(ts)
        } else if let Some(secs) = init.expires_in_seconds {
            now.saturating_add(clamp_timestamp(secs))
        } else {
            now.saturating_add(DEFAULT_SESSION_TTL_SECS)
        };

        let mut builder = Self {
            clock,
            valid_after,
            valid_until: normalize_valid_until(requested_until, valid_after),
            max_calls: clamp_calls(init.max_calls.unwrap_or(1)),
            max_value: Uint256::default(),
            targets: Vec::new(),
            selectors: Vec::new(),
            active: init.active.unwrap_or(true),
            error: None,
        };

        if let Some(value) = init.max_value {
            builder = builder.max_value(value);
        }
        for target in init.targets {
            push_unique(&mut builder.targets, target);
        }
        for selector in init.selectors {
            push_unique(&mut builder.selectors, selector);
        }
        builder
    }

    fn now(&self) -> u64 {
        self.clock.unwrap_or_else(unix_now)
    }

    fn record<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.error.get_or_insert(e);
                None
            },
        }
    }

    /// Also pushes `valid_until` forward if the window would become empty.
    pub fn valid_after(mut self, timestamp: i64) -> Self {
        self.valid_after = clamp_timestamp(timestamp);
        self.valid_until = self.valid_until.max(self.valid_after.saturating_add(1));
        self
    }

    pub fn valid_until(mut self, timestamp: i64) -> Self {
        self.valid_until = normalize_valid_until(clamp_timestamp(timestamp), self.valid_after);
        self
    }

    /// Alias for [`PolicyBuilder::valid_until`].
    pub fn expires_at(self, timestamp: i64) -> Self {
        self.valid_until(timestamp)
    }

    pub fn expires_in(mut self, seconds: i64) -> Self {
        let until = self.now().saturating_add(clamp_timestamp(seconds));
        self.valid_until = normalize_valid_until(until, self.valid_after);
        self
    }

    pub fn target(mut self, addr: impl ToFelt) -> Self {
        if let Some(felt) = self.record(addr.to_felt()) {
            push_unique(&mut self.targets, felt);
        }
        self
    }

    pub fn targets<T: ToFelt>(mut self, addresses: impl IntoIterator<Item = T>) -> Self {
        for addr in addresses {
            self = self.target(addr);
        }
        self
    }

    pub fn selector(mut self, sel: impl ToFelt) -> Self {
        if let Some(felt) = self.record(sel.to_felt()) {
            push_unique(&mut self.selectors, felt);
        }
        self
    }

    pub fn selectors<T: ToFelt>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        for sel in values {
            self = self.selector(sel);
        }
        self
    }

    pub fn max_calls(mut self, count: i64) -> Self {
        self.max_calls = clamp_calls(count);
        self
    }

    pub fn max_value(mut self, value: impl ToUint256) -> Self {
        if let Some(v) = self.record(value.to_uint256()) {
            self.max_value = v;
        }
        self
    }

    pub fn active(mut self, flag: bool) -> Self {
        self.active = flag;
        self
    }

    /// Build the policy. Fails with the first encoding error recorded by any
    /// earlier call.
    pub fn build(&self) -> Result<SessionPolicy> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }

        Ok(SessionPolicy {
            valid_after: self.valid_after,
            valid_until: self.valid_until,
            limits: SessionLimits {
                max_calls: self.max_calls,
                max_value_per_call: self.max_value,
            },
            allow: SessionAllow {
                targets: self.targets.clone(),
                selectors: self.selectors.clone(),
            },
            active: self.active,
            calls_used: 0,
        })
    }
}
