use std::sync::Arc;

use crate::basic::paymaster::PaymasterRunner;
use crate::basic::sessions::SessionStore;
use crate::config::AccountConfig;
use crate::core::connection::CallTransport;
use crate::core::constants::DEFAULT_EXECUTE_ENTRYPOINT;
use crate::core::paymaster::PaymasterAdapter;
use crate::error::{Result, SdkError};
use crate::types::Felt;

/// Per-call overrides for [`SmartAccount::with_paymaster`].
#[derive(Clone, Default)]
pub struct PaymasterContext {
    pub transport: Option<Arc<dyn CallTransport>>,
    pub account_address: Option<Felt>,
    pub entrypoint: Option<String>,
}

/// A connected smart-contract account and the optional capabilities it
/// came with.
#[derive(Clone)]
pub struct SmartAccount {
    /// Account address
    pub address: Felt,

    /// Chain id reported by the provider
    pub chain_id: Option<String>,

    /// Human label for diagnostics
    pub label: Option<String>,

    /// Transport able to submit invokes for this account
    pub transport: Option<Arc<dyn CallTransport>>,

    /// Session-enabled account contract, when different from `address`
    pub contract_address: Option<Felt>,

    /// Execute entrypoint override
    pub entrypoint: Option<String>,
}

impl SmartAccount {
    /// Construct an account with no transport or overrides.
    pub fn new(address: Felt) -> Self {
        Self {
            address,
            chain_id: None,
            label: None,
            transport: None,
            contract_address: None,
            entrypoint: None,
        }
    }

    pub fn from_config(config: AccountConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            address: config.address,
            chain_id: config.chain_id,
            label: config.label,
            transport: None,
            contract_address: config.contract_address,
            entrypoint: config.entrypoint,
        })
    }

    pub fn with_transport(mut self, transport: Arc<dyn CallTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_contract_address(mut self, address: Felt) -> Self {
        self.contract_address = Some(address);
        self
    }

    pub fn with_entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.entrypoint = Some(entrypoint.into());
        self
    }

    /// Address that receives session and execute calls.
    pub fn target_address(&self) -> Felt {
        self.contract_address.unwrap_or(self.address)
    }

    pub fn entrypoint(&self) -> &str {
        self.entrypoint
            .as_deref()
            .unwrap_or(DEFAULT_EXECUTE_ENTRYPOINT)
    }

    /// New session store bound to this account. Without a transport the
    /// store is local-only.
    pub fn sessions(&self) -> SessionStore {
        SessionStore::from_parts(self.transport.clone(), Some(self.target_address()))
    }

    /// Paymaster-backed executor for this account.
    ///
    /// `ctx` fields take precedence over the account's own. Fails with
    /// `PaymasterDenied` when no transport is available.
    pub fn with_paymaster(
        &self,
        paymaster: Arc<dyn PaymasterAdapter>,
        ctx: PaymasterContext,
    ) -> Result<PaymasterRunner> {
        let transport = ctx
            .transport
            .or_else(|| self.transport.clone())
            .ok_or_else(|| {
                SdkError::PaymasterDenied(
                    "Account is missing a CallTransport for paymaster execution.".to_string(),
                )
            })?;
        let address = ctx.account_address.unwrap_or_else(|| self.target_address());
        let entrypoint = ctx
            .entrypoint
            .unwrap_or_else(|| self.entrypoint().to_string());

        Ok(PaymasterRunner::new(transport, address, paymaster).with_entrypoint(entrypoint))
    }
}
