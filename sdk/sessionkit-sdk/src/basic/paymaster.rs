use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::advanced::calldata;
use crate::core::connection::CallTransport;
use crate::core::constants::DEFAULT_EXECUTE_ENTRYPOINT;
use crate::core::paymaster::PaymasterAdapter;
use crate::error::{Result, SdkError};
use crate::types::{AccountCall, AccountTransaction, Felt, SponsoredExecuteResult, SponsoredTransaction};

/// Paymaster that sponsors nothing: the transaction goes through unchanged,
/// tagged with the adapter's name.
#[derive(Debug, Clone)]
pub struct NoopPaymaster {
    name: String,
}

impl Default for NoopPaymaster {
    fn default() -> Self {
        Self::new()
    }
}

impl NoopPaymaster {
    pub fn new() -> Self {
        Self::named("noop")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl PaymasterAdapter for NoopPaymaster {
    fn name(&self) -> &str {
        &self.name
    }

    async fn sponsor(&self, tx: AccountTransaction) -> Result<SponsoredTransaction> {
        Ok(SponsoredTransaction {
            sponsor_name: Some(self.name.clone()),
            ..tx.into()
        })
    }
}

/// Resolve a paymaster adapter from an id such as `noop`, `cartridge:game`
/// or `starknet-react`. The part before the first `:` selects the adapter
/// (case-insensitive); the rest is kept as a tag in the adapter name.
pub fn paymaster_from(id: &str) -> Result<Arc<dyn PaymasterAdapter>> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(SdkError::PaymasterDenied(
            "Paymaster id must be a non-empty string.".to_string(),
        ));
    }

    let (base, tag) = match trimmed.split_once(':') {
        Some((base, tag)) => (base.to_lowercase(), Some(tag)),
        None => (trimmed.to_lowercase(), None),
    };

    let name = match base.as_str() {
        "noop" | "cartridge" | "starknet-react" => match tag {
            Some(tag) => format!("{}:{}", base, tag),
            None => base.clone(),
        },
        _ => {
            return Err(SdkError::PaymasterDenied(format!(
                "Unknown paymaster adapter: {}",
                id
            )))
        },
    };

    Ok(Arc::new(NoopPaymaster::named(name)))
}

/// Runs call batches through a paymaster and submits them to the account's
/// execute entrypoint.
#[derive(Clone)]
pub struct PaymasterRunner {
    transport: Arc<dyn CallTransport>,
    account_address: Felt,
    paymaster: Arc<dyn PaymasterAdapter>,
    entrypoint: String,
}

impl PaymasterRunner {
    pub fn new(
        transport: Arc<dyn CallTransport>,
        account_address: Felt,
        paymaster: Arc<dyn PaymasterAdapter>,
    ) -> Self {
        Self {
            transport,
            account_address,
            paymaster,
            entrypoint: DEFAULT_EXECUTE_ENTRYPOINT.to_string(),
        }
    }

    pub fn with_entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.entrypoint = entrypoint.into();
        self
    }

    pub fn paymaster(&self) -> &Arc<dyn PaymasterAdapter> {
        &self.paymaster
    }

    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    pub fn account_address(&self) -> &Felt {
        &self.account_address
    }

    /// Sponsor, encode and submit a batch.
    ///
    /// Paymaster and transport errors are returned unchanged; there is no retry
    /// and no unsponsored fallback.
    pub async fn execute(
        &self,
        calls: Vec<AccountCall>,
        max_fee: Option<Felt>,
    ) -> Result<SponsoredExecuteResult> {
        let batch = AccountTransaction::new(calls, max_fee);
        let num_calls = batch.calls.len();

        let sponsored = self.paymaster.sponsor(batch).await?;
        let sponsored_flag = sponsored.is_decorated();
        debug!(
            paymaster = self.paymaster.name(),
            calls = num_calls,
            sponsor_data = sponsored.sponsor_data().len(),
            sponsored = sponsored_flag,
            "Paymaster returned transaction"
        );

        let call_data = calldata::encode_execute(&sponsored);
        let result = self
            .transport
            .invoke(&self.account_address, &self.entrypoint, &call_data)
            .await?;

        let sponsor_name = sponsored
            .sponsor_name
            .unwrap_or_else(|| self.paymaster.name().to_string());
        info!(
            account = %self.account_address,
            entrypoint = %self.entrypoint,
            tx_hash = %result.tx_hash,
            sponsor = %sponsor_name,
            sponsored = sponsored_flag,
            "Executed sponsored batch"
        );

        Ok(SponsoredExecuteResult {
            tx_hash: result.tx_hash,
            sponsored: sponsored_flag,
            sponsor_name,
        })
    }

    /// Single-call form of [`PaymasterRunner::execute`].
    pub async fn call(
        &self,
        to: Felt,
        selector: Felt,
        calldata: Vec<Felt>,
        max_fee: Option<Felt>,
    ) -> Result<SponsoredExecuteResult> {
        self.execute(vec![AccountCall::new(to, selector, calldata)], max_fee)
            .await
    }
}
