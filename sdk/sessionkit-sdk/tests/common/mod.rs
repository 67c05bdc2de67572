#![allow(dead_code)]

use async_trait::async_trait;
use sessionkit_sdk::{
    AccountTransaction, CallTransport, Felt, InvokeResult, PaymasterAdapter, Result, SdkError,
    SponsoredTransaction,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// One recorded `invoke`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub address: Felt,
    pub entrypoint: String,
    pub calldata: Vec<Felt>,
}

impl Invocation {
    pub fn calldata_hex(&self) -> Vec<String> {
        self.calldata.iter().map(|f| f.to_string()).collect()
    }
}

/// Transport that records every invoke and answers with sequential hashes.
#[derive(Default)]
pub struct RecordingTransport {
    invocations: Mutex<Vec<Invocation>>,
    fail_with: Option<SdkError>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport whose every invoke fails with `err`.
    pub fn failing(err: SdkError) -> Arc<Self> {
        Arc::new(Self {
            invocations: Mutex::new(Vec::new()),
            fail_with: Some(err),
        })
    }

    pub async fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().await.clone()
    }

    pub async fn last(&self) -> anyhow::Result<Invocation> {
        self.invocations
            .lock()
            .await
            .last()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no invocation recorded"))
    }
}

#[async_trait]
impl CallTransport for RecordingTransport {
    async fn invoke(
        &self,
        address: &Felt,
        entrypoint: &str,
        calldata: &[Felt],
    ) -> Result<InvokeResult> {
        let mut invocations = self.invocations.lock().await;
        invocations.push(Invocation {
            address: *address,
            entrypoint: entrypoint.to_string(),
            calldata: calldata.to_vec(),
        });
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(InvokeResult {
            tx_hash: Felt::from(0x1000 + invocations.len() as u64),
        })
    }
}

/// Paymaster that appends fixed sponsor data.
pub struct DataPaymaster {
    pub name: String,
    pub data: Vec<Felt>,
}

#[async_trait]
impl PaymasterAdapter for DataPaymaster {
    fn name(&self) -> &str {
        &self.name
    }

    async fn sponsor(&self, tx: AccountTransaction) -> Result<SponsoredTransaction> {
        Ok(SponsoredTransaction {
            sponsor_data: Some(self.data.clone()),
            sponsor_name: Some(self.name.clone()),
            ..tx.into()
        })
    }
}

/// Paymaster that passes the transaction through without decorating it.
pub struct SilentPaymaster;

#[async_trait]
impl PaymasterAdapter for SilentPaymaster {
    fn name(&self) -> &str {
        "silent"
    }

    async fn sponsor(&self, tx: AccountTransaction) -> Result<SponsoredTransaction> {
        Ok(tx.into())
    }
}

/// Paymaster that refuses every transaction.
pub struct DenyingPaymaster;

#[async_trait]
impl PaymasterAdapter for DenyingPaymaster {
    fn name(&self) -> &str {
        "deny"
    }

    async fn sponsor(&self, _tx: AccountTransaction) -> Result<SponsoredTransaction> {
        Err(SdkError::PaymasterDenied("sponsor budget exhausted".to_string()))
    }
}

pub fn felt(value: &str) -> Felt {
    sessionkit_sdk::to_felt(value).unwrap()
}

pub fn hex(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
