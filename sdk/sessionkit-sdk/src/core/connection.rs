use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Felt, InvokeResult};

/// Submits invokes against an account contract.
///
/// This is the SDK's only path to the network. Implementations wrap a wallet
/// provider or an RPC account; tests use an in-memory recorder.
/// Errors are returned to the caller as-is.
#[async_trait]
pub trait CallTransport: Send + Sync {
    async fn invoke(
        &self,
        address: &Felt,
        entrypoint: &str,
        calldata: &[Felt],
    ) -> Result<InvokeResult>;
}
