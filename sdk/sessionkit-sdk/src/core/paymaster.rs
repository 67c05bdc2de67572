use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AccountTransaction, SponsoredTransaction};

/// Abstraction for a third party that sponsors account transactions.
/// This allows the SDK to work with:
/// 1. Local no-op adapters (tests, opt-in toggles)
/// 2. Remote paymaster services that set fee caps or attach sponsor data
#[async_trait]
pub trait PaymasterAdapter: Send + Sync {
    fn name(&self) -> &str;

    /// Decorate a transaction.
    /// May return it unchanged, or fail with `SdkError::PaymasterDenied`.
    async fn sponsor(&self, tx: AccountTransaction) -> Result<SponsoredTransaction>;
}
