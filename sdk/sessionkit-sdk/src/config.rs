use serde::{Deserialize, Serialize};

use crate::error::{Result, SdkError};
use crate::types::Felt;

/// Static description of an account, typically loaded from JSON.
///
/// ```json
/// {
///   "address": "0xacc0",
///   "chain_id": "SN_SEPOLIA",
///   "contract_address": "0xc0ffee",
///   "entrypoint": "__execute__"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub address: Felt,
    #[serde(default)]
    pub chain_id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub contract_address: Option<Felt>,
    #[serde(default)]
    pub entrypoint: Option<String>,
}

impl AccountConfig {
    pub fn new(address: Felt) -> Self {
        Self {
            address,
            chain_id: None,
            label: None,
            contract_address: None,
            entrypoint: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(entrypoint) = &self.entrypoint {
            if entrypoint.trim().is_empty() {
                return Err(SdkError::Config("entrypoint must not be empty".to_string()));
            }
        }
        Ok(())
    }
}
