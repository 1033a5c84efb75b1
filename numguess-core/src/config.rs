use crate::error::{NumguessError, Result};
use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Address the lottery contract is deployed at.
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("0xfacebf5b8cc6576a118343df333b254d4cb16637");

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub contract_address: Address,
    pub chain_id: Option<u64>,
    /// Index into the wallet's accounts used as the active signer.
    pub account_index: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            chain_id: None,
            account_index: 0,
        }
    }
}

impl ClientConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Self::default()
        }
    }

    pub fn with_contract(mut self, contract_address: Address) -> Self {
        self.contract_address = contract_address;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() {
            return Err(NumguessError::config("RPC URL cannot be empty"));
        }

        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(NumguessError::config(format!(
                "RPC URL must be http(s): {}",
                self.rpc_url
            )));
        }

        if self.contract_address == Address::ZERO {
            return Err(NumguessError::config("Contract address cannot be zero"));
        }

        if self.chain_id == Some(0) {
            return Err(NumguessError::config("Chain id must be greater than 0"));
        }

        Ok(())
    }

    /// Load from `dir/config.json`, falling back to defaults when absent.
    pub async fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !tokio::fs::try_exists(&path).await? {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, dir: &Path) -> Result<()> {
        self.validate()?;
        tokio::fs::create_dir_all(dir).await?;
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(dir.join(CONFIG_FILE_NAME), content).await?;
        Ok(())
    }
}
