use clap::Args;
use dialoguer::Password;
use numguess_core::{Address, ClientConfig, NumguessError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding comma-separated signer keys.
pub const PRIVATE_KEYS_ENV: &str = "NUMGUESS_PRIVATE_KEYS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("numguess"),
            verbose: false,
        }
    }
}

impl CliConfig {
    pub fn new(data_dir: Option<PathBuf>, verbose: bool) -> Self {
        let mut config = Self::default();
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        config.verbose = verbose;
        config
    }
}

/// Connection flags that override `config.json`.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// JSON-RPC endpoint
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Lottery contract address
    #[arg(long, global = true)]
    pub contract: Option<String>,

    /// Chain id to sign for
    #[arg(long, global = true)]
    pub chain_id: Option<u64>,

    /// Index of the account to use
    #[arg(short, long, global = true)]
    pub account: Option<usize>,
}

impl ConnectionArgs {
    pub fn apply(&self, mut config: ClientConfig) -> Result<ClientConfig> {
        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url = rpc_url.clone();
        }
        if let Some(contract) = &self.contract {
            config.contract_address = contract
                .parse::<Address>()
                .map_err(|e| NumguessError::InvalidAddress(format!("{}: {}", contract, e)))?;
        }
        if let Some(chain_id) = self.chain_id {
            config.chain_id = Some(chain_id);
        }
        if let Some(account) = self.account {
            config.account_index = account;
        }
        config.validate()?;
        Ok(config)
    }
}

pub async fn resolve_client_config(data_dir: &Path, args: &ConnectionArgs) -> Result<ClientConfig> {
    let config = ClientConfig::load(data_dir).await?;
    args.apply(config)
}

/// Signer keys from the environment, or a hidden prompt.
pub fn load_private_keys() -> Result<String> {
    if let Ok(keys) = std::env::var(PRIVATE_KEYS_ENV) {
        if !keys.trim().is_empty() {
            return Ok(keys);
        }
    }

    let keys = Password::new()
        .with_prompt("Enter private key(s), comma separated")
        .interact()?;
    Ok(keys)
}
