use crate::config::ClientConfig;
use crate::contract::{EvmLotteryContract, LotteryContract};
use crate::error::{NumguessError, Result};
use crate::wallet::{parse_private_keys, AccountListeners, AccountSubscription, WalletProvider};

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use parking_lot::RwLock;

#[derive(Debug, Clone, Copy)]
struct Selection {
    index: usize,
    connected: bool,
}

/// Wallet backed by local private keys and an HTTP JSON-RPC endpoint.
///
/// Account switching and disconnection are driven by the caller and reported
/// to subscribers the same way a browser wallet emits `accountsChanged`.
pub struct LocalWallet {
    rpc_url: Url,
    chain_id: Option<u64>,
    signers: Vec<PrivateKeySigner>,
    selection: RwLock<Selection>,
    listeners: AccountListeners,
}

impl LocalWallet {
    pub fn new(config: &ClientConfig, signers: Vec<PrivateKeySigner>) -> Result<Self> {
        config.validate()?;

        if signers.is_empty() {
            return Err(NumguessError::config("Wallet needs at least one account"));
        }

        if config.account_index >= signers.len() {
            return Err(NumguessError::config(format!(
                "Account index {} out of range ({} accounts)",
                config.account_index,
                signers.len()
            )));
        }

        let rpc_url = config
            .rpc_url
            .parse::<Url>()
            .map_err(|e| NumguessError::config(format!("Invalid RPC URL: {}", e)))?;

        Ok(Self {
            rpc_url,
            chain_id: config.chain_id,
            signers,
            selection: RwLock::new(Selection {
                index: config.account_index,
                connected: false,
            }),
            listeners: AccountListeners::new(),
        })
    }

    pub fn from_private_keys(config: &ClientConfig, keys: &str) -> Result<Self> {
        Self::new(config, parse_private_keys(keys)?)
    }

    pub fn accounts(&self) -> Vec<Address> {
        self.signers.iter().map(|s| s.address()).collect()
    }

    pub fn selected_account(&self) -> Address {
        self.signers[self.selection.read().index].address()
    }

    pub fn is_connected(&self) -> bool {
        self.selection.read().connected
    }

    /// Make another account active and notify listeners.
    pub fn switch_account(&self, index: usize) -> Result<Address> {
        let signer = self.signers.get(index).ok_or_else(|| {
            NumguessError::config(format!(
                "Account index {} out of range ({} accounts)",
                index,
                self.signers.len()
            ))
        })?;
        let address = signer.address();

        {
            let mut selection = self.selection.write();
            selection.index = index;
            selection.connected = true;
        }

        tracing::info!("Switched to account {}", address);
        self.listeners.notify(&[address]);
        Ok(address)
    }

    /// Revoke account access and notify listeners with an empty account list.
    pub fn disconnect(&self) {
        self.selection.write().connected = false;
        tracing::info!("Wallet disconnected");
        self.listeners.notify(&[]);
    }

    fn signer_for(&self, address: Address) -> Result<&PrivateKeySigner> {
        self.signers
            .iter()
            .find(|s| s.address() == address)
            .ok_or_else(|| {
                NumguessError::AccessRejected(format!("Account {} is not held by this wallet", address))
            })
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let selected = {
            let mut selection = self.selection.write();
            selection.connected = true;
            selection.index
        };

        let mut accounts = self.accounts();
        accounts.swap(0, selected);
        Ok(accounts)
    }

    fn subscribe_accounts(&self) -> AccountSubscription {
        self.listeners.subscribe()
    }

    async fn bind_contract(
        &self,
        signer: Address,
        contract: Address,
    ) -> Result<Box<dyn LotteryContract>> {
        let wallet = EthereumWallet::from(self.signer_for(signer)?.clone());

        let provider = match self.chain_id {
            Some(chain_id) => ProviderBuilder::new()
                .with_chain_id(chain_id)
                .wallet(wallet)
                .connect_http(self.rpc_url.clone())
                .erased(),
            None => ProviderBuilder::new()
                .wallet(wallet)
                .connect_http(self.rpc_url.clone())
                .erased(),
        };

        tracing::debug!("Bound contract {} for signer {}", contract, signer);
        Ok(Box::new(EvmLotteryContract::new(contract, provider)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80,\
                        0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    #[tokio::test]
    async fn test_request_accounts_puts_selected_first() {
        let mut config = ClientConfig::default();
        config.account_index = 1;
        let wallet = LocalWallet::from_private_keys(&config, KEYS).unwrap();
        assert!(!wallet.is_connected());

        let accounts = wallet.request_accounts().await.unwrap();
        assert_eq!(accounts[0], wallet.selected_account());
        assert_eq!(accounts.len(), 2);
        assert!(wallet.is_connected());
    }

    #[test]
    fn test_switch_and_disconnect_notify() {
        let wallet = LocalWallet::from_private_keys(&ClientConfig::default(), KEYS).unwrap();
        let mut subscription = wallet.subscribe_accounts();

        let second = wallet.switch_account(1).unwrap();
        assert_eq!(subscription.try_next(), Some(vec![second]));

        wallet.disconnect();
        assert_eq!(subscription.try_next(), Some(vec![]));
        assert!(!wallet.is_connected());

        assert!(wallet.switch_account(5).is_err());
    }

    #[test]
    fn test_account_index_out_of_range() {
        let mut config = ClientConfig::default();
        config.account_index = 2;
        assert!(LocalWallet::from_private_keys(&config, KEYS).is_err());
    }

    #[tokio::test]
    async fn test_bind_contract_requires_held_account() {
        let wallet = LocalWallet::from_private_keys(&ClientConfig::default(), KEYS).unwrap();
        let stranger: Address = "0x1111111111111111111111111111111111111111".parse().unwrap();
        let result = wallet
            .bind_contract(stranger, crate::config::DEFAULT_CONTRACT_ADDRESS)
            .await;
        assert!(matches!(result, Err(NumguessError::AccessRejected(_))));
    }
}
