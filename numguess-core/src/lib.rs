//! numguess - session client for the on-chain guess-the-number lottery
//!
//! This library connects a wallet to the lottery contract, mirrors the
//! contract's view values, and submits guesses and owner transactions with
//! the same local pre-checks a front-end would run before signing.

pub mod client;
pub mod config;
pub mod contract;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;
pub mod units;
pub mod validation;
pub mod wallet;

pub use client::{ContractSessionClient, SessionStore};
pub use config::ClientConfig;
pub use contract::{EvmLotteryContract, LotteryContract};
pub use error::{ErrorKind, NumguessError, Result};
pub use types::{
    ActionKind, ContractView, PendingAction, Session, Status, StatusKind, TxPhase, TxReceipt,
};
pub use wallet::{LocalWallet, WalletProvider};

pub use alloy::primitives::{Address, U256};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_client_creation() {
        let config = ClientConfig::default();
        let wallet = LocalWallet::from_private_keys(&config, KEY).unwrap();
        let wallet: Arc<dyn WalletProvider> = Arc::new(wallet);
        let client = ContractSessionClient::new(config, Some(wallet)).unwrap();

        assert!(!client.is_connected());
        assert!(!client.is_owner());
        assert_eq!(client.phase(), TxPhase::Idle);
        assert_eq!(client.view(), ContractView::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::new("");
        assert!(ContractSessionClient::new(config, None).is_err());
    }
}
