pub mod local;
pub mod subscription;

pub use local::LocalWallet;
pub use subscription::{AccountListeners, AccountSubscription};

use crate::contract::LotteryContract;
use crate::error::{NumguessError, Result};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;

/// Holder of the user's keys, standing in for a browser wallet extension.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask for account access. The selected account comes first.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Register for `accountsChanged` notifications.
    fn subscribe_accounts(&self) -> AccountSubscription;

    /// Contract handle whose transactions are signed by `signer`.
    async fn bind_contract(
        &self,
        signer: Address,
        contract: Address,
    ) -> Result<Box<dyn LotteryContract>>;
}

/// Parse a comma or whitespace separated list of hex private keys.
pub fn parse_private_keys(keys: &str) -> Result<Vec<PrivateKeySigner>> {
    let signers = keys
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|k| !k.is_empty())
        .enumerate()
        .map(|(i, key)| {
            key.parse::<PrivateKeySigner>().map_err(|e| {
                NumguessError::config(format!("Invalid private key #{}: {}", i + 1, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if signers.is_empty() {
        return Err(NumguessError::config("No private keys provided"));
    }

    Ok(signers)
}

#[cfg(test)]
mod tests {
    use super::*;

    // well-known anvil development keys
    const KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_1: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    #[test]
    fn test_parse_private_keys() {
        let signers = parse_private_keys(&format!("{}, {}", KEY_0, KEY_1)).unwrap();
        assert_eq!(signers.len(), 2);
        assert_eq!(
            signers[0].address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_parse_private_keys_rejects_garbage() {
        assert!(parse_private_keys("").is_err());
        assert!(parse_private_keys("0x1234").is_err());
    }
}
