use crate::contract::{GuessTheNumber, LotteryContract};
use crate::error::{NumguessError, Result};
use crate::types::TxReceipt;

use alloy::contract::SolCallBuilder;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionReceipt;
use alloy::sol_types::SolCall;
use async_trait::async_trait;

type Instance = GuessTheNumber::GuessTheNumberInstance<DynProvider>;

/// Contract handle over an alloy provider that already carries the signer.
pub struct EvmLotteryContract {
    address: Address,
    provider: DynProvider,
    instance: Instance,
}

impl EvmLotteryContract {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        let instance = GuessTheNumber::new(address, provider.clone());
        Self {
            address,
            provider,
            instance,
        }
    }

    async fn submit<C: SolCall + Send + Sync>(
        &self,
        action: &str,
        call: SolCallBuilder<&DynProvider, C>,
    ) -> Result<TxReceipt> {
        let pending = call.send().await.map_err(describe_contract_error)?;
        let tx_hash = *pending.tx_hash();
        tracing::info!("Submitted {} transaction {}", action, tx_hash);

        let receipt = pending.get_receipt().await?;
        into_receipt(action, receipt)
    }
}

#[async_trait]
impl LotteryContract for EvmLotteryContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn owner(&self) -> Result<Address> {
        Ok(self.instance.owner().call().await?)
    }

    async fn max_prize(&self) -> Result<U256> {
        Ok(self.instance.getMaxPrize().call().await?)
    }

    async fn max_prize_public(&self) -> Result<U256> {
        Ok(self.instance.maxPrize().call().await?)
    }

    async fn balance(&self) -> Result<U256> {
        Ok(self.provider.get_balance(self.address).await?)
    }

    async fn play(&self, guess: U256, stake: U256) -> Result<TxReceipt> {
        self.submit("play", self.instance.play(guess).value(stake))
            .await
    }

    async fn set_max_prize(&self, max_prize: U256) -> Result<TxReceipt> {
        self.submit("setMaxPrize", self.instance.setMaxPrize(max_prize))
            .await
    }

    async fn set_hidden_number(&self, hidden_number: U256) -> Result<TxReceipt> {
        self.submit(
            "setHiddenNumber",
            self.instance.setHiddenNumber(hidden_number),
        )
        .await
    }

    async fn withdraw_funds(&self, amount: U256) -> Result<TxReceipt> {
        self.submit("withdrawFunds", self.instance.withdrawFunds(amount))
            .await
    }
}

// Prefer the node's error message (it carries the revert reason) over the full error chain.
fn describe_contract_error(err: alloy::contract::Error) -> NumguessError {
    if let alloy::contract::Error::TransportError(transport) = &err {
        if let Some(payload) = transport.as_error_resp() {
            return NumguessError::Reverted(payload.message.to_string());
        }
    }
    err.into()
}

fn into_receipt(action: &str, receipt: TransactionReceipt) -> Result<TxReceipt> {
    if !receipt.status() {
        return Err(NumguessError::Reverted(format!(
            "{} transaction {} reverted",
            action, receipt.transaction_hash
        )));
    }

    Ok(TxReceipt {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    })
}
