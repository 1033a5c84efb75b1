//! Binding to the deployed guess-the-number contract.

pub mod evm;

pub use evm::EvmLotteryContract;

use crate::error::Result;
use crate::types::TxReceipt;
use alloy::primitives::{Address, U256};
use alloy::sol;
use async_trait::async_trait;

sol! {
    #[sol(rpc)]
    interface GuessTheNumber {
        event FundsWithdrawn(address indexed owner, uint256 amount);
        event HiddenNumberUpdated(uint256 newHiddenNumber);
        event MaxPrizeUpdated(uint256 newMaxPrize);
        event NumberGuessed(address indexed player, bool success, uint256 amountWon);

        function owner() external view returns (address);
        function getMaxPrize() external view returns (uint256);
        function maxPrize() external view returns (uint256);
        function play(uint256 guessedNumber) external payable;
        function setMaxPrize(uint256 _maxPrize) external;
        function setHiddenNumber(uint256 _hiddenNumber) external;
        function withdrawFunds(uint256 amount) external;
    }
}

/// Calls the session client makes against the contract.
///
/// View calls return the current on-chain value. Mutating calls resolve only
/// once the transaction is mined, and fail if it reverted.
#[async_trait]
pub trait LotteryContract: Send + Sync {
    fn address(&self) -> Address;

    async fn owner(&self) -> Result<Address>;

    /// `getMaxPrize()`
    async fn max_prize(&self) -> Result<U256>;

    /// The public `maxPrize` getter. Same value as [`LotteryContract::max_prize`].
    async fn max_prize_public(&self) -> Result<U256>;

    /// Native balance held by the contract.
    async fn balance(&self) -> Result<U256>;

    async fn play(&self, guess: U256, stake: U256) -> Result<TxReceipt>;

    async fn set_max_prize(&self, max_prize: U256) -> Result<TxReceipt>;

    async fn set_hidden_number(&self, hidden_number: U256) -> Result<TxReceipt>;

    async fn withdraw_funds(&self, amount: U256) -> Result<TxReceipt>;
}
