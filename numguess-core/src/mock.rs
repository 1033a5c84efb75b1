//! In-memory wallet and contract for tests.
//!
//! `MockChain` holds the contract state and records every call made against
//! it, so tests can tell view reads apart from submitted transactions.

use crate::contract::LotteryContract;
use crate::error::{NumguessError, Result};
use crate::types::TxReceipt;
use crate::wallet::{AccountListeners, AccountSubscription, WalletProvider};

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Owner,
    MaxPrize,
    MaxPrizePublic,
    Balance,
    Play { from: Address, guess: U256, stake: U256 },
    SetMaxPrize(U256),
    SetHiddenNumber(U256),
    WithdrawFunds(U256),
}

impl MockCall {
    pub fn is_transaction(&self) -> bool {
        matches!(
            self,
            MockCall::Play { .. }
                | MockCall::SetMaxPrize(_)
                | MockCall::SetHiddenNumber(_)
                | MockCall::WithdrawFunds(_)
        )
    }
}

#[derive(Debug)]
struct ChainState {
    owner: Address,
    max_prize: U256,
    balance: U256,
    hidden_number: U256,
    block: u64,
    calls: Vec<MockCall>,
    fail_next: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    pub fn new(owner: Address, balance: U256, max_prize: U256, hidden_number: U256) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChainState {
                owner,
                max_prize,
                balance,
                hidden_number,
                block: 0,
                calls: Vec::new(),
                fail_next: None,
            })),
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    pub fn transactions(&self) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(MockCall::is_transaction)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Make the next call fail with a provider error.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state.lock().fail_next = Some(message.into());
    }

    pub fn set_balance(&self, balance: U256) {
        self.state.lock().balance = balance;
    }

    pub fn balance(&self) -> U256 {
        self.state.lock().balance
    }

    pub fn max_prize(&self) -> U256 {
        self.state.lock().max_prize
    }

    pub fn hidden_number(&self) -> U256 {
        self.state.lock().hidden_number
    }

    fn record(&self, call: MockCall) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(message) => Err(NumguessError::provider(message)),
            None => Ok(()),
        }
    }

    fn mine(state: &mut ChainState) -> TxReceipt {
        state.block += 1;
        TxReceipt {
            tx_hash: TxHash::left_padding_from(&state.block.to_be_bytes()),
            block_number: Some(state.block),
            gas_used: 21_000,
        }
    }
}

/// Contract handle bound to one sender.
pub struct MockContract {
    chain: MockChain,
    address: Address,
    sender: Address,
}

impl MockContract {
    pub fn new(chain: MockChain, address: Address, sender: Address) -> Self {
        Self {
            chain,
            address,
            sender,
        }
    }

    fn only_owner(&self, state: &ChainState) -> Result<()> {
        if state.owner != self.sender {
            return Err(NumguessError::Reverted("Only owner".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LotteryContract for MockContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn owner(&self) -> Result<Address> {
        self.chain.record(MockCall::Owner)?;
        Ok(self.chain.state.lock().owner)
    }

    async fn max_prize(&self) -> Result<U256> {
        self.chain.record(MockCall::MaxPrize)?;
        Ok(self.chain.max_prize())
    }

    async fn max_prize_public(&self) -> Result<U256> {
        self.chain.record(MockCall::MaxPrizePublic)?;
        Ok(self.chain.max_prize())
    }

    async fn balance(&self) -> Result<U256> {
        self.chain.record(MockCall::Balance)?;
        Ok(self.chain.balance())
    }

    async fn play(&self, guess: U256, stake: U256) -> Result<TxReceipt> {
        self.chain.record(MockCall::Play {
            from: self.sender,
            guess,
            stake,
        })?;

        let mut state = self.chain.state.lock();
        if stake.is_zero() {
            return Err(NumguessError::Reverted("Stake required".to_string()));
        }
        state.balance += stake;
        if guess == state.hidden_number {
            let prize = state.max_prize.min(state.balance);
            state.balance -= prize;
        }
        Ok(MockChain::mine(&mut state))
    }

    async fn set_max_prize(&self, max_prize: U256) -> Result<TxReceipt> {
        self.chain.record(MockCall::SetMaxPrize(max_prize))?;

        let mut state = self.chain.state.lock();
        self.only_owner(&state)?;
        if max_prize > state.balance / U256::from(2u64) {
            return Err(NumguessError::Reverted(
                "maxPrize must not exceed half of the balance".to_string(),
            ));
        }
        state.max_prize = max_prize;
        Ok(MockChain::mine(&mut state))
    }

    async fn set_hidden_number(&self, hidden_number: U256) -> Result<TxReceipt> {
        self.chain.record(MockCall::SetHiddenNumber(hidden_number))?;

        let mut state = self.chain.state.lock();
        self.only_owner(&state)?;
        state.hidden_number = hidden_number;
        Ok(MockChain::mine(&mut state))
    }

    async fn withdraw_funds(&self, amount: U256) -> Result<TxReceipt> {
        self.chain.record(MockCall::WithdrawFunds(amount))?;

        let mut state = self.chain.state.lock();
        self.only_owner(&state)?;
        let remaining = state
            .balance
            .checked_sub(amount)
            .ok_or_else(|| NumguessError::Reverted("Insufficient balance".to_string()))?;
        if state.max_prize > remaining / U256::from(2u64) {
            return Err(NumguessError::Reverted(
                "Withdrawal would leave maxPrize uncovered".to_string(),
            ));
        }
        state.balance = remaining;
        Ok(MockChain::mine(&mut state))
    }
}

#[derive(Debug, Clone, Copy)]
struct MockSelection {
    index: usize,
    connected: bool,
}

/// Wallet holding a fixed list of accounts, bound to a [`MockChain`].
pub struct MockWallet {
    chain: MockChain,
    accounts: Vec<Address>,
    selection: Mutex<MockSelection>,
    reject_requests: Mutex<bool>,
    requests: Mutex<usize>,
    listeners: AccountListeners,
}

impl MockWallet {
    pub fn new(chain: MockChain, accounts: Vec<Address>) -> Self {
        Self {
            chain,
            accounts,
            selection: Mutex::new(MockSelection {
                index: 0,
                connected: false,
            }),
            reject_requests: Mutex::new(false),
            requests: Mutex::new(0),
            listeners: AccountListeners::new(),
        }
    }

    /// Simulate the user declining the access prompt.
    pub fn reject_requests(&self, reject: bool) {
        *self.reject_requests.lock() = reject;
    }

    pub fn request_count(&self) -> usize {
        *self.requests.lock()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn switch_account(&self, index: usize) -> Address {
        {
            let mut selection = self.selection.lock();
            selection.index = index;
            selection.connected = true;
        }
        let account = self.accounts[index];
        self.listeners.notify(&[account]);
        account
    }

    pub fn disconnect(&self) {
        self.selection.lock().connected = false;
        self.listeners.notify(&[]);
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        *self.requests.lock() += 1;
        if *self.reject_requests.lock() {
            return Err(NumguessError::AccessRejected(
                "User rejected the request".to_string(),
            ));
        }

        let mut selection = self.selection.lock();
        selection.connected = true;
        Ok(vec![self.accounts[selection.index]])
    }

    fn subscribe_accounts(&self) -> AccountSubscription {
        self.listeners.subscribe()
    }

    async fn bind_contract(
        &self,
        signer: Address,
        contract: Address,
    ) -> Result<Box<dyn LotteryContract>> {
        if !self.accounts.contains(&signer) {
            return Err(NumguessError::AccessRejected(format!(
                "Unknown account {}",
                signer
            )));
        }
        Ok(Box::new(MockContract::new(
            self.chain.clone(),
            contract,
            signer,
        )))
    }
}
