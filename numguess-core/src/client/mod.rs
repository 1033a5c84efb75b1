//! Session against a wallet and the lottery contract.
//!
//! Every UI-facing operation returns a [`Status`] and never an error. The
//! `try_*` forms return the underlying `Result` and leave the status line
//! untouched.

pub mod store;

pub use store::SessionStore;

use crate::config::ClientConfig;
use crate::contract::LotteryContract;
use crate::error::{NumguessError, Result};
use crate::types::{ActionKind, ContractView, Session, Status, TxPhase, TxReceipt};
use crate::units::{parse_eth, parse_number, require_present};
use crate::validation::{check_new_max_prize, check_withdrawal};
use crate::wallet::{AccountSubscription, WalletProvider};

use alloy::primitives::Address;
use std::sync::Arc;

pub struct ContractSessionClient {
    config: ClientConfig,
    wallet: Option<Arc<dyn WalletProvider>>,
    contract: Option<Box<dyn LotteryContract>>,
    subscription: Option<AccountSubscription>,
    store: SessionStore,
}

impl ContractSessionClient {
    /// `wallet` is `None` when no wallet provider is available at all.
    pub fn new(config: ClientConfig, wallet: Option<Arc<dyn WalletProvider>>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            wallet,
            contract: None,
            subscription: None,
            store: SessionStore::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn session(&self) -> Option<&Session> {
        self.store.session()
    }

    pub fn view(&self) -> ContractView {
        self.store.view()
    }

    pub fn status(&self) -> Option<&Status> {
        self.store.status()
    }

    pub fn phase(&self) -> TxPhase {
        self.store.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.store.is_busy()
    }

    pub fn is_owner(&self) -> bool {
        self.store.is_owner()
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_connected()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Return a settled transaction phase to idle.
    pub fn acknowledge(&mut self) {
        self.store.acknowledge();
    }

    // Connection

    pub async fn connect(&mut self) -> Status {
        self.store.clear_status();
        let status = match self.try_connect().await {
            Ok(account) => {
                let role = if self.store.is_owner() { "owner" } else { "player" };
                Status::success(format!("Connected as {} ({})", account, role))
            }
            Err(e) => {
                tracing::warn!("Wallet connection failed: {}", e);
                Status::error(format!("Wallet connection error: {}", e))
            }
        };
        self.store.set_status(status.clone());
        status
    }

    pub async fn try_connect(&mut self) -> Result<Address> {
        let result = self.establish().await;
        if result.is_err() {
            self.contract = None;
            self.store.clear_session();
        }
        result
    }

    async fn establish(&mut self) -> Result<Address> {
        let wallet = self
            .wallet
            .clone()
            .ok_or_else(|| NumguessError::NoProvider("no wallet configured".to_string()))?;

        let accounts = wallet.request_accounts().await?;
        let account = *accounts.first().ok_or_else(|| {
            NumguessError::AccessRejected("wallet returned no accounts".to_string())
        })?;

        let contract = wallet
            .bind_contract(account, self.config.contract_address)
            .await?;
        let owner = contract.owner().await?;
        let max_prize = contract.max_prize().await?;
        let balance = contract.balance().await?;

        // one listener for the lifetime of the client
        if self.subscription.is_none() {
            self.subscription = Some(wallet.subscribe_accounts());
        }

        self.contract = Some(contract);
        self.store.set_session(Session::new(account, owner));
        self.store.set_view(ContractView { max_prize, balance });

        tracing::info!(
            "Connected {} to contract {} (owner: {})",
            account,
            self.config.contract_address,
            account == owner
        );
        Ok(account)
    }

    /// React to an `accountsChanged` notification.
    pub async fn handle_accounts_changed(&mut self, accounts: &[Address]) -> Status {
        if accounts.is_empty() {
            self.contract = None;
            self.store.clear_session();
            tracing::info!("Wallet reported no accounts, session cleared");

            let status = Status::info("Wallet disconnected");
            self.store.set_status(status.clone());
            return status;
        }

        tracing::info!("Wallet switched to {}, reconnecting", accounts[0]);
        self.connect().await
    }

    /// Apply every queued account-change notification, oldest first.
    pub async fn process_wallet_events(&mut self) -> Option<Status> {
        let mut last = None;
        while let Some(accounts) = self.subscription.as_mut().and_then(|s| s.try_next()) {
            last = Some(self.handle_accounts_changed(&accounts).await);
        }
        last
    }

    /// Release the account listener and forget the session.
    pub fn disconnect(&mut self) {
        self.subscription = None;
        self.contract = None;
        self.store.reset();
        tracing::info!("Session closed");
    }

    /// Re-read max prize and balance.
    pub async fn refresh_view(&mut self) -> Result<ContractView> {
        let contract = self.contract.as_deref().ok_or(NumguessError::NotConnected)?;
        let max_prize = contract.max_prize().await?;
        let balance = contract.balance().await?;

        let view = ContractView { max_prize, balance };
        self.store.set_view(view);
        tracing::debug!("View refreshed: {:?}", view);
        Ok(view)
    }

    // Mutating operations

    pub async fn submit_guess(&mut self, number: &str, stake_eth: &str) -> Status {
        self.store.clear_status();
        let result = self.try_submit_guess(number, stake_eth).await;
        self.report(
            ActionKind::Play,
            result,
            "Game played! Check the result.",
            "Transaction error",
        )
    }

    pub async fn try_submit_guess(&mut self, number: &str, stake_eth: &str) -> Result<TxReceipt> {
        if number.trim().is_empty() || stake_eth.trim().is_empty() {
            return Err(NumguessError::missing("guess number and ETH stake"));
        }
        let guess = parse_number("guess number", number)?;
        let stake = parse_eth("stake", stake_eth)?;

        let contract = self.contract.as_deref().ok_or(NumguessError::NotConnected)?;
        self.store.begin(ActionKind::Play)?;
        let outcome = contract.play(guess, stake).await;
        let receipt = self.store.finish(ActionKind::Play, outcome)?;

        match contract.balance().await {
            Ok(balance) => self.store.set_balance(balance),
            Err(e) => tracing::warn!("Failed to refresh balance after play: {}", e),
        }
        Ok(receipt)
    }

    pub async fn update_max_prize(&mut self, new_value_eth: &str) -> Status {
        self.store.clear_status();
        let result = self.try_update_max_prize(new_value_eth).await;
        self.report(ActionKind::SetMaxPrize, result, "maxPrize updated!", "Error")
    }

    pub async fn try_update_max_prize(&mut self, new_value_eth: &str) -> Result<TxReceipt> {
        require_present("new maxPrize", new_value_eth)?;
        self.ensure_owner(ActionKind::SetMaxPrize)?;
        self.store.ensure_idle()?;

        let contract = self.contract.as_deref().ok_or(NumguessError::NotConnected)?;
        let balance = contract.balance().await?;
        let new_max_prize = parse_eth("new maxPrize", new_value_eth)?;
        check_new_max_prize(new_max_prize, balance)?;

        self.store.begin(ActionKind::SetMaxPrize)?;
        let outcome = contract.set_max_prize(new_max_prize).await;
        let receipt = self.store.finish(ActionKind::SetMaxPrize, outcome)?;

        match contract.max_prize().await {
            Ok(max_prize) => self.store.set_max_prize(max_prize),
            Err(e) => tracing::warn!("Failed to refresh maxPrize: {}", e),
        }
        Ok(receipt)
    }

    pub async fn update_hidden_number(&mut self, new_value: &str) -> Status {
        self.store.clear_status();
        let result = self.try_update_hidden_number(new_value).await;
        self.report(
            ActionKind::SetHiddenNumber,
            result,
            "Hidden number updated!",
            "Error",
        )
    }

    pub async fn try_update_hidden_number(&mut self, new_value: &str) -> Result<TxReceipt> {
        let hidden_number = parse_number("new hidden number", new_value)?;
        self.ensure_owner(ActionKind::SetHiddenNumber)?;

        let contract = self.contract.as_deref().ok_or(NumguessError::NotConnected)?;
        self.store.begin(ActionKind::SetHiddenNumber)?;
        let outcome = contract.set_hidden_number(hidden_number).await;
        self.store.finish(ActionKind::SetHiddenNumber, outcome)
    }

    pub async fn withdraw(&mut self, amount_eth: &str) -> Status {
        self.store.clear_status();
        let result = self.try_withdraw(amount_eth).await;
        self.report(ActionKind::Withdraw, result, "Funds withdrawn!", "Error")
    }

    pub async fn try_withdraw(&mut self, amount_eth: &str) -> Result<TxReceipt> {
        require_present("withdrawal amount", amount_eth)?;
        self.ensure_owner(ActionKind::Withdraw)?;
        self.store.ensure_idle()?;

        let contract = self.contract.as_deref().ok_or(NumguessError::NotConnected)?;
        let balance = contract.balance().await?;
        let max_prize = contract.max_prize().await?;
        let amount = parse_eth("withdrawal amount", amount_eth)?;
        check_withdrawal(amount, max_prize, balance)?;

        self.store.begin(ActionKind::Withdraw)?;
        let outcome = contract.withdraw_funds(amount).await;
        let receipt = self.store.finish(ActionKind::Withdraw, outcome)?;

        match contract.balance().await {
            Ok(balance) => self.store.set_balance(balance),
            Err(e) => tracing::warn!("Failed to refresh balance after withdrawal: {}", e),
        }
        Ok(receipt)
    }

    fn ensure_owner(&self, kind: ActionKind) -> Result<()> {
        if !self.store.is_connected() {
            return Err(NumguessError::NotConnected);
        }
        if !self.store.is_owner() {
            return Err(NumguessError::not_owner(kind.label()));
        }
        Ok(())
    }

    fn report(
        &mut self,
        kind: ActionKind,
        result: Result<TxReceipt>,
        success: &str,
        failure: &str,
    ) -> Status {
        let status = match result {
            Ok(receipt) => {
                tracing::info!("{} confirmed in tx {}", kind, receipt.tx_hash);
                Status::success(format!("{} (tx {})", success, receipt.tx_hash))
            }
            Err(e) if e.is_local() => {
                tracing::warn!("Rejected {} locally: {}", kind, e);
                Status::error(e.to_string())
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", kind, e);
                Status::error(format!("{}: {}", failure, e))
            }
        };
        self.store.set_status(status.clone());
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockCall, MockChain, MockWallet};
    use crate::units::parse_eth;
    use alloy::primitives::{address, U256};

    const OWNER: Address = address!("0x00000000000000000000000000000000000000aa");
    const PLAYER: Address = address!("0x00000000000000000000000000000000000000bb");

    fn eth(s: &str) -> U256 {
        parse_eth("amount", s).unwrap()
    }

    fn setup(accounts: Vec<Address>) -> (ContractSessionClient, Arc<MockWallet>, MockChain) {
        let chain = MockChain::new(OWNER, eth("10"), eth("1"), U256::from(7u64));
        let wallet = Arc::new(MockWallet::new(chain.clone(), accounts));
        let client = ContractSessionClient::new(
            ClientConfig::default(),
            Some(wallet.clone() as Arc<dyn WalletProvider>),
        )
        .unwrap();
        (client, wallet, chain)
    }

    async fn connected_owner() -> (ContractSessionClient, Arc<MockWallet>, MockChain) {
        let (mut client, wallet, chain) = setup(vec![OWNER, PLAYER]);
        assert!(client.connect().await.is_success());
        (client, wallet, chain)
    }

    #[tokio::test]
    async fn test_connect_populates_session_and_view() {
        let (client, wallet, _chain) = connected_owner().await;

        let session = client.session().unwrap();
        assert_eq!(session.wallet_address(), OWNER);
        assert!(client.is_owner());
        assert_eq!(client.view().balance, eth("10"));
        assert_eq!(client.view().max_prize, eth("1"));
        assert!(client.is_subscribed());
        assert_eq!(wallet.listener_count(), 1);
    }

    #[tokio::test]
    async fn test_connect_without_provider() {
        let mut client = ContractSessionClient::new(ClientConfig::default(), None).unwrap();
        let status = client.connect().await;
        assert!(status.is_error());
        assert!(client.session().is_none());
        assert!(!client.is_owner());
    }

    #[tokio::test]
    async fn test_connect_rejected_leaves_session_empty() {
        let (mut client, wallet, chain) = setup(vec![PLAYER]);
        wallet.reject_requests(true);

        let status = client.connect().await;
        assert!(status.is_error());
        assert!(client.session().is_none());
        assert!(!client.is_subscribed());
        assert_eq!(chain.call_count(), 0);
    }

    #[tokio::test]
    async fn test_player_is_not_owner() {
        let (mut client, _wallet, _chain) = setup(vec![PLAYER]);
        client.connect().await;
        assert!(client.is_connected());
        assert!(!client.is_owner());

        let err = client.try_update_max_prize("1").await.unwrap_err();
        assert!(matches!(err, NumguessError::NotOwner(_)));
    }

    #[tokio::test]
    async fn test_submit_guess_missing_inputs_never_reach_provider() {
        let (mut client, _wallet, chain) = connected_owner().await;
        let calls_before = chain.call_count();

        for (number, stake) in [("", "0.1"), ("7", ""), ("", ""), ("  ", " ")] {
            let status = client.submit_guess(number, stake).await;
            assert!(status.is_error());
        }
        assert!(matches!(
            client.try_submit_guess("", "0.1").await,
            Err(NumguessError::MissingInput(_))
        ));

        assert_eq!(chain.call_count(), calls_before);
        assert_eq!(client.phase(), TxPhase::Idle);
    }

    #[tokio::test]
    async fn test_submit_guess_sends_stake_and_refreshes_balance() {
        let (mut client, _wallet, chain) = setup(vec![PLAYER]);
        client.connect().await;

        let status = client.submit_guess("3", "0.5").await;
        assert!(status.is_success(), "{}", status);
        assert_eq!(
            chain.transactions(),
            vec![MockCall::Play {
                from: PLAYER,
                guess: U256::from(3u64),
                stake: eth("0.5"),
            }]
        );
        assert_eq!(client.view().balance, eth("10.5"));
        assert_eq!(chain.calls().last(), Some(&MockCall::Balance));
        assert_eq!(client.phase(), TxPhase::Confirmed(ActionKind::Play));

        client.acknowledge();
        assert_eq!(client.phase(), TxPhase::Idle);
    }

    #[tokio::test]
    async fn test_submit_guess_provider_error_becomes_status() {
        let (mut client, _wallet, chain) = setup(vec![PLAYER]);
        client.connect().await;
        chain.fail_next("insufficient funds for gas");

        let status = client.submit_guess("3", "0.5").await;
        assert!(status.is_error());
        assert!(status.message.starts_with("Transaction error"));
        assert!(status.message.contains("insufficient funds"));
        assert_eq!(client.phase(), TxPhase::Failed(ActionKind::Play));
        assert!(!client.is_busy());
        assert_eq!(client.status(), Some(&status));
    }

    #[tokio::test]
    async fn test_update_max_prize_above_half_balance_rejected_locally() {
        let (mut client, _wallet, chain) = connected_owner().await;

        let err = client.try_update_max_prize("6").await.unwrap_err();
        assert!(matches!(err, NumguessError::PrizeExceedsHalfBalance { .. }));
        assert!(chain.transactions().is_empty());
        assert_eq!(client.phase(), TxPhase::Idle);

        let status = client.update_max_prize("4").await;
        assert!(status.is_success(), "{}", status);
        assert_eq!(chain.transactions(), vec![MockCall::SetMaxPrize(eth("4"))]);
        assert_eq!(client.view().max_prize, eth("4"));
    }

    #[tokio::test]
    async fn test_update_max_prize_uses_fresh_balance() {
        let (mut client, _wallet, chain) = connected_owner().await;
        // someone else drained the contract since we connected
        chain.set_balance(eth("2"));

        let err = client.try_update_max_prize("4").await.unwrap_err();
        assert!(err.is_local());
        assert!(chain.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_update_hidden_number() {
        let (mut client, _wallet, chain) = connected_owner().await;

        assert!(client.update_hidden_number("").await.is_error());
        assert!(chain.transactions().is_empty());

        let status = client.update_hidden_number("42").await;
        assert!(status.is_success(), "{}", status);
        assert_eq!(chain.hidden_number(), U256::from(42u64));
        assert_eq!(
            chain.transactions(),
            vec![MockCall::SetHiddenNumber(U256::from(42u64))]
        );
    }

    #[tokio::test]
    async fn test_withdraw_keeps_prize_covered() {
        let (mut client, _wallet, chain) = connected_owner().await;

        // maxPrize 1 ETH needs 2 ETH left behind
        let err = client.try_withdraw("8.5").await.unwrap_err();
        assert!(matches!(err, NumguessError::PrizeExceedsHalfBalance { .. }));
        let err = client.try_withdraw("11").await.unwrap_err();
        assert!(matches!(err, NumguessError::WithdrawExceedsBalance { .. }));
        assert!(chain.transactions().is_empty());

        let status = client.withdraw("8").await;
        assert!(status.is_success(), "{}", status);
        assert_eq!(chain.transactions(), vec![MockCall::WithdrawFunds(eth("8"))]);
        assert_eq!(client.view().balance, eth("2"));
    }

    #[tokio::test]
    async fn test_operations_require_connection() {
        let (mut client, _wallet, chain) = setup(vec![PLAYER]);

        assert!(matches!(
            client.try_submit_guess("1", "0.1").await,
            Err(NumguessError::NotConnected)
        ));
        assert!(matches!(
            client.try_withdraw("1").await,
            Err(NumguessError::NotConnected)
        ));
        assert_eq!(chain.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_accounts_clear_session_without_provider_call() {
        let (mut client, wallet, chain) = connected_owner().await;
        let requests_before = wallet.request_count();
        let calls_before = chain.call_count();

        wallet.disconnect();
        let status = client.process_wallet_events().await.unwrap();

        assert_eq!(status.message, "Wallet disconnected");
        assert!(client.session().is_none());
        assert!(!client.is_owner());
        assert_eq!(wallet.request_count(), requests_before);
        assert_eq!(chain.call_count(), calls_before);
    }

    #[tokio::test]
    async fn test_account_switch_reconnects() {
        let (mut client, wallet, _chain) = connected_owner().await;
        assert!(client.is_owner());

        wallet.switch_account(1);
        let status = client.process_wallet_events().await.unwrap();
        assert!(status.is_success(), "{}", status);

        assert_eq!(client.session().unwrap().wallet_address(), PLAYER);
        assert!(!client.is_owner());
        assert_eq!(wallet.request_count(), 2);
        // reconnecting reuses the existing listener
        assert_eq!(wallet.listener_count(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_releases_listener() {
        let (mut client, wallet, _chain) = connected_owner().await;
        assert_eq!(wallet.listener_count(), 1);

        client.disconnect();
        assert_eq!(wallet.listener_count(), 0);
        assert!(!client.is_connected());
        assert!(client.process_wallet_events().await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_view() {
        let (mut client, _wallet, chain) = connected_owner().await;
        chain.set_balance(eth("20"));

        let view = client.refresh_view().await.unwrap();
        assert_eq!(view.balance, eth("20"));
        assert_eq!(client.view(), view);
    }
}
