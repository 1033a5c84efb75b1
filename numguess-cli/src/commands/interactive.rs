use crate::commands::status::{print_session, print_status};
use dialoguer::{Input, Select};
use numguess_core::{ContractSessionClient, LocalWallet, Result};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Connect,
    Play,
    SetMaxPrize,
    SetHiddenNumber,
    Withdraw,
    SwitchAccount,
    Disconnect,
    Refresh,
    Quit,
}

impl MenuItem {
    fn label(&self) -> &'static str {
        match self {
            MenuItem::Connect => "Connect wallet",
            MenuItem::Play => "Play",
            MenuItem::SetMaxPrize => "[owner] Update maxPrize",
            MenuItem::SetHiddenNumber => "[owner] Set hidden number",
            MenuItem::Withdraw => "[owner] Withdraw funds",
            MenuItem::SwitchAccount => "Switch account",
            MenuItem::Disconnect => "Disconnect wallet",
            MenuItem::Refresh => "Refresh",
            MenuItem::Quit => "Quit",
        }
    }
}

// Owner actions are only offered to the owner, and nothing that submits a
// transaction is offered while one is pending.
fn menu_items(client: &ContractSessionClient, accounts: usize) -> Vec<MenuItem> {
    let mut items = Vec::new();

    if !client.is_connected() {
        items.push(MenuItem::Connect);
        items.push(MenuItem::Quit);
        return items;
    }

    if !client.is_busy() {
        items.push(MenuItem::Play);
        if client.is_owner() {
            items.extend([
                MenuItem::SetMaxPrize,
                MenuItem::SetHiddenNumber,
                MenuItem::Withdraw,
            ]);
        }
    }

    if accounts > 1 {
        items.push(MenuItem::SwitchAccount);
    }
    items.extend([MenuItem::Disconnect, MenuItem::Refresh, MenuItem::Quit]);
    items
}

fn prompt(text: &str) -> Result<String> {
    let value = Input::<String>::new()
        .with_prompt(text)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

/// Menu loop over a connected session. Account switches and disconnects go
/// through the wallet and come back as account-change notifications.
pub async fn run_interactive(
    client: &mut ContractSessionClient,
    wallet: Arc<LocalWallet>,
) -> Result<()> {
    loop {
        if let Some(status) = client.process_wallet_events().await {
            print_status(&status);
        }
        client.acknowledge();

        println!();
        print_session(client);

        let items = menu_items(client, wallet.accounts().len());
        let labels: Vec<&str> = items.iter().map(MenuItem::label).collect();
        let choice = Select::new()
            .with_prompt("Guess the number")
            .items(&labels)
            .default(0)
            .interact()?;

        let status = match items[choice] {
            MenuItem::Connect => client.connect().await,
            MenuItem::Play => {
                let number = prompt("Your number (e.g. 7)")?;
                let eth = prompt("Stake in ETH (e.g. 0.01)")?;
                client.submit_guess(&number, &eth).await
            }
            MenuItem::SetMaxPrize => {
                let eth = prompt("New maxPrize (ETH)")?;
                client.update_max_prize(&eth).await
            }
            MenuItem::SetHiddenNumber => {
                let number = prompt("New hidden number")?;
                client.update_hidden_number(&number).await
            }
            MenuItem::Withdraw => {
                let eth = prompt("Amount to withdraw (ETH)")?;
                client.withdraw(&eth).await
            }
            MenuItem::SwitchAccount => {
                let accounts: Vec<String> =
                    wallet.accounts().iter().map(|a| a.to_string()).collect();
                let index = Select::new()
                    .with_prompt("Account")
                    .items(&accounts)
                    .default(0)
                    .interact()?;
                wallet.switch_account(index)?;
                continue;
            }
            MenuItem::Disconnect => {
                wallet.disconnect();
                continue;
            }
            MenuItem::Refresh => {
                if let Err(e) = client.refresh_view().await {
                    eprintln!("Refresh failed: {}", e);
                }
                continue;
            }
            MenuItem::Quit => break,
        };

        print_status(&status);
    }

    client.disconnect();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use numguess_core::mock::{MockChain, MockWallet};
    use numguess_core::units::parse_eth;
    use numguess_core::{Address, ClientConfig, WalletProvider, U256};

    fn client_for(account: Address, owner: Address) -> ContractSessionClient {
        let balance = parse_eth("balance", "10").unwrap();
        let chain = MockChain::new(owner, balance, U256::ZERO, U256::from(1u64));
        let wallet: Arc<dyn WalletProvider> = Arc::new(MockWallet::new(chain, vec![account]));
        ContractSessionClient::new(ClientConfig::default(), Some(wallet)).unwrap()
    }

    #[tokio::test]
    async fn test_menu_follows_session() {
        let owner: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        let player: Address = "0x00000000000000000000000000000000000000bb".parse().unwrap();

        let mut client = client_for(player, owner);
        assert_eq!(menu_items(&client, 1), vec![MenuItem::Connect, MenuItem::Quit]);

        client.connect().await;
        let items = menu_items(&client, 2);
        assert!(items.contains(&MenuItem::Play));
        assert!(items.contains(&MenuItem::SwitchAccount));
        assert!(!items.contains(&MenuItem::Withdraw));

        let mut client = client_for(owner, owner);
        client.connect().await;
        let items = menu_items(&client, 1);
        assert!(items.contains(&MenuItem::SetMaxPrize));
        assert!(items.contains(&MenuItem::SetHiddenNumber));
        assert!(items.contains(&MenuItem::Withdraw));
        assert!(!items.contains(&MenuItem::SwitchAccount));
    }
}
