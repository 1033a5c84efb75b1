use numguess_core::mock::{MockChain, MockWallet};
use numguess_core::units::{format_eth, parse_eth};
use numguess_core::{Address, ClientConfig, ContractSessionClient, WalletProvider, U256};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let owner: Address = "0x00000000000000000000000000000000000000aa".parse()?;
    let player: Address = "0x00000000000000000000000000000000000000bb".parse()?;

    // In-memory contract holding 10 ETH with a 1 ETH prize
    let chain = MockChain::new(
        owner,
        parse_eth("balance", "10")?,
        parse_eth("prize", "1")?,
        U256::from(7u64),
    );
    let wallet = Arc::new(MockWallet::new(chain.clone(), vec![owner, player]));
    let provider: Arc<dyn WalletProvider> = wallet.clone();

    let mut client = ContractSessionClient::new(ClientConfig::default(), Some(provider))?;

    println!("{}", client.connect().await);
    println!("Owner: {}", client.is_owner());
    println!("maxPrize: {} ETH", format_eth(client.view().max_prize));
    println!("Balance: {} ETH", format_eth(client.view().balance));

    // Rejected locally: 6 ETH is more than half of the balance
    println!("\n{}", client.update_max_prize("6").await);
    println!("{}", client.update_max_prize("4").await);

    // Switch to the player account
    wallet.switch_account(1);
    if let Some(status) = client.process_wallet_events().await {
        println!("\n{}", status);
    }

    println!("{}", client.submit_guess("7", "0.5").await);
    println!("Balance: {} ETH", format_eth(client.view().balance));

    println!("\nTransactions sent: {}", chain.transactions().len());

    client.disconnect();
    println!("\nExample completed successfully!");

    Ok(())
}
