mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::{CliConfig, ConnectionArgs};
use numguess_core::{ContractSessionClient, LocalWallet, NumguessError, WalletProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "numguess")]
#[command(about = "Guess-the-number lottery client")]
#[command(version)]
struct Cli {
    /// Data directory for config.json
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Session(SessionCommands),

    /// Configuration commands
    #[command(subcommand)]
    Config(commands::ConfigCommands),
}

/// Commands that connect the wallet before running.
#[derive(Subcommand)]
enum SessionCommands {
    /// Connect and show account, maxPrize and contract balance
    Status,

    /// Guess the hidden number with an ETH stake
    Play {
        /// Your guess
        number: String,
        /// Stake in ETH
        eth: String,
    },

    /// Owner-only contract administration
    #[command(flatten)]
    Owner(commands::OwnerCommands),

    /// Menu-driven session
    Interactive,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cli_config = CliConfig::new(cli.data_dir, cli.verbose);

    // Initialize logging
    let log_level = if cli_config.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "numguess={},numguess_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = cli_config.data_dir;
    tokio::fs::create_dir_all(&data_dir).await?;

    let result = match cli.command {
        Commands::Config(cmd) => {
            commands::handle_config_command(cmd, &data_dir, &cli.connection)
                .await
                .map(|_| true)
        }
        Commands::Session(command) => run_session(command, &data_dir, &cli.connection).await,
    };

    let failed = match result {
        Ok(succeeded) => !succeeded,
        Err(e) => {
            report_error(e);
            true
        }
    };

    if failed {
        std::process::exit(1);
    }

    Ok(())
}

fn report_error(e: NumguessError) {
    match e {
        NumguessError::NoProvider(msg) | NumguessError::AccessRejected(msg) => {
            eprintln!("Error: wallet unavailable: {}", msg);
            eprintln!(
                "Set {} or enter a key when prompted",
                config::PRIVATE_KEYS_ENV
            );
        }
        NumguessError::Config(msg) => {
            eprintln!("Error: invalid configuration: {}", msg);
            eprintln!("Use 'numguess config show' to inspect the effective settings");
        }
        _ => {
            eprintln!("Error: {}", e);
        }
    }
}

/// Returns whether the requested operation succeeded.
async fn run_session(
    command: SessionCommands,
    data_dir: &Path,
    connection: &ConnectionArgs,
) -> numguess_core::Result<bool> {
    let client_config = config::resolve_client_config(data_dir, connection).await?;
    tracing::debug!(
        "Using RPC {} and contract {}",
        client_config.rpc_url,
        client_config.contract_address
    );
    let keys = config::load_private_keys()?;
    let wallet = Arc::new(LocalWallet::from_private_keys(&client_config, &keys)?);

    let provider: Arc<dyn WalletProvider> = wallet.clone();
    let mut client = ContractSessionClient::new(client_config, Some(provider))?;

    let connected = client.connect().await;
    commands::print_status(&connected);
    if connected.is_error() {
        return Ok(false);
    }

    let status = match command {
        SessionCommands::Status => {
            commands::show_status(&mut client).await?;
            client.disconnect();
            return Ok(true);
        }
        SessionCommands::Play { number, eth } => {
            commands::handle_play(&mut client, &number, &eth).await
        }
        SessionCommands::Owner(cmd) => commands::handle_owner_command(cmd, &mut client).await,
        SessionCommands::Interactive => {
            commands::run_interactive(&mut client, wallet).await?;
            return Ok(true);
        }
    };

    client.disconnect();
    Ok(!status.is_error())
}
