use crate::commands::status::{print_session, print_status};
use clap::Subcommand;
use numguess_core::{ContractSessionClient, Status};

#[derive(Subcommand)]
pub enum OwnerCommands {
    /// Set the maximum prize (ETH). Must not exceed half of the contract balance
    SetMaxPrize {
        /// New max prize in ETH
        eth: String,
    },
    /// Replace the hidden number
    SetHiddenNumber {
        /// New hidden number
        number: String,
    },
    /// Withdraw funds (ETH) while keeping maxPrize covered
    Withdraw {
        /// Amount in ETH
        eth: String,
    },
}

pub async fn handle_owner_command(cmd: OwnerCommands, client: &mut ContractSessionClient) -> Status {
    if client.is_connected() && !client.is_owner() {
        println!("Connected account is not the contract owner; the request will be refused.");
    }

    let status = match cmd {
        OwnerCommands::SetMaxPrize { eth } => {
            println!("Updating maxPrize to {} ETH...", eth.trim());
            client.update_max_prize(&eth).await
        }
        OwnerCommands::SetHiddenNumber { number } => {
            println!("Updating hidden number...");
            client.update_hidden_number(&number).await
        }
        OwnerCommands::Withdraw { eth } => {
            println!("Withdrawing {} ETH...", eth.trim());
            client.withdraw(&eth).await
        }
    };

    print_status(&status);
    if status.is_success() {
        print_session(client);
    }
    status
}
