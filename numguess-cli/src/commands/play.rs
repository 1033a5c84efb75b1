use crate::commands::status::{print_session, print_status};
use numguess_core::{ContractSessionClient, Status};

pub async fn handle_play(client: &mut ContractSessionClient, number: &str, eth: &str) -> Status {
    println!("Submitting guess {} with {} ETH...", number.trim(), eth.trim());
    let status = client.submit_guess(number, eth).await;
    print_status(&status);

    if status.is_success() {
        print_session(client);
    }
    status
}
