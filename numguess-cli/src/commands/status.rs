use comfy_table::{presets::UTF8_FULL, Table};
use numguess_core::units::format_eth;
use numguess_core::{ContractSessionClient, Result, Status, StatusKind};

/// Refresh the view values and print the session table.
pub async fn show_status(client: &mut ContractSessionClient) -> Result<()> {
    client.refresh_view().await?;
    print_session(client);
    Ok(())
}

pub fn print_session(client: &ContractSessionClient) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);

    table.add_row(vec![
        "Contract".to_string(),
        client.config().contract_address.to_string(),
    ]);

    match client.session() {
        Some(session) => {
            let role = if session.is_owner() { "Owner" } else { "Player" };
            table.add_row(vec!["Account".to_string(), session.wallet_address().to_string()]);
            table.add_row(vec!["Role".to_string(), role.to_string()]);
        }
        None => {
            table.add_row(vec!["Account".to_string(), "Not connected".to_string()]);
        }
    }

    let view = client.view();
    table.add_row(vec![
        "maxPrize".to_string(),
        format!("{} ETH", format_eth(view.max_prize)),
    ]);
    table.add_row(vec![
        "Contract balance".to_string(),
        format!("{} ETH", format_eth(view.balance)),
    ]);

    println!("{}", table);
}

pub fn print_status(status: &Status) {
    match status.kind {
        StatusKind::Error => eprintln!("{}", status),
        StatusKind::Success | StatusKind::Info => println!("{}", status),
    }
}
