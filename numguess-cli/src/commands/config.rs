use clap::Subcommand;
use numguess_core::config::CONFIG_FILE_NAME;
use numguess_core::{ClientConfig, Result};
use std::path::Path;

use crate::config::ConnectionArgs;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write config.json with the given connection flags
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_config_command(
    cmd: ConfigCommands,
    data_dir: &Path,
    args: &ConnectionArgs,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = crate::config::resolve_client_config(data_dir, args).await?;
            println!("Config file: {}", data_dir.join(CONFIG_FILE_NAME).display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }

        ConfigCommands::Init { force } => {
            let path = data_dir.join(CONFIG_FILE_NAME);
            if !force && tokio::fs::try_exists(&path).await? {
                println!("Config already exists at {}", path.display());
                println!("Use --force to overwrite it.");
                return Ok(());
            }

            let config = args.apply(ClientConfig::default())?;
            config.save(data_dir).await?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
