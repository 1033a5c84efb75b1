pub mod config;
pub mod interactive;
pub mod owner;
pub mod play;
pub mod status;

pub use config::{handle_config_command, ConfigCommands};
pub use interactive::run_interactive;
pub use owner::{handle_owner_command, OwnerCommands};
pub use play::handle_play;
pub use status::{print_session, print_status, show_status};
