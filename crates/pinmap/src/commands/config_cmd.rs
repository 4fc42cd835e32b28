//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

const REDACTED: &str = "<redacted>";

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(pinmap_config::config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Show => {
            let mut config = super::load(global)?;
            if config.workspace.token.is_some() {
                config.workspace.token = Some(REDACTED.into());
            }
            print!("{}", pinmap_config::to_toml(&config)?);
        }
    }
    Ok(())
}
