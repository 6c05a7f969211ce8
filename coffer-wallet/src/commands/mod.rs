//! CLI Commands
//!
//! Implementation of all wallet CLI commands.

pub mod add_key;
pub mod add_seed;
pub mod export;
pub mod list;
pub mod mnemonic;
pub mod reusable;
pub mod reveal;
pub mod value;

use anyhow::Result;
use serde_json::Map;
use std::io::{self, Write};
use std::path::Path;
use zeroize::Zeroizing;

use crate::backup::Backup;
use crate::coins::{AdapterSettings, CoinRegistry};
use crate::config::WalletConfig;
use crate::registry::AssetRegistry;

/// Minimum length of a new encryption password
const MIN_PASSWORD_LEN: usize = 8;

/// Everything a command needs: configuration and the currency adapters
pub struct Context {
    pub config: WalletConfig,
    pub coins: CoinRegistry,
}

impl Context {
    pub fn new(config: WalletConfig) -> Self {
        let coins = CoinRegistry::with_defaults(AdapterSettings::from(&config));
        Self { config, coins }
    }

    pub fn wallet_path(&self) -> &Path {
        &self.config.wallet_path
    }

    /// Current backup file, if one was written before
    pub fn load_backup(&self) -> Result<Option<Backup>> {
        if !self.wallet_path().exists() {
            return Ok(None);
        }
        Ok(Some(Backup::load(self.wallet_path())?))
    }

    /// Registry stored in the wallet file; empty when there is none yet
    pub fn load_registry(&self) -> Result<AssetRegistry> {
        match self.load_backup()? {
            Some(backup) => Ok(AssetRegistry::from_backup(&backup)?),
            None => Ok(AssetRegistry::new()),
        }
    }

    /// Write the registry back, keeping the stored custom data
    pub fn save_registry(&self, registry: &AssetRegistry) -> Result<()> {
        let customs = match self.load_backup()? {
            Some(backup) => backup.customs,
            None => Map::new(),
        };

        let mut backup = registry.export_backup(self.config.network.as_str());
        backup.customs = customs;
        backup.save(self.wallet_path())?;
        Ok(())
    }
}

/// Prompt for password input (hidden)
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let password = rpassword::read_password()?;
    Ok(Zeroizing::new(password))
}

/// Prompt for a new password with confirmation
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    loop {
        let password = prompt_password("Enter encryption password: ")?;

        if password.len() < MIN_PASSWORD_LEN {
            print_error(&format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
            continue;
        }

        let confirm = prompt_password("Confirm password: ")?;

        if *password != *confirm {
            print_error("Passwords do not match");
            continue;
        }

        return Ok(password);
    }
}

/// Prompt for confirmation
pub fn prompt_confirm(message: &str) -> Result<bool> {
    print!("{} [y/N]: ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y") || input.trim().eq_ignore_ascii_case("yes"))
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("\x1b[31mError:\x1b[0m {}", message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("\x1b[32m{}\x1b[0m", message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("\x1b[33mWarning:\x1b[0m {}", message);
}
