//! Configuration for the wallet.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cipher::KdfParams;
use crate::coins::{AdapterSettings, DEFAULT_SEED_SEARCH_WINDOW};
use crate::network::Network;

/// Largest accepted seed search window
pub const MAX_SEED_SEARCH_WINDOW: u32 = 10_000;

/// Wallet configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletConfig {
    /// Network addresses and extended keys are encoded for
    #[serde(default)]
    pub network: Network,

    /// Number of derivation indices searched when decrypting seed assets
    #[serde(default = "default_seed_search_window")]
    pub seed_search_window: u32,

    /// Argon2id cost used for newly encrypted secrets
    #[serde(default)]
    pub kdf: KdfParams,

    /// Backup file holding the assets
    #[serde(default = "default_wallet_path")]
    pub wallet_path: PathBuf,
}

fn default_seed_search_window() -> u32 {
    DEFAULT_SEED_SEARCH_WINDOW
}

/// `~/.coffer-wallet/backup.json`
pub fn default_wallet_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".coffer-wallet")
        .join("backup.json")
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            seed_search_window: default_seed_search_window(),
            kdf: KdfParams::default(),
            wallet_path: default_wallet_path(),
        }
    }
}

impl WalletConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: WalletConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.seed_search_window == 0 || self.seed_search_window > MAX_SEED_SEARCH_WINDOW {
            anyhow::bail!(
                "seed_search_window must be between 1 and {}, got {}",
                MAX_SEED_SEARCH_WINDOW,
                self.seed_search_window
            );
        }

        self.kdf
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid kdf parameters: {}", e))?;

        if self.kdf.memory_kib < KdfParams::default().memory_kib {
            tracing::warn!(
                "kdf.memory_kib = {} is below the recommended {}",
                self.kdf.memory_kib,
                KdfParams::default().memory_kib
            );
        }

        if self.wallet_path.as_os_str().is_empty() {
            anyhow::bail!("wallet_path must not be empty");
        }

        Ok(())
    }
}

impl From<&WalletConfig> for AdapterSettings {
    fn from(config: &WalletConfig) -> Self {
        Self {
            network: config.network,
            seed_search_window: config.seed_search_window,
            kdf: config.kdf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = WalletConfig::default();
        assert_eq!(config.network, Network::Bitcoin);
        assert_eq!(config.seed_search_window, 20);
        assert_eq!(config.kdf, KdfParams::default());
        assert!(config.wallet_path.ends_with(".coffer-wallet/backup.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: WalletConfig = toml::from_str(
            r#"
            network = "testnet"
            seed_search_window = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.seed_search_window, 50);
        assert_eq!(config.kdf, KdfParams::default());
    }

    #[test]
    fn test_parse_kdf_table() {
        let config: WalletConfig = toml::from_str(
            r#"
            [kdf]
            memory_kib = 131072
            iterations = 4
            parallelism = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.kdf, KdfParams::new(131072, 4, 2));
    }

    #[test]
    fn test_validate_window() {
        let mut config = WalletConfig::default();
        config.seed_search_window = 0;
        assert!(config.validate().is_err());

        config.seed_search_window = MAX_SEED_SEARCH_WINDOW + 1;
        assert!(config.validate().is_err());

        config.seed_search_window = MAX_SEED_SEARCH_WINDOW;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_kdf() {
        let mut config = WalletConfig::default();
        config.kdf = KdfParams::new(64, 1, 1);
        assert!(config.validate().is_ok());

        config.kdf = KdfParams::new(u32::MAX, 1, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coffer.toml");
        std::fs::write(&path, "network = \"regtest\"\nwallet_path = \"/tmp/w.json\"\n").unwrap();

        let config = WalletConfig::from_file(&path).unwrap();
        assert_eq!(config.network, Network::Regtest);
        assert_eq!(config.wallet_path, PathBuf::from("/tmp/w.json"));

        std::fs::write(&path, "seed_search_window = 0\n").unwrap();
        assert!(WalletConfig::from_file(&path).is_err());

        std::fs::write(&path, "network = \"dogecoin\"\n").unwrap();
        assert!(WalletConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_adapter_settings_from_config() {
        let config = WalletConfig {
            network: Network::Testnet,
            seed_search_window: 7,
            ..Default::default()
        };
        let settings = AdapterSettings::from(&config);
        assert_eq!(settings.network, Network::Testnet);
        assert_eq!(settings.seed_search_window, 7);
    }
}
