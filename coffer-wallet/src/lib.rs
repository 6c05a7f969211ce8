//! Coffer Wallet
//!
//! Multi-currency wallet core. Tracks assets (addresses, optionally backed by
//! an encrypted private key or an encrypted mnemonic seed) for several
//! currencies, derives keys from BIP-39 seeds, decrypts secrets on demand and
//! detects seeds reused across currencies.
//!
//! ## Security Model
//!
//! - Secrets are stored only in encrypted form (Argon2id + ChaCha20-Poly1305)
//! - Decrypted keys and phrases live in zeroizing buffers
//! - `Debug` output of secret-bearing types is redacted
//! - Secret material is never logged

pub mod asset;
pub mod backup;
pub mod builder;
pub mod cipher;
pub mod coins;
pub mod config;
pub mod error;
pub mod keys;
pub mod mnemonic;
pub mod network;
pub mod price;
pub mod registry;
pub mod seeds;

pub mod commands;

pub use asset::{Asset, FetchState, Secret, SeedRecord};
pub use backup::Backup;
pub use builder::{build_backup, build_backup_at, build_default, PartialAsset, PartialBackup};
pub use coins::{AdapterSettings, CoinRegistry, CurrencyAdapter};
pub use config::WalletConfig;
pub use error::{Result, WalletError};
pub use keys::{KeyMaterial, PrivateKey, RootKey};
pub use mnemonic::{derive_root_key, generate_mnemonic, validate_mnemonic, WordCount};
pub use network::Network;
pub use price::{convert, portfolio_value, PriceTable};
pub use registry::{is_valid_asset, AssetRegistry};
pub use seeds::{find_reusable_seeds_for, find_seed_conflicts, group_by_seed, SeedGroup};
