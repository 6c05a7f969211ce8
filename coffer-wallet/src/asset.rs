//! Asset Records
//!
//! An asset is one tracked address (or ordered set of addresses) for a single
//! currency symbol, optionally carrying an encrypted private key or an
//! encrypted seed. Secrets are stored only in their encrypted form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, WalletError};

/// Encrypted seed plus the fingerprint of its plaintext
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    /// Adapter-owned ciphertext of the mnemonic
    pub ciphertext: String,

    /// Keccak-256 fingerprint of the normalized mnemonic (hex)
    pub hash: String,
}

/// Secret material attached to an asset. Fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Secret {
    /// Watch-only asset
    #[default]
    None,
    /// Adapter-owned ciphertext of a raw private key
    PrivateKey(String),
    Seed(SeedRecord),
}

/// Transient balance-fetch flags. Never exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchState {
    /// A summary fetch should be scheduled
    pub pending: bool,
    /// A summary fetch is running
    pub in_flight: bool,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            pending: true,
            in_flight: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AssetExport", into = "AssetExport")]
pub struct Asset {
    id: String,
    symbol: String,
    addresses: Vec<String>,
    label: String,
    balance: f64,
    secret: Secret,
    fetch_state: FetchState,
    summary: Map<String, Value>,
    printed: bool,
}

impl Asset {
    /// Create an unregistered asset with default display fields
    pub fn new(symbol: &str, addresses: Vec<String>, secret: Secret) -> Result<Self> {
        if addresses.is_empty() || addresses.iter().any(|a| a.is_empty()) {
            return Err(WalletError::InvalidAsset(
                "an asset needs at least one non-empty address".to_string(),
            ));
        }

        Ok(Self {
            id: String::new(),
            symbol: symbol.to_string(),
            addresses,
            label: String::new(),
            balance: 0.0,
            secret,
            fetch_state: FetchState::default(),
            summary: Map::new(),
            printed: false,
        })
    }

    /// Registry id; empty until the asset is registered
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = id;
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Primary (display) address
    pub fn address(&self) -> &str {
        &self.addresses[0]
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Label when set, primary address otherwise
    pub fn label_or_address(&self) -> &str {
        if self.label.is_empty() {
            self.address()
        } else {
            &self.label
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Negative and non-finite balances are stored as zero
    pub fn set_balance(&mut self, balance: f64) {
        self.balance = if balance.is_finite() && balance > 0.0 {
            balance
        } else {
            0.0
        };
    }

    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    pub fn has_private_key(&self) -> bool {
        matches!(self.secret, Secret::PrivateKey(_))
    }

    pub fn has_seed(&self) -> bool {
        matches!(self.secret, Secret::Seed(_))
    }

    pub fn seed(&self) -> Option<&SeedRecord> {
        match &self.secret {
            Secret::Seed(seed) => Some(seed),
            _ => None,
        }
    }

    pub fn seed_hash(&self) -> Option<&str> {
        self.seed().map(|seed| seed.hash.as_str())
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch_state
    }

    pub fn set_fetch_state(&mut self, state: FetchState) {
        self.fetch_state = state;
    }

    pub fn summary(&self) -> &Map<String, Value> {
        &self.summary
    }

    pub fn summary_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.summary
    }

    pub fn printed(&self) -> bool {
        self.printed
    }

    pub fn set_printed(&mut self, printed: bool) {
        self.printed = printed;
    }
}

/// Persisted form of an asset: no fetch state, no summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetExport {
    #[serde(default)]
    pub id: String,
    pub symbol: String,
    pub addresses: Vec<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub printed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<SeedRecord>,
}

impl From<Asset> for AssetExport {
    fn from(asset: Asset) -> Self {
        let (private_key, seed) = match asset.secret {
            Secret::None => (None, None),
            Secret::PrivateKey(ciphertext) => (Some(ciphertext), None),
            Secret::Seed(seed) => (None, Some(seed)),
        };

        Self {
            id: asset.id,
            symbol: asset.symbol,
            addresses: asset.addresses,
            label: asset.label,
            balance: asset.balance,
            printed: asset.printed,
            private_key,
            seed,
        }
    }
}

impl TryFrom<AssetExport> for Asset {
    type Error = WalletError;

    fn try_from(export: AssetExport) -> Result<Self> {
        let secret = match (export.private_key, export.seed) {
            (None, None) => Secret::None,
            (Some(ciphertext), None) => Secret::PrivateKey(ciphertext),
            (None, Some(seed)) => Secret::Seed(seed),
            (Some(_), Some(_)) => {
                return Err(WalletError::InvalidAsset(format!(
                    "asset {} holds both a private key and a seed",
                    export.id
                )))
            }
        };

        let mut asset = Asset::new(&export.symbol, export.addresses, secret)?;
        asset.id = export.id;
        asset.label = export.label;
        asset.set_balance(export.balance);
        asset.printed = export.printed;
        Ok(asset)
    }
}
