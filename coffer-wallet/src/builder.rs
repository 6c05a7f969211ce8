//! Asset and backup construction from partial input.
//!
//! Defaults are laid down first and the partial record is merged over them
//! field by field: present scalars override, nested `state` and `summary`
//! merge key by key, arrays replace wholesale.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::asset::{Asset, FetchState, Secret, SeedRecord};
use crate::backup::{schema_version, Backup};
use crate::error::{Result, WalletError};

/// Loosely-typed asset input, e.g. from an import file or the CLI
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialAsset {
    pub symbol: Option<String>,
    /// Primary address, used when `addresses` is missing or empty
    pub address: Option<String>,
    pub addresses: Option<Vec<String>>,
    pub label: Option<String>,
    pub balance: Option<f64>,
    pub printed: Option<bool>,
    pub state: Option<PartialFetchState>,
    pub summary: Option<Map<String, Value>>,
    pub private_key: Option<String>,
    pub seed: Option<SeedRecord>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PartialFetchState {
    #[serde(alias = "shall_we_fetch_summary")]
    pub pending: Option<bool>,
    #[serde(alias = "fetching_summary")]
    pub in_flight: Option<bool>,
}

impl PartialFetchState {
    fn merge_into(self, state: &mut FetchState) {
        if let Some(pending) = self.pending {
            state.pending = pending;
        }
        if let Some(in_flight) = self.in_flight {
            state.in_flight = in_flight;
        }
    }
}

/// Build an unregistered asset from defaults merged with `partial`
pub fn build_default(partial: PartialAsset) -> Result<Asset> {
    // Registration rejects an asset that still has no symbol
    let symbol = partial.symbol.unwrap_or_default();

    let addresses = match partial.addresses {
        Some(addresses) if !addresses.is_empty() => addresses,
        _ => match partial.address {
            Some(address) => vec![address],
            None => {
                return Err(WalletError::InvalidAsset(
                    "address is missing".to_string(),
                ))
            }
        },
    };

    let secret = match (partial.private_key, partial.seed) {
        (None, None) => Secret::None,
        (Some(ciphertext), None) => Secret::PrivateKey(ciphertext),
        (None, Some(seed)) => Secret::Seed(seed),
        (Some(_), Some(_)) => {
            return Err(WalletError::InvalidAsset(
                "both a private key and a seed were given".to_string(),
            ))
        }
    };

    let mut asset = Asset::new(&symbol, addresses, secret)?;

    if let Some(label) = partial.label {
        asset.set_label(label);
    }
    if let Some(balance) = partial.balance {
        asset.set_balance(balance);
    }
    if let Some(printed) = partial.printed {
        asset.set_printed(printed);
    }
    if let Some(state) = partial.state {
        let mut merged = asset.fetch_state();
        state.merge_into(&mut merged);
        asset.set_fetch_state(merged);
    }
    if let Some(summary) = partial.summary {
        asset.summary_mut().extend(summary);
    }

    Ok(asset)
}

/// Loosely-typed backup input
#[derive(Debug, Clone, Default)]
pub struct PartialBackup {
    pub date: Option<i64>,
    pub network: Option<String>,
    pub schema_version: Option<String>,
    pub assets: Option<IndexMap<String, Asset>>,
    pub customs: Option<Map<String, Value>>,
}

/// Backup dated now for `network`, merged with `partial`
pub fn build_backup(partial: PartialBackup, network: &str) -> Backup {
    build_backup_at(partial, network, chrono::Utc::now().timestamp_millis())
}

/// Backup dated `date` (ms since epoch) for `network`, merged with `partial`
pub fn build_backup_at(partial: PartialBackup, network: &str, date: i64) -> Backup {
    let mut backup = Backup {
        date,
        network: network.to_string(),
        schema_version: schema_version(),
        assets: IndexMap::new(),
        customs: Map::new(),
    };

    if let Some(date) = partial.date {
        backup.date = date;
    }
    if let Some(network) = partial.network {
        backup.network = network;
    }
    if let Some(version) = partial.schema_version {
        backup.schema_version = version;
    }
    if let Some(assets) = partial.assets {
        backup.assets.extend(assets);
    }
    if let Some(customs) = partial.customs {
        backup.customs.extend(customs);
    }

    backup
}
