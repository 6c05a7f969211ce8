//! Asset Registry
//!
//! Owns every tracked asset, keyed by id, in registration order. Operations
//! that need currency-specific behavior take the [`CoinRegistry`] explicitly.
//!
//! The registry is an ordinary owned value: `register` takes `&mut self`, so
//! id collision resolution can never interleave with another insert.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::asset::{Asset, FetchState, Secret};
use crate::backup::Backup;
use crate::builder::{build_backup, PartialBackup};
use crate::coins::CoinRegistry;
use crate::error::{Result, WalletError};
use crate::keys::PrivateKey;
use crate::mnemonic::seed_fingerprint;
use crate::seeds::distinct_symbols;

#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    /// Assets in registration order
    assets: Vec<Asset>,

    /// id -> position in `assets`
    index: HashMap<String, usize>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from a backup, keeping the exported ids
    pub fn from_backup(backup: &Backup) -> Result<Self> {
        let mut registry = Self::new();
        for (id, asset) in &backup.assets {
            let mut asset = asset.clone();
            if asset.id() != id.as_str() {
                asset.set_id(id.clone());
            }
            registry.insert_with_id(asset)?;
        }
        tracing::debug!(assets = registry.len(), "registry restored from backup");
        Ok(registry)
    }

    /// Id `register` would assign to `asset` right now
    pub fn next_asset_id(&self, asset: &Asset) -> String {
        let base = format!("{}-{}", asset.symbol(), asset.address());
        let mut id = base.clone();
        let mut suffix = 1;
        while self.index.contains_key(&id) {
            id = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        id
    }

    /// Insert `asset` under a freshly computed id and return the id
    pub fn register(&mut self, mut asset: Asset) -> Result<String> {
        if asset.symbol().trim().is_empty() {
            return Err(WalletError::InvalidAsset("symbol is empty".to_string()));
        }
        let id = self.next_asset_id(&asset);
        asset.set_id(id.clone());
        self.insert_with_id(asset)?;

        tracing::debug!(asset_id = %id, "asset registered");
        Ok(id)
    }

    /// Insert an asset that already carries an id
    pub fn insert_with_id(&mut self, asset: Asset) -> Result<()> {
        if asset.symbol().trim().is_empty() {
            return Err(WalletError::InvalidAsset("symbol is empty".to_string()));
        }
        let id = asset.id().to_string();
        if id.is_empty() {
            return Err(WalletError::InvalidAsset("asset has no id".to_string()));
        }
        if self.index.contains_key(&id) {
            return Err(WalletError::DuplicateAssetId(id));
        }

        self.index.insert(id, self.assets.len());
        self.assets.push(asset);
        Ok(())
    }

    /// Remove an asset; later assets keep their relative order
    pub fn remove(&mut self, asset_id: &str) -> Option<Asset> {
        let position = self.index.remove(asset_id)?;
        let removed = self.assets.remove(position);

        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }

        tracing::debug!(asset_id, "asset removed");
        Some(removed)
    }

    pub fn lookup(&self, asset_id: &str) -> Option<&Asset> {
        self.index.get(asset_id).map(|&i| &self.assets[i])
    }

    pub fn lookup_mut(&mut self, asset_id: &str) -> Option<&mut Asset> {
        match self.index.get(asset_id) {
            Some(&i) => Some(&mut self.assets[i]),
            None => None,
        }
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.index.contains_key(asset_id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// All assets in registration order
    pub fn list_all(&self) -> &[Asset] {
        &self.assets
    }

    /// First asset (by registration order) of `symbol` tracking `address`
    pub fn find_by_symbol_and_address(&self, symbol: &str, address: &str) -> Option<&str> {
        self.assets
            .iter()
            .find(|asset| asset.symbol() == symbol && asset.addresses().iter().any(|a| a == address))
            .map(Asset::id)
    }

    /// Like `find_by_symbol_and_address`, comparing addresses the way the
    /// currency does (e.g. ignoring EIP-55 case). Unknown currencies compare
    /// exactly.
    pub fn find_by_symbol_and_address_with(
        &self,
        symbol: &str,
        address: &str,
        coins: &CoinRegistry,
    ) -> Option<&str> {
        let coin = coins.get(symbol).ok();
        let same = |a: &str| coin.map_or(a == address, |coin| coin.same_address(a, address));
        self.assets
            .iter()
            .find(|asset| asset.symbol() == symbol && asset.addresses().iter().any(|a| same(a)))
            .map(Asset::id)
    }

    /// Symbols present in the registry, first-seen order
    pub fn distinct_symbols(&self) -> Vec<&str> {
        distinct_symbols(&self.assets)
    }

    pub fn has_private_key(&self, asset_id: &str) -> bool {
        self.lookup(asset_id).map_or(false, Asset::has_private_key)
    }

    pub fn has_seed(&self, asset_id: &str) -> bool {
        self.lookup(asset_id).map_or(false, Asset::has_seed)
    }

    pub fn has_secret(&self, asset_id: &str) -> bool {
        self.has_private_key(asset_id) || self.has_seed(asset_id)
    }

    /// Whether an asset of `symbol` was already created from `mnemonic`
    pub fn is_registered_by_seed(&self, symbol: &str, mnemonic: &str) -> bool {
        let hash = seed_fingerprint(mnemonic);
        self.assets
            .iter()
            .any(|asset| asset.symbol() == symbol && asset.seed_hash() == Some(hash.as_str()))
    }

    /// Label of the asset, or its primary address when unlabeled
    pub fn label_or_address(&self, asset_id: &str) -> Option<&str> {
        self.lookup(asset_id).map(Asset::label_or_address)
    }

    pub fn set_label(&mut self, asset_id: &str, label: &str) -> Result<()> {
        self.lookup_mut_or_err(asset_id)?.set_label(label);
        Ok(())
    }

    pub fn set_balance(&mut self, asset_id: &str, balance: f64) -> Result<()> {
        self.lookup_mut_or_err(asset_id)?.set_balance(balance);
        Ok(())
    }

    pub fn set_printed(&mut self, asset_id: &str, printed: bool) -> Result<()> {
        self.lookup_mut_or_err(asset_id)?.set_printed(printed);
        Ok(())
    }

    pub fn set_fetch_state(&mut self, asset_id: &str, state: FetchState) -> Result<()> {
        self.lookup_mut_or_err(asset_id)?.set_fetch_state(state);
        Ok(())
    }

    /// Replace the cached summary of an asset
    pub fn set_summary(&mut self, asset_id: &str, summary: Map<String, Value>) -> Result<()> {
        *self.lookup_mut_or_err(asset_id)?.summary_mut() = summary;
        Ok(())
    }

    /// Decrypt the private key of an asset.
    ///
    /// Seed assets re-derive their primary key; watch-only assets have none.
    /// A wrong password is reported once, never retried.
    pub fn decrypt(&self, asset_id: &str, password: &str, coins: &CoinRegistry) -> Result<PrivateKey> {
        let asset = self
            .lookup(asset_id)
            .ok_or_else(|| WalletError::AssetNotFound(asset_id.to_string()))?;
        let coin = coins.get(asset.symbol())?;

        match asset.secret() {
            Secret::Seed(seed) => coin.decrypt_private_key_from_seed(asset.addresses(), seed, password),
            Secret::PrivateKey(ciphertext) => {
                coin.decrypt_private_key(asset.address(), ciphertext, password)
            }
            Secret::None => Err(WalletError::InvalidAsset(format!(
                "asset {} has no private key or seed",
                asset_id
            ))),
        }
    }

    /// Snapshot every asset into a backup for `network`
    pub fn export_backup(&self, network: &str) -> Backup {
        let assets = self
            .assets
            .iter()
            .map(|asset| (asset.id().to_string(), asset.clone()))
            .collect();

        build_backup(
            PartialBackup {
                assets: Some(assets),
                ..Default::default()
            },
            network,
        )
    }

    fn lookup_mut_or_err(&mut self, asset_id: &str) -> Result<&mut Asset> {
        self.lookup_mut(asset_id)
            .ok_or_else(|| WalletError::AssetNotFound(asset_id.to_string()))
    }
}

/// Whether the asset's primary address is well formed for its currency.
///
/// Unknown currencies are invalid; this never fails.
pub fn is_valid_asset(asset: &Asset, coins: &CoinRegistry) -> bool {
    !asset.symbol().trim().is_empty()
        && coins
        .get(asset.symbol())
        .map_or(false, |coin| coin.is_valid_address(asset.address()))
}
