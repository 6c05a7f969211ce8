//! Currency Adapters
//!
//! Every supported currency implements [`CurrencyAdapter`]: address
//! validation, BIP-44 key derivation from a root key, and decryption of the
//! secrets attached to its assets. Adapters are looked up by symbol through an
//! explicit [`CoinRegistry`].
//!
//! Adapters hold nothing but immutable settings, so every operation is a pure
//! function of its arguments and adapters can be shared across threads.

pub mod bitcoin;
pub mod ethereum;

use bip32::{ChildNumber, XPrv};
use std::collections::HashMap;
use zeroize::Zeroizing;

use crate::asset::SeedRecord;
use crate::cipher::{self, KdfParams};
use crate::error::{Result, WalletError};
use crate::keys::{KeyMaterial, PrivateKey, RootKey};
use crate::mnemonic::{normalize_phrase, root_key_from_mnemonic, seed_fingerprint, validate_mnemonic};
use crate::network::Network;

pub use bitcoin::Bitcoin;
pub use ethereum::Ethereum;

/// Default number of derivation indices searched when matching an address
pub const DEFAULT_SEED_SEARCH_WINDOW: u32 = 20;

/// Immutable settings shared by the adapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSettings {
    pub network: Network,

    /// Indices `0..seed_search_window` are tried when re-deriving addresses
    pub seed_search_window: u32,

    /// Cost of newly encrypted secrets
    pub kdf: KdfParams,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            network: Network::Bitcoin,
            seed_search_window: DEFAULT_SEED_SEARCH_WINDOW,
            kdf: KdfParams::default(),
        }
    }
}

/// BIP-44 external chain node: m/44'/{coin_type}'/0'/0
pub fn bip44_chain(coin_type: u32) -> Result<[ChildNumber; 4]> {
    Ok([
        ChildNumber::new(44, true)?,
        ChildNumber::new(coin_type, true)?,
        ChildNumber::new(0, true)?,
        ChildNumber::new(0, false)?,
    ])
}

/// Capability set of one currency.
pub trait CurrencyAdapter: Send + Sync {
    /// Ticker this adapter serves, e.g. `BTC`
    fn symbol(&self) -> &'static str;

    fn settings(&self) -> &AdapterSettings;

    /// BIP-44 coin type used for derivation
    fn coin_type(&self) -> u32;

    /// Display address controlled by `key`
    fn address_for_key(&self, key: &PrivateKey) -> String;

    /// Check address syntax and checksum. Never fails.
    fn is_valid_address(&self, address: &str) -> bool;

    /// Whether two address strings name the same address
    fn same_address(&self, a: &str, b: &str) -> bool {
        a == b
    }

    /// Derive the key at `index` of the adapter's BIP-44 external chain
    fn derive_key_from_root(&self, root: &RootKey, index: u32) -> Result<KeyMaterial> {
        let chain = root.derive(&bip44_chain(self.coin_type())?)?;
        self.derive_child_key(&chain, index)
    }

    /// Derive the non-hardened child `index` of an already derived chain node
    fn derive_child_key(&self, chain: &XPrv, index: u32) -> Result<KeyMaterial> {
        let child = chain.derive_child(ChildNumber::new(index, false)?)?;
        let private_key = PrivateKey::from_xprv(&child);
        let address = self.address_for_key(&private_key);

        Ok(KeyMaterial {
            index,
            address,
            private_key,
        })
    }

    fn encrypt_private_key(&self, key: &PrivateKey, password: &str) -> Result<String> {
        cipher::seal(key.as_bytes(), password, &self.settings().kdf)
    }

    /// Encrypt a mnemonic and fingerprint it for reuse detection
    fn encrypt_seed(&self, mnemonic: &str, password: &str) -> Result<SeedRecord> {
        validate_mnemonic(mnemonic)?;
        let normalized = normalize_phrase(mnemonic);

        Ok(SeedRecord {
            ciphertext: cipher::seal(normalized.as_bytes(), password, &self.settings().kdf)?,
            hash: seed_fingerprint(&normalized),
        })
    }

    /// Decrypt a stored private key and check it controls `address`
    fn decrypt_private_key(&self, address: &str, ciphertext: &str, password: &str) -> Result<PrivateKey> {
        let plaintext = cipher::open(ciphertext, password)?;

        let key = PrivateKey::from_bytes(&plaintext).map_err(|_| {
            WalletError::MalformedCiphertext("decrypted value is not a private key".to_string())
        })?;

        if !self.same_address(&self.address_for_key(&key), address) {
            return Err(WalletError::MalformedCiphertext(format!(
                "decrypted key does not control {}",
                address
            )));
        }

        Ok(key)
    }

    /// Decrypt a seed record back to its mnemonic, checking the fingerprint
    fn decrypt_seed(&self, seed: &SeedRecord, password: &str) -> Result<Zeroizing<String>> {
        let plaintext = cipher::open(&seed.ciphertext, password)?;
        let mnemonic = std::str::from_utf8(&plaintext).map_err(|_| {
            WalletError::MalformedCiphertext("decrypted seed is not UTF-8".to_string())
        })?;

        if seed_fingerprint(mnemonic) != seed.hash {
            return Err(WalletError::MalformedCiphertext(
                "seed does not match its fingerprint".to_string(),
            ));
        }

        Ok(Zeroizing::new(mnemonic.to_string()))
    }

    /// Decrypt a seed, re-derive every address and return the primary key
    fn decrypt_private_key_from_seed(
        &self,
        addresses: &[String],
        seed: &SeedRecord,
        password: &str,
    ) -> Result<PrivateKey> {
        let mnemonic = self.decrypt_seed(seed, password)?;

        let root = root_key_from_mnemonic(&mnemonic, "", self.settings().network).map_err(|_| {
            WalletError::MalformedCiphertext("decrypted seed is not a valid mnemonic".to_string())
        })?;

        let mut keys = self.find_keys(&root, addresses)?;
        Ok(keys.swap_remove(0).private_key)
    }

    /// Locate each address within the search window, in request order
    fn find_keys(&self, root: &RootKey, addresses: &[String]) -> Result<Vec<KeyMaterial>> {
        let window = self.settings().seed_search_window;
        if addresses.is_empty() {
            return Err(WalletError::AddressNotDerived {
                address: String::new(),
                window,
            });
        }

        let chain = root.derive(&bip44_chain(self.coin_type())?)?;
        let mut found: Vec<Option<KeyMaterial>> = vec![None; addresses.len()];

        for index in 0..window {
            if found.iter().all(Option::is_some) {
                break;
            }

            let material = self.derive_child_key(&chain, index)?;
            for (slot, address) in found.iter_mut().zip(addresses) {
                if slot.is_none() && self.same_address(&material.address, address) {
                    *slot = Some(material.clone());
                }
            }
        }

        tracing::debug!(
            symbol = self.symbol(),
            requested = addresses.len(),
            matched = found.iter().filter(|slot| slot.is_some()).count(),
            window,
            "seed address search finished"
        );

        found
            .into_iter()
            .zip(addresses)
            .map(|(slot, address)| {
                slot.ok_or_else(|| WalletError::AddressNotDerived {
                    address: address.clone(),
                    window,
                })
            })
            .collect()
    }
}

/// Symbol to adapter mapping
#[derive(Default)]
pub struct CoinRegistry {
    adapters: HashMap<String, Box<dyn CurrencyAdapter>>,
}

impl CoinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in adapter
    pub fn with_defaults(settings: AdapterSettings) -> Self {
        let mut coins = Self::new();
        coins.register(Box::new(Bitcoin::new(settings.clone())));
        coins.register(Box::new(Ethereum::new(settings)));
        coins
    }

    /// Add an adapter, returning the one it replaces
    pub fn register(&mut self, adapter: Box<dyn CurrencyAdapter>) -> Option<Box<dyn CurrencyAdapter>> {
        self.adapters.insert(adapter.symbol().to_string(), adapter)
    }

    pub fn get(&self, symbol: &str) -> Result<&dyn CurrencyAdapter> {
        self.adapters
            .get(symbol)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| WalletError::UnsupportedCurrency(symbol.to_string()))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.adapters.contains_key(symbol)
    }

    /// Supported symbols, sorted
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}
