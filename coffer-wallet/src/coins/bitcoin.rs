//! Bitcoin adapter
//!
//! Legacy Base58Check addresses. Keys derive to P2PKH addresses of the
//! compressed public key; validation also accepts P2SH addresses of the
//! configured network.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use super::{AdapterSettings, CurrencyAdapter};
use crate::keys::PrivateKey;
use crate::network::Network;

const P2PKH_MAINNET: u8 = 0x00;
const P2SH_MAINNET: u8 = 0x05;
const P2PKH_TESTNET: u8 = 0x6f;
const P2SH_TESTNET: u8 = 0xc4;

/// BIP-44 coin types
const COIN_TYPE_MAINNET: u32 = 0;
const COIN_TYPE_TESTNET: u32 = 1;

#[derive(Debug, Clone)]
pub struct Bitcoin {
    settings: AdapterSettings,
}

impl Bitcoin {
    pub fn new(settings: AdapterSettings) -> Self {
        Self { settings }
    }

    fn network(&self) -> Network {
        self.settings.network
    }

    /// (P2PKH, P2SH) version bytes for the configured network
    fn version_bytes(&self) -> (u8, u8) {
        if self.network().is_test() {
            (P2PKH_TESTNET, P2SH_TESTNET)
        } else {
            (P2PKH_MAINNET, P2SH_MAINNET)
        }
    }
}

/// RIPEMD160(SHA256(data))
fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

impl CurrencyAdapter for Bitcoin {
    fn symbol(&self) -> &'static str {
        "BTC"
    }

    fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    fn coin_type(&self) -> u32 {
        if self.network().is_test() {
            COIN_TYPE_TESTNET
        } else {
            COIN_TYPE_MAINNET
        }
    }

    fn address_for_key(&self, key: &PrivateKey) -> String {
        let (p2pkh, _) = self.version_bytes();

        let mut payload = Vec::with_capacity(21);
        payload.push(p2pkh);
        payload.extend_from_slice(&hash160(&key.public_key_compressed()));

        bs58::encode(payload).with_check().into_string()
    }

    fn is_valid_address(&self, address: &str) -> bool {
        // 25 bytes encode to at most 35 base58 characters
        if address.is_empty() || address.len() > 35 {
            return false;
        }

        let decoded = match bs58::decode(address).with_check(None).into_vec() {
            Ok(decoded) => decoded,
            Err(_) => return false,
        };

        let (p2pkh, p2sh) = self.version_bytes();
        decoded.len() == 21 && (decoded[0] == p2pkh || decoded[0] == p2sh)
    }
}
