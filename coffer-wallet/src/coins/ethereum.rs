//! Ethereum adapter
//!
//! Addresses are the last 20 bytes of keccak256 over the uncompressed public
//! key (without the 0x04 prefix), rendered with the EIP-55 mixed-case
//! checksum. Comparison is case-insensitive.

use sha3::{Digest, Keccak256};

use super::{AdapterSettings, CurrencyAdapter};
use crate::keys::PrivateKey;

const ETH_COIN_TYPE: u32 = 60;

#[derive(Debug, Clone)]
pub struct Ethereum {
    settings: AdapterSettings,
}

impl Ethereum {
    pub fn new(settings: AdapterSettings) -> Self {
        Self { settings }
    }
}

/// EIP-55 checksum encode an address
fn checksum_encode(address: &[u8; 20]) -> String {
    let hex_addr = hex::encode(address);
    let hash = Keccak256::digest(hex_addr.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");

    for (i, c) in hex_addr.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };

        if c.is_ascii_alphabetic() && nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }

    result
}

impl CurrencyAdapter for Ethereum {
    fn symbol(&self) -> &'static str {
        "ETH"
    }

    fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    fn coin_type(&self) -> u32 {
        ETH_COIN_TYPE
    }

    fn address_for_key(&self, key: &PrivateKey) -> String {
        let pubkey = key.public_key_uncompressed();
        let hash = Keccak256::digest(&pubkey[1..]);

        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..32]);
        checksum_encode(&address)
    }

    fn is_valid_address(&self, address: &str) -> bool {
        let digits = match address.strip_prefix("0x") {
            Some(digits) if digits.len() == 40 => digits,
            _ => return false,
        };

        let mut bytes = [0u8; 20];
        if hex::decode_to_slice(digits, &mut bytes).is_err() {
            return false;
        }

        // Single-case addresses carry no checksum
        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if !(has_lower && has_upper) {
            return true;
        }

        checksum_encode(&bytes) == address
    }

    fn same_address(&self, a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
    }
}
