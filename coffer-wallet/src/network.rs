//! Network context
//!
//! The network a root key is scoped to. It selects the extended key prefix
//! (`xprv`/`tprv`), the BIP-44 coin type for Bitcoin and the Bitcoin address
//! version bytes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WalletError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Bitcoin,
    Testnet,
    Regtest,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Bitcoin => "bitcoin",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        }
    }

    /// True for every network whose coins carry no value
    pub fn is_test(&self) -> bool {
        !matches!(self, Network::Bitcoin)
    }

    /// Prefix used when serializing an extended private key
    pub fn xprv_prefix(&self) -> bip32::Prefix {
        if self.is_test() {
            bip32::Prefix::TPRV
        } else {
            bip32::Prefix::XPRV
        }
    }
}

impl FromStr for Network {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bitcoin" | "mainnet" | "main" => Ok(Network::Bitcoin),
            "testnet" | "test" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            _ => Err(WalletError::UnsupportedNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_networks() {
        assert_eq!("bitcoin".parse::<Network>().unwrap(), Network::Bitcoin);
        assert_eq!("MAINNET".parse::<Network>().unwrap(), Network::Bitcoin);
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!(" regtest ".parse::<Network>().unwrap(), Network::Regtest);
    }

    #[test]
    fn test_parse_unknown_network() {
        let err = "dogecoin".parse::<Network>().unwrap_err();
        assert!(matches!(err, WalletError::UnsupportedNetwork(name) if name == "dogecoin"));
    }

    #[test]
    fn test_display_roundtrip() {
        for network in [Network::Bitcoin, Network::Testnet, Network::Regtest] {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), network);
        }
    }
}
