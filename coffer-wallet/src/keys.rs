//! Key Material
//!
//! Secret-bearing key types shared by the mnemonic service and the currency
//! adapters.
//!
//! Security: private key bytes live in buffers that are zeroed on drop, and
//! the `Debug` output of every type here is redacted so keys cannot end up in
//! logs by accident.

use bip32::{ChildNumber, XPrv};
use k256::ecdsa::SigningKey;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, WalletError};
use crate::network::Network;

/// BIP-32 root (master) key scoped to a network.
#[derive(Clone)]
pub struct RootKey {
    network: Network,
    xprv: XPrv,
}

impl RootKey {
    /// Create the master key from a BIP-39 seed (16 to 64 bytes)
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self> {
        let xprv = XPrv::new(seed)?;
        Ok(Self { network, xprv })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Serialize as an extended private key (`xprv…` or `tprv…`).
    ///
    /// This exposes the full secret; callers own what happens to the string.
    pub fn to_extended_string(&self) -> Zeroizing<String> {
        self.xprv.to_string(self.network.xprv_prefix())
    }

    /// Derive the node at `path` below the root
    pub fn derive(&self, path: &[ChildNumber]) -> Result<XPrv> {
        let mut node = self.xprv.clone();
        for child in path {
            node = node.derive_child(*child)?;
        }
        Ok(node)
    }
}

impl fmt::Debug for RootKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootKey")
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

/// A raw secp256k1 private key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; 32],
}

impl PrivateKey {
    /// Create a key from 32 raw bytes, rejecting zero and out-of-range scalars
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        SigningKey::from_slice(bytes).map_err(|_| WalletError::InvalidPrivateKey)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| WalletError::InvalidPrivateKey)?;
        Ok(Self { bytes })
    }

    /// Parse a 64 character hex string (an optional `0x` prefix is allowed)
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let trimmed = hex_str.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes =
            Zeroizing::new(hex::decode(digits).map_err(|_| WalletError::InvalidPrivateKey)?);
        Self::from_bytes(&bytes)
    }

    pub(crate) fn from_xprv(xprv: &XPrv) -> Self {
        Self {
            bytes: xprv.to_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.bytes))
    }

    fn signing_key(&self) -> SigningKey {
        // Validated on construction
        SigningKey::from_slice(&self.bytes).expect("private key bytes are a valid scalar")
    }

    /// Public key as compressed SEC1 bytes (33 bytes: 0x02/0x03 || x)
    pub fn public_key_compressed(&self) -> [u8; 33] {
        let point = self.signing_key().verifying_key().to_encoded_point(true);
        let mut result = [0u8; 33];
        result.copy_from_slice(point.as_bytes());
        result
    }

    /// Public key as uncompressed SEC1 bytes (65 bytes: 0x04 || x || y)
    pub fn public_key_uncompressed(&self) -> [u8; 65] {
        let point = self.signing_key().verifying_key().to_encoded_point(false);
        let mut result = [0u8; 65];
        result.copy_from_slice(point.as_bytes());
        result
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Key derived for one index of an adapter's derivation path.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pub index: u32,
    pub address: String,
    pub private_key: PrivateKey,
}
