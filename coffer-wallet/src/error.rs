//! Error types for wallet operations

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, WalletError>;

/// Errors that can occur while deriving, decrypting or managing assets.
///
/// Validation predicates (`is_valid_address`, registry lookups) never return
/// these; they answer with `bool`/`Option` instead.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Mnemonic failed wordlist or checksum validation
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Only 12 and 24 word mnemonics can be generated
    #[error("Unsupported mnemonic length: {0} words (expected 12 or 24)")]
    UnsupportedWordCount(usize),

    /// The OS randomness source could not be read
    #[error("Secure randomness unavailable: {0}")]
    EntropySource(String),

    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    /// Authentication tag of an encrypted secret did not verify
    #[error("Wrong password")]
    WrongPassword,

    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// No index inside the search window reproduces the address
    #[error("Address {address} not derived within the first {window} indices")]
    AddressNotDerived { address: String, window: u32 },

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Id collision on insert. Unreachable through `AssetRegistry::register`.
    #[error("Duplicate asset id: {0}")]
    DuplicateAssetId(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Invalid asset: {0}")]
    InvalidAsset(String),

    /// Bytes are not a valid secp256k1 secret scalar
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// BIP-32 child derivation failed (invalid scalar, depth overflow)
    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Unsupported backup version: {0}")]
    UnsupportedBackupVersion(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<bip32::Error> for WalletError {
    fn from(err: bip32::Error) -> Self {
        WalletError::Derivation(err.to_string())
    }
}
