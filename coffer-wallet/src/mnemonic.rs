//! Mnemonic Service
//!
//! Handles BIP39 mnemonic generation and validation, and derivation of the
//! BIP32 root key that every currency adapter derives its keys from.
//!
//! Security: generated phrases are returned in `Zeroizing<String>` wrappers so
//! the recovery phrase is wiped from memory when dropped. Entropy is read from
//! the operating system only; if that fails, generation fails.

use bip39::{Language, Mnemonic, Seed};
use rand::{rngs::OsRng, RngCore};
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use crate::error::{Result, WalletError};
use crate::keys::RootKey;
use crate::network::Network;

/// Supported mnemonic lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    Twelve,
    TwentyFour,
}

impl WordCount {
    /// Bytes of entropy encoded by a phrase of this length
    pub fn entropy_bytes(&self) -> usize {
        match self {
            WordCount::Twelve => 16,
            WordCount::TwentyFour => 32,
        }
    }

    pub fn words(&self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::TwentyFour => 24,
        }
    }
}

impl TryFrom<usize> for WordCount {
    type Error = WalletError;

    fn try_from(words: usize) -> Result<Self> {
        match words {
            12 => Ok(WordCount::Twelve),
            24 => Ok(WordCount::TwentyFour),
            other => Err(WalletError::UnsupportedWordCount(other)),
        }
    }
}

/// Generate a new random mnemonic using the OS randomness source
pub fn generate_mnemonic(words: WordCount) -> Result<Zeroizing<String>> {
    generate_mnemonic_with(&mut OsRng, words)
}

/// Generate a mnemonic drawing entropy from `rng`.
///
/// A failing source is reported as `EntropySource`; there is no fallback.
pub fn generate_mnemonic_with<R: RngCore>(rng: &mut R, words: WordCount) -> Result<Zeroizing<String>> {
    let mut entropy = Zeroizing::new(vec![0u8; words.entropy_bytes()]);
    rng.try_fill_bytes(&mut entropy)
        .map_err(|e| WalletError::EntropySource(e.to_string()))?;

    entropy_to_mnemonic(&entropy)
}

/// Encode 16 or 32 bytes of entropy as a checksummed English phrase
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Zeroizing<String>> {
    if entropy.len() != 16 && entropy.len() != 32 {
        return Err(WalletError::InvalidMnemonic(format!(
            "entropy must be 16 or 32 bytes, got {}",
            entropy.len()
        )));
    }

    let mnemonic = Mnemonic::from_entropy(entropy, Language::English)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;

    Ok(Zeroizing::new(mnemonic.phrase().to_string()))
}

/// Validate wordlist membership and checksum of a phrase
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    parse_mnemonic(phrase).map(|_| ())
}

/// Derive the root key for `network` (`bitcoin`, `testnet` or `regtest`).
///
/// Identical `(mnemonic, passphrase, network)` always yield the same key.
pub fn derive_root_key(mnemonic: &str, passphrase: &str, network: &str) -> Result<RootKey> {
    let network: Network = network.parse()?;
    root_key_from_mnemonic(mnemonic, passphrase, network)
}

/// Same as [`derive_root_key`] with an already parsed network
pub fn root_key_from_mnemonic(mnemonic: &str, passphrase: &str, network: Network) -> Result<RootKey> {
    let mnemonic = parse_mnemonic(mnemonic)?;

    // PBKDF2-HMAC-SHA512, 2048 rounds, salt "mnemonic" || passphrase
    let seed = Seed::new(&mnemonic, passphrase);
    RootKey::from_seed(seed.as_bytes(), network)
}

/// One-way fingerprint of a mnemonic, used to detect seed reuse.
///
/// Keccak-256 over the normalized phrase, hex encoded.
pub fn seed_fingerprint(mnemonic: &str) -> String {
    let normalized = normalize_phrase(mnemonic);
    hex::encode(Keccak256::digest(normalized.as_bytes()))
}

/// Lowercase the phrase and collapse whitespace to single spaces
pub fn normalize_phrase(phrase: &str) -> Zeroizing<String> {
    let words: Vec<String> = phrase
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect();
    Zeroizing::new(words.join(" "))
}

fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    let normalized = normalize_phrase(phrase);
    Mnemonic::from_phrase(&normalized, Language::English)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
}
