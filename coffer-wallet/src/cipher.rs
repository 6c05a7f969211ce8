//! Password-Based Secret Encryption
//!
//! Encrypts private keys and seeds with:
//! - Argon2id for password-based key derivation
//! - ChaCha20-Poly1305 for authenticated encryption
//!
//! The encoded form carries its own KDF parameters so secrets stay readable
//! after the configured defaults change:
//!
//! `v1$<memory_kib>,<iterations>,<parallelism>$<salt>$<nonce hex>$<ciphertext hex>`

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, WalletError};

/// Format tag of the current encoding
const CIPHER_VERSION: &str = "v1";

const NONCE_LEN: usize = 12;

/// Upper bound on the memory cost accepted from a ciphertext (1 GiB)
const MAX_MEMORY_KIB: u32 = 1 << 20;
const MAX_ITERATIONS: u32 = 64;
const MAX_PARALLELISM: u32 = 16;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    // Tuned for security vs. usability: 64 MB, 3 passes, 4 lanes
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Check the parameters are accepted by Argon2 and below the ceiling
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib > MAX_MEMORY_KIB
            || self.iterations > MAX_ITERATIONS
            || self.parallelism > MAX_PARALLELISM
        {
            return Err(WalletError::MalformedCiphertext(format!(
                "KDF parameters out of range: m={} t={} p={}",
                self.memory_kib, self.iterations, self.parallelism
            )));
        }
        self.argon2().map(|_| ())
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(32),
        )
        .map_err(|e| WalletError::MalformedCiphertext(format!("invalid Argon2 parameters: {}", e)))?;

        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }

    fn encode(&self) -> String {
        format!("{},{},{}", self.memory_kib, self.iterations, self.parallelism)
    }

    fn decode(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(WalletError::MalformedCiphertext(
                "invalid KDF parameter block".to_string(),
            ));
        }

        let parse = |p: &str| {
            p.parse::<u32>().map_err(|_| {
                WalletError::MalformedCiphertext("invalid KDF parameter".to_string())
            })
        };

        let params = Self::new(parse(parts[0])?, parse(parts[1])?, parse(parts[2])?);
        params.validate()?;
        Ok(params)
    }
}

/// Encrypt `plaintext` under `password`
pub fn seal(plaintext: &[u8], password: &str, params: &KdfParams) -> Result<String> {
    params.validate()?;

    // Generate random salt for Argon2
    let salt = SaltString::generate(&mut OsRng);

    // Derive encryption key from password
    let key = derive_key(password, &salt, params)?;

    // Generate random nonce
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill(&mut nonce_bytes);

    let cipher = ChaCha20Poly1305::new_from_slice(key.as_slice())
        .map_err(|_| WalletError::MalformedCiphertext("failed to create cipher".to_string()))?;

    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| WalletError::MalformedCiphertext("encryption failed".to_string()))?;

    Ok(format!(
        "{}${}${}${}${}",
        CIPHER_VERSION,
        params.encode(),
        salt.as_str(),
        hex::encode(nonce_bytes),
        hex::encode(ciphertext)
    ))
}

/// Decrypt a value produced by [`seal`].
///
/// Structural problems are `MalformedCiphertext`; an authentication tag
/// mismatch is `WrongPassword`.
pub fn open(encoded: &str, password: &str) -> Result<Zeroizing<Vec<u8>>> {
    let parts: Vec<&str> = encoded.split('$').collect();
    if parts.len() != 5 {
        return Err(WalletError::MalformedCiphertext(format!(
            "expected 5 fields, got {}",
            parts.len()
        )));
    }

    if parts[0] != CIPHER_VERSION {
        return Err(WalletError::MalformedCiphertext(format!(
            "unsupported format version: {}",
            parts[0]
        )));
    }

    let params = KdfParams::decode(parts[1])?;

    let salt = SaltString::from_b64(parts[2])
        .map_err(|_| WalletError::MalformedCiphertext("invalid salt format".to_string()))?;

    // Decode nonce and ciphertext
    let nonce_bytes = hex::decode(parts[3])
        .map_err(|_| WalletError::MalformedCiphertext("invalid nonce format".to_string()))?;
    let ciphertext = hex::decode(parts[4])
        .map_err(|_| WalletError::MalformedCiphertext("invalid ciphertext format".to_string()))?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(WalletError::MalformedCiphertext(
            "invalid nonce length".to_string(),
        ));
    }

    let key = derive_key(password, &salt, &params)?;

    let cipher = ChaCha20Poly1305::new_from_slice(key.as_slice())
        .map_err(|_| WalletError::MalformedCiphertext("failed to create cipher".to_string()))?;

    let nonce = Nonce::from_slice(&nonce_bytes);
    let plaintext = cipher.decrypt(nonce, ciphertext.as_slice()).map_err(|_| {
        tracing::warn!("secret authentication failed");
        WalletError::WrongPassword
    })?;

    Ok(Zeroizing::new(plaintext))
}

/// Derive a 32-byte encryption key from password using Argon2id
fn derive_key(password: &str, salt: &SaltString, params: &KdfParams) -> Result<Zeroizing<[u8; 32]>> {
    let argon2 = params.argon2()?;

    let hash = argon2
        .hash_password(password.as_bytes(), salt)
        .map_err(|e| WalletError::MalformedCiphertext(format!("key derivation failed: {}", e)))?;

    let hash_output = hash
        .hash
        .ok_or_else(|| WalletError::MalformedCiphertext("no hash output".to_string()))?;

    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&hash_output.as_bytes()[..32]);

    Ok(key)
}
