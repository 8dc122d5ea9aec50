//! On-disk key record and its encryption.
//!
//! The secret is encrypted with AES-256-GCM under a key stretched from the
//! password with PBKDF2-HMAC-SHA256. Salt, nonce and round count are stored
//! next to the ciphertext so a record can always be reopened.

use aes_gcm::aead::Aead;
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::keyring::{KeyringError, KeyringResult};

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const SECRET_LEN: usize = 32;

/// An encrypted secp256k1 private key as written to `<dir>/<name>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRecord {
    pub name: String,
    pub address: String,
    /// Compressed public key, hex.
    pub pubkey: String,
    /// PBKDF2 salt, hex.
    pub salt: String,
    pub rounds: u32,
    /// AES-GCM nonce, hex.
    pub nonce: String,
    /// Encrypted private key, hex.
    pub ciphertext: String,
}

/// Public view of a stored key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInfo {
    pub name: String,
    pub address: String,
    pub pubkey: String,
}

impl From<&KeyRecord> for KeyInfo {
    fn from(record: &KeyRecord) -> Self {
        Self {
            name: record.name.clone(),
            address: record.address.clone(),
            pubkey: record.pubkey.clone(),
        }
    }
}

fn password_hash(password: &str, salt: &[u8], rounds: u32) -> [u8; 32] {
    let mut hash = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut hash);
    hash
}

impl KeyRecord {
    /// Encrypt `secret` under `password`.
    pub fn seal(
        name: &str,
        address: &str,
        pubkey: &[u8],
        secret: &[u8; SECRET_LEN],
        password: &str,
        rounds: u32,
    ) -> KeyringResult<Self> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill(&mut salt);

        let hash = password_hash(password, &salt, rounds);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&hash));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, secret.as_slice())
            .map_err(|e| KeyringError::Crypto(e.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            address: address.to_string(),
            pubkey: hex::encode(pubkey),
            salt: hex::encode(salt),
            rounds,
            nonce: hex::encode(nonce),
            ciphertext: hex::encode(ciphertext),
        })
    }

    /// Decrypt the secret. A wrong password fails authentication.
    pub fn open(&self, password: &str) -> KeyringResult<[u8; SECRET_LEN]> {
        let salt = self.field_bytes("salt", &self.salt)?;
        let nonce = self.field_bytes("nonce", &self.nonce)?;
        let ciphertext = self.field_bytes("ciphertext", &self.ciphertext)?;
        if nonce.len() != NONCE_LEN {
            return Err(self.malformed(format!("nonce must be {} bytes, got {}", NONCE_LEN, nonce.len())));
        }

        let hash = password_hash(password, &salt, self.rounds);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&hash));
        let plaintext = cipher
            .decrypt(nonce.as_slice().into(), ciphertext.as_slice())
            .map_err(|_| KeyringError::WrongPassword(self.name.clone()))?;

        plaintext.try_into().map_err(|bytes: Vec<u8>| {
            self.malformed(format!(
                "incorrect private key length! expecting: {}, got: {}",
                SECRET_LEN,
                bytes.len()
            ))
        })
    }

    fn field_bytes(&self, field: &str, value: &str) -> KeyringResult<Vec<u8>> {
        hex::decode(value).map_err(|e| self.malformed(format!("{}: {}", field, e)))
    }

    fn malformed(&self, reason: String) -> KeyringError {
        KeyringError::Malformed {
            name: self.name.clone(),
            reason,
        }
    }
}
