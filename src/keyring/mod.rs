//! Password-protected file keyring.
//!
//! # Layout
//! ```text
//! <dir>/
//!     bot-1.json      → KeyRecord (address, pubkey, salt, nonce, ciphertext)
//!     alice.json
//! ```
//!
//! All keys are encrypted independently; each record carries its own salt and
//! PBKDF2 round count. Reading metadata (`show`, `list`) never needs the
//! password, only `get` does.

pub mod record;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::blockchain::types::ChainError;
use crate::blockchain::wallet::{derive_secret, SigningWallet};

pub use record::{KeyInfo, KeyRecord};

/// PBKDF2 rounds for new keys, per the 2023 OWASP recommendation.
pub const DEFAULT_ROUNDS: u32 = 600_000;

const RECORD_EXTENSION: &str = "json";

/// Errors from keyring access.
#[derive(Debug, Error)]
pub enum KeyringError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no key named '{0}' in keyring")]
    NotFound(String),

    #[error("a key named '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid key name '{0}'")]
    InvalidName(String),

    #[error("incorrect password for key '{0}'")]
    WrongPassword(String),

    #[error("malformed key record '{name}': {reason}")]
    Malformed { name: String, reason: String },

    #[error("encryption failed: {0}")]
    Crypto(String),

    #[error(transparent)]
    Key(#[from] ChainError),
}

pub type KeyringResult<T> = Result<T, KeyringError>;

/// Directory of encrypted key records.
#[derive(Debug, Clone)]
pub struct Keyring {
    dir: PathBuf,
    rounds: u32,
}

impl Keyring {
    /// Open the keyring at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> KeyringResult<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        tracing::debug!(dir = %dir.display(), "Keyring opened");

        Ok(Self {
            dir,
            rounds: DEFAULT_ROUNDS,
        })
    }

    /// Use a different PBKDF2 round count for keys added from now on.
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn filename(&self, name: &str) -> KeyringResult<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !name.starts_with('.');
        if !valid {
            return Err(KeyringError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", name, RECORD_EXTENSION)))
    }

    fn read_record(&self, name: &str) -> KeyringResult<KeyRecord> {
        let filename = self.filename(name)?;
        if !filename.exists() {
            return Err(KeyringError::NotFound(name.to_string()));
        }
        read_record_file(&filename, name)
    }

    /// Derive a key from `mnemonic`, encrypt it under `password`, and store it
    /// as `name`.
    pub fn add(&self, name: &str, mnemonic: &str, password: &str, prefix: &str) -> KeyringResult<KeyInfo> {
        let filename = self.filename(name)?;
        if filename.exists() {
            return Err(KeyringError::AlreadyExists(name.to_string()));
        }

        let secret = derive_secret(mnemonic)?;
        let wallet = SigningWallet::from_secret_bytes(&secret, prefix)?;
        let record = KeyRecord::seal(
            name,
            &wallet.address().to_string(),
            &wallet.public_key_bytes(),
            &secret,
            password,
            self.rounds,
        )?;

        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| KeyringError::Crypto(format!("serialize record: {}", e)))?;
        fs::write(&filename, json.as_bytes())?;
        restrict_permissions(&filename)?;

        tracing::info!(name = name, address = %record.address, "Key added");

        Ok(KeyInfo::from(&record))
    }

    /// Decrypt the key `name` into a signing wallet.
    ///
    /// The address is re-derived with `prefix`, so a key stored for one
    /// chain can sign for another.
    pub fn get(&self, name: &str, password: &str, prefix: &str) -> KeyringResult<SigningWallet> {
        let record = self.read_record(name)?;
        let secret = record.open(password)?;
        let wallet = SigningWallet::from_secret_bytes(&secret, prefix)?;

        if hex::encode(wallet.public_key_bytes()) != record.pubkey {
            return Err(KeyringError::Malformed {
                name: name.to_string(),
                reason: "decrypted key does not match stored public key".to_string(),
            });
        }

        Ok(wallet)
    }

    /// Public details of key `name`.
    pub fn show(&self, name: &str) -> KeyringResult<KeyInfo> {
        Ok(KeyInfo::from(&self.read_record(name)?))
    }

    /// All keys, sorted by name. Unreadable records are skipped with a warning.
    pub fn list(&self) -> KeyringResult<Vec<KeyInfo>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match read_record_file(&path, name) {
                Ok(record) => keys.push(KeyInfo::from(&record)),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable key record"),
            }
        }
        keys.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(keys)
    }

    /// Remove key `name`.
    pub fn delete(&self, name: &str) -> KeyringResult<()> {
        let filename = self.filename(name)?;
        if !filename.exists() {
            return Err(KeyringError::NotFound(name.to_string()));
        }
        fs::remove_file(filename)?;
        tracing::info!(name = name, "Key deleted");
        Ok(())
    }
}

fn read_record_file(path: &Path, name: &str) -> KeyringResult<KeyRecord> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| KeyringError::Malformed {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
