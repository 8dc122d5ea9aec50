//! Wallet management and transaction signing keys.
//!
//! # Security
//! - Private keys come from the encrypted keyring or a mnemonic, never config
//! - Keys are never logged or serialized
//! - `Debug` shows the address only

use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::crypto::PublicKey;
use cosmrs::AccountId;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::blockchain::types::{ChainError, ChainResult};

/// BIP-44 path for the first account of coin type 118 (Cosmos Hub).
pub const COSMOS_HD_PATH: &str = "m/44'/118'/0'/0/0";

/// Generate a fresh 24-word BIP-39 English mnemonic.
pub fn generate_mnemonic() -> ChainResult<String> {
    let mut entropy = [0u8; 32];
    OsRng.fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| ChainError::Wallet(format!("mnemonic generation failed: {}", e)))?;
    Ok(mnemonic.to_string())
}

/// Derive the raw 32-byte secp256k1 secret at [`COSMOS_HD_PATH`] from a
/// BIP-39 English mnemonic of 12, 15, 18, 21 or 24 words.
pub fn derive_secret(phrase: &str) -> ChainResult<[u8; 32]> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, &words.join(" "))
        .map_err(|e| ChainError::Wallet(format!("invalid mnemonic: {}", e)))?;

    // Keplr and the Cosmos SDK both use an empty BIP-39 passphrase.
    let seed = mnemonic.to_seed_normalized("");
    let path: DerivationPath = COSMOS_HD_PATH
        .parse()
        .map_err(|e| ChainError::Wallet(format!("invalid derivation path: {}", e)))?;
    let xprv = XPrv::derive_from_path(seed, &path)
        .map_err(|e| ChainError::Wallet(format!("key derivation failed: {}", e)))?;

    Ok(xprv.to_bytes())
}

/// Signing key paired with its bech32 account address.
pub struct SigningWallet {
    /// The underlying signer (private key).
    signing_key: SigningKey,
    /// Address derived from the public key and the chain prefix.
    address: AccountId,
}

impl SigningWallet {
    /// Create a wallet from raw secp256k1 secret bytes.
    ///
    /// # Arguments
    /// * `secret` - 32-byte private key
    /// * `prefix` - Bech32 account prefix (e.g. "osmo")
    pub fn from_secret_bytes(secret: &[u8], prefix: &str) -> ChainResult<Self> {
        let signing_key = SigningKey::from_slice(secret)
            .map_err(|e| ChainError::Wallet(format!("invalid private key: {}", e)))?;
        let address = signing_key
            .public_key()
            .account_id(prefix)
            .map_err(|e| ChainError::Wallet(format!("address derivation failed: {}", e)))?;

        tracing::debug!(address = %address, "Wallet initialized");

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Recover a wallet from a BIP-39 mnemonic.
    pub fn from_mnemonic(phrase: &str, prefix: &str) -> ChainResult<Self> {
        let secret = derive_secret(phrase)?;
        Self::from_secret_bytes(&secret, prefix)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> &AccountId {
        &self.address
    }

    /// Get the wallet's public key.
    pub fn public_key(&self) -> PublicKey {
        self.signing_key.public_key()
    }

    /// Compressed SEC1 encoding of the public key (33 bytes).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key().to_bytes()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl std::fmt::Debug for SigningWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningWallet")
            .field("address", &self.address.to_string())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    // Address and key Keplr and `gaiad keys add --recover` derive for TEST_MNEMONIC.
    const TEST_ADDRESS: &str = "cosmos19rl4cm2hmr8afy4kldpxz3fka4jguq0auqdal4";
    const TEST_OSMO_ADDRESS: &str = "osmo19rl4cm2hmr8afy4kldpxz3fka4jguq0a5m7df8";
    const TEST_PUBKEY: &str = "024f4e2ad99c34d60b9ba6283c9431a8418af8673212961f97a77b6377fcd05b62";

    const TWENTY_FOUR_WORDS: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    #[test]
    fn test_wallet_from_mnemonic() {
        let wallet = SigningWallet::from_mnemonic(TEST_MNEMONIC, "osmo").unwrap();
        assert!(wallet.address().to_string().starts_with("osmo1"));
        assert_eq!(wallet.public_key_bytes().len(), 33);
    }

    #[test]
    fn test_twelve_word_mnemonic_known_address() {
        let cosmos = SigningWallet::from_mnemonic(TEST_MNEMONIC, "cosmos").unwrap();
        assert_eq!(cosmos.address().to_string(), TEST_ADDRESS);
        assert_eq!(hex::encode(cosmos.public_key_bytes()), TEST_PUBKEY);

        let osmo = SigningWallet::from_mnemonic(TEST_MNEMONIC, "osmo").unwrap();
        assert_eq!(osmo.address().to_string(), TEST_OSMO_ADDRESS);
    }

    #[test]
    fn test_mnemonic_whitespace_is_normalized() {
        let padded = format!("  {}\n", TEST_MNEMONIC.replace(' ', "   "));
        let wallet = SigningWallet::from_mnemonic(&padded, "cosmos").unwrap();
        assert_eq!(wallet.address().to_string(), TEST_ADDRESS);
    }

    #[test]
    fn test_twenty_four_word_mnemonic() {
        let wallet = SigningWallet::from_mnemonic(TWENTY_FOUR_WORDS, "cosmos").unwrap();
        assert_ne!(wallet.address().to_string(), TEST_ADDRESS);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let phrase = TEST_MNEMONIC.replace("about", "abandon");
        let err = SigningWallet::from_mnemonic(&phrase, "osmo").unwrap_err();
        assert!(err.to_string().contains("invalid mnemonic"));
    }

    #[test]
    fn test_prefix_only_changes_hrp() {
        let osmo = SigningWallet::from_mnemonic(TEST_MNEMONIC, "osmo").unwrap();
        let cosmos = SigningWallet::from_mnemonic(TEST_MNEMONIC, "cosmos").unwrap();
        assert_eq!(osmo.address().to_bytes(), cosmos.address().to_bytes());
        assert_eq!(cosmos.address().prefix(), "cosmos");
    }

    #[test]
    fn test_secret_bytes_match_mnemonic() {
        let secret = derive_secret(TEST_MNEMONIC).unwrap();
        let from_bytes = SigningWallet::from_secret_bytes(&secret, "osmo").unwrap();
        let from_phrase = SigningWallet::from_mnemonic(TEST_MNEMONIC, "osmo").unwrap();
        assert_eq!(from_bytes.address(), from_phrase.address());
    }

    #[test]
    fn test_generated_mnemonic_derives() {
        let phrase = generate_mnemonic().unwrap();
        assert_eq!(phrase.split_whitespace().count(), 24);
        assert!(SigningWallet::from_mnemonic(&phrase, "osmo").is_ok());
        assert_ne!(phrase, generate_mnemonic().unwrap());
    }

    #[test]
    fn test_invalid_mnemonic() {
        let result = SigningWallet::from_mnemonic("not a real phrase", "osmo");
        assert!(result.unwrap_err().to_string().contains("invalid mnemonic"));
    }

    #[test]
    fn test_invalid_private_key() {
        let result = SigningWallet::from_secret_bytes(&[0u8; 5], "osmo");
        assert!(result.unwrap_err().to_string().contains("invalid private key"));
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = SigningWallet::from_mnemonic(TEST_MNEMONIC, "osmo").unwrap();
        let debug = format!("{:?}", wallet);
        assert!(debug.contains("osmo1"));
        assert!(!debug.contains("signing_key"));
    }
}
