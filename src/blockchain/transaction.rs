//! Transaction building, validation, and signing.
//!
//! # Responsibilities
//! - Build bank `MsgSend` messages
//! - Run stateless message checks before anything touches the network
//! - Assemble body, fee and signer info, sign in direct mode
//! - Encode the signed envelope and compute its hash

use std::str::FromStr;

use cosmrs::bank::MsgSend;
use cosmrs::tendermint::chain;
use cosmrs::tx::{self, Fee, Msg, SignDoc, SignerInfo};
use cosmrs::{AccountId, Coin, Denom};
use sha2::{Digest, Sha256};

use crate::blockchain::types::{AccountInfo, ChainError, ChainResult};
use crate::blockchain::wallet::SigningWallet;
use crate::config::schema::CoinConfig;

/// Parse a bech32 address and require the expected prefix.
pub fn parse_address(address: &str, prefix: &str) -> ChainResult<AccountId> {
    let account = AccountId::from_str(address).map_err(|e| ChainError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })?;
    if account.prefix() != prefix {
        return Err(ChainError::Address {
            address: address.to_string(),
            reason: format!("expected prefix '{}', got '{}'", prefix, account.prefix()),
        });
    }
    Ok(account)
}

/// Convert a configured coin into an SDK coin.
pub fn coin_from_config(coin: &CoinConfig) -> ChainResult<Coin> {
    let denom = Denom::from_str(&coin.denom)
        .map_err(|e| ChainError::InvalidMessage(format!("invalid denom '{}': {}", coin.denom, e)))?;
    Ok(Coin {
        denom,
        amount: u128::from(coin.amount),
    })
}

/// Build a bank send from `from` to `to`.
pub fn build_msg(from: &AccountId, to: &AccountId, amount: Vec<Coin>) -> MsgSend {
    MsgSend {
        from_address: from.clone(),
        to_address: to.clone(),
        amount,
    }
}

/// Stateless checks on a `MsgSend`.
///
/// Both addresses must carry `prefix`, and the amount must be a non-empty
/// set of positive coins sorted by denom without duplicates.
pub fn validate_basic(msg: &MsgSend, prefix: &str) -> ChainResult<()> {
    for (role, address) in [("sender", &msg.from_address), ("recipient", &msg.to_address)] {
        if address.prefix() != prefix {
            return Err(ChainError::InvalidMessage(format!(
                "{} address {} does not have prefix '{}'",
                role, address, prefix
            )));
        }
    }

    if msg.amount.is_empty() {
        return Err(ChainError::InvalidMessage("amount must not be empty".to_string()));
    }

    let mut previous: Option<&str> = None;
    for coin in &msg.amount {
        let denom: &str = coin.denom.as_ref();
        if coin.amount == 0 {
            return Err(ChainError::InvalidMessage(format!(
                "amount of {} must be positive",
                denom
            )));
        }
        if let Some(prev) = previous {
            if denom == prev {
                return Err(ChainError::InvalidMessage(format!("duplicate denomination {}", denom)));
            }
            if denom < prev {
                return Err(ChainError::InvalidMessage(format!(
                    "coins are not sorted: {} after {}",
                    denom, prev
                )));
            }
        }
        previous = Some(denom);
    }

    Ok(())
}

/// A signed transaction ready for broadcast.
pub struct SignedTx {
    raw: tx::Raw,
}

impl SignedTx {
    /// Protobuf-encoded `TxRaw` bytes.
    pub fn to_bytes(&self) -> ChainResult<Vec<u8>> {
        self.raw
            .to_bytes()
            .map_err(|e| ChainError::Encoding(format!("TxRaw: {}", e)))
    }

    /// Uppercase hex SHA-256 of the encoded transaction, as nodes report it.
    pub fn hash(&self) -> ChainResult<String> {
        Ok(tx_hash(&self.to_bytes()?))
    }
}

/// Uppercase hex SHA-256 of raw transaction bytes.
pub fn tx_hash(tx_bytes: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(tx_bytes))
}

/// Builds and signs transfer transactions for one chain.
#[derive(Debug, Clone)]
pub struct TransferBuilder {
    chain_id: chain::Id,
    fee: Coin,
    gas_limit: u64,
    memo: String,
}

impl TransferBuilder {
    /// Create a new transaction builder.
    ///
    /// # Arguments
    /// * `chain_id` - Chain the signature is bound to
    /// * `fee` - Fee paid; a zero amount sends no fee coins
    /// * `gas_limit` - Gas limit for the transaction
    /// * `memo` - Memo placed in the body
    pub fn new(chain_id: &str, fee: Coin, gas_limit: u64, memo: impl Into<String>) -> ChainResult<Self> {
        let chain_id = chain::Id::from_str(chain_id)
            .map_err(|e| ChainError::InvalidMessage(format!("invalid chain id '{}': {}", chain_id, e)))?;
        Ok(Self {
            chain_id,
            fee,
            gas_limit,
            memo: memo.into(),
        })
    }

    fn fee(&self) -> Fee {
        let amount = if self.fee.amount == 0 {
            Vec::new()
        } else {
            vec![self.fee.clone()]
        };
        Fee {
            amount,
            gas_limit: self.gas_limit,
            payer: None,
            granter: None,
        }
    }

    /// Sign `msg` for `account` with `wallet` in direct mode.
    pub fn sign(&self, msg: &MsgSend, account: AccountInfo, wallet: &SigningWallet) -> ChainResult<SignedTx> {
        let any = msg
            .to_any()
            .map_err(|e| ChainError::Encoding(format!("MsgSend: {}", e)))?;
        let body = tx::Body::new(vec![any], self.memo.clone(), 0u32);

        let signer_info = SignerInfo::single_direct(Some(wallet.public_key()), account.sequence);
        let auth_info = signer_info.auth_info(self.fee());

        let sign_doc = SignDoc::new(&body, &auth_info, &self.chain_id, account.account_number)
            .map_err(|e| ChainError::Encoding(format!("SignDoc: {}", e)))?;
        let raw = sign_doc
            .sign(wallet.signing_key())
            .map_err(|e| ChainError::Wallet(format!("signing failed: {}", e)))?;

        tracing::debug!(
            chain_id = %self.chain_id,
            account_number = account.account_number,
            sequence = account.sequence,
            gas_limit = self.gas_limit,
            "Transaction signed"
        );

        Ok(SignedTx { raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const RECIPIENT: &str = "osmo1ys5lj28zrvpm9cjj0958awqmjt8aa8vpdflqc2";

    fn coin(denom: &str, amount: u64) -> Coin {
        coin_from_config(&CoinConfig::new(denom, amount)).unwrap()
    }

    fn wallet() -> SigningWallet {
        SigningWallet::from_mnemonic(TEST_MNEMONIC, "osmo").unwrap()
    }

    fn msg(amount: Vec<Coin>) -> MsgSend {
        let to = parse_address(RECIPIENT, "osmo").unwrap();
        build_msg(wallet().address(), &to, amount)
    }

    #[test]
    fn test_parse_address_checks_prefix() {
        assert!(parse_address(RECIPIENT, "osmo").is_ok());

        let err = parse_address(RECIPIENT, "cosmos").unwrap_err();
        assert!(err.to_string().contains("expected prefix 'cosmos'"));

        assert!(matches!(
            parse_address("osmo1notbech32", "osmo"),
            Err(ChainError::Address { .. })
        ));
    }

    #[test]
    fn test_build_msg_fields() {
        let msg = msg(vec![coin("uosmo", 50_000)]);
        assert_eq!(msg.from_address, *wallet().address());
        assert_eq!(msg.to_address.to_string(), RECIPIENT);
        assert_eq!(msg.amount, vec![coin("uosmo", 50_000)]);
        assert!(validate_basic(&msg, "osmo").is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_and_empty() {
        let err = validate_basic(&msg(vec![coin("uosmo", 0)]), "osmo").unwrap_err();
        assert!(err.to_string().contains("must be positive"));

        let err = validate_basic(&msg(Vec::new()), "osmo").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_validate_rejects_unsorted_and_duplicate_coins() {
        let err = validate_basic(&msg(vec![coin("uosmo", 1), coin("uion", 1)]), "osmo").unwrap_err();
        assert!(err.to_string().contains("not sorted"));

        let err = validate_basic(&msg(vec![coin("uosmo", 1), coin("uosmo", 2)]), "osmo").unwrap_err();
        assert!(err.to_string().contains("duplicate"));

        assert!(validate_basic(&msg(vec![coin("uion", 1), coin("uosmo", 1)]), "osmo").is_ok());
    }

    #[test]
    fn test_validate_rejects_foreign_prefix() {
        let err = validate_basic(&msg(vec![coin("uosmo", 1)]), "cosmos").unwrap_err();
        assert!(err.to_string().contains("sender address"));
    }

    #[test]
    fn test_sign_produces_decodable_tx() {
        let builder = TransferBuilder::new("osmo-test-5", coin("uosmo", 100_000), 200_000, "test transaction").unwrap();
        let msg = msg(vec![coin("uosmo", 50_000)]);
        let account = AccountInfo {
            account_number: 12,
            sequence: 3,
        };

        let signed = builder.sign(&msg, account, &wallet()).unwrap();
        let bytes = signed.to_bytes().unwrap();
        assert_eq!(signed.hash().unwrap(), tx_hash(&bytes));
        assert_eq!(signed.hash().unwrap().len(), 64);

        let tx = cosmrs::Tx::from_bytes(&bytes).unwrap();
        assert_eq!(tx.body.memo, "test transaction");
        assert_eq!(tx.body.messages.len(), 1);
        assert_eq!(MsgSend::from_any(&tx.body.messages[0]).unwrap(), msg);
        assert_eq!(tx.auth_info.fee.gas_limit, 200_000);
        assert_eq!(tx.auth_info.fee.amount, vec![coin("uosmo", 100_000)]);
        assert_eq!(tx.auth_info.signer_infos[0].sequence, 3);
        assert_eq!(tx.signatures.len(), 1);
    }

    #[test]
    fn test_zero_fee_sends_no_coins() {
        let builder = TransferBuilder::new("osmo-test-5", coin("uosmo", 0), 100_000, "").unwrap();
        let signed = builder
            .sign(
                &msg(vec![coin("uosmo", 1)]),
                AccountInfo {
                    account_number: 0,
                    sequence: 0,
                },
                &wallet(),
            )
            .unwrap();

        let tx = cosmrs::Tx::from_bytes(&signed.to_bytes().unwrap()).unwrap();
        assert!(tx.auth_info.fee.amount.is_empty());
    }

    #[test]
    fn test_invalid_chain_id() {
        assert!(TransferBuilder::new("", coin("uosmo", 1), 1, "").is_err());
    }
}
