//! Node RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the Tendermint RPC endpoint
//! - Query account number and sequence through the auth module
//! - Broadcast signed transactions and wait for block inclusion
//! - Handle timeouts and network errors as fatal, typed errors

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use cosmrs::proto::cosmos::auth::v1beta1::{BaseAccount, QueryAccountRequest, QueryAccountResponse};
use cosmrs::proto::prost::Message;
use cosmrs::rpc::{Client, HttpClient, Url};
use cosmrs::AccountId;
use tokio::time::timeout;

use crate::blockchain::types::{AccountInfo, BroadcastOutcome, ChainConfig, ChainError, ChainResult};

/// gRPC method path for account lookups, routed through ABCI query.
pub const ACCOUNT_QUERY_PATH: &str = "/cosmos.auth.v1beta1.Query/Account";

/// Protobuf type URL of a plain account.
pub const BASE_ACCOUNT_TYPE_URL: &str = "/cosmos.auth.v1beta1.BaseAccount";

/// The chain operations a transfer needs from a node.
#[async_trait]
pub trait ChainNode: Send + Sync {
    /// Look up the account number and next sequence for `address`.
    async fn account(&self, address: &AccountId) -> ChainResult<AccountInfo>;

    /// Submit encoded transaction bytes and wait until they are in a block.
    async fn broadcast_commit(&self, tx_bytes: Vec<u8>) -> ChainResult<BroadcastOutcome>;
}

/// Tendermint RPC client wrapper.
#[derive(Clone)]
pub struct NodeClient {
    rpc: HttpClient,
    /// Configuration.
    config: ChainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl NodeClient {
    /// Create a new node client.
    ///
    /// # Arguments
    /// * `config` - Chain configuration
    ///
    /// # Returns
    /// A new client or error if the URL is unusable
    pub async fn new(config: ChainConfig) -> ChainResult<Self> {
        let url: Url = config
            .rpc_url
            .parse()
            .map_err(|e| ChainError::Rpc(format!("invalid rpc url '{}': {}", config.rpc_url, e)))?;
        let rpc = HttpClient::new(url)
            .map_err(|e| ChainError::Rpc(format!("failed to create client for '{}': {}", config.rpc_url, e)))?;

        let client = Self {
            rpc,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
        };

        // Verify chain ID matches configuration
        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %client.config.rpc_url,
                    chain_id = %client.config.chain_id,
                    "Node client initialized"
                );
            }
            Err(e) => {
                // Signing binds the chain id anyway; a wrong node fails at broadcast.
                tracing::warn!(
                    error = %e,
                    "Node client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let actual = self.get_chain_id().await?;
        if actual != self.config.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.config.chain_id.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Get the chain ID reported by the node.
    pub async fn get_chain_id(&self) -> ChainResult<String> {
        let status = self.call("status", self.rpc.status()).await?;
        Ok(status.node_info.network.to_string())
    }

    async fn call<T, F>(&self, method: &str, fut: F) -> ChainResult<T>
    where
        F: Future<Output = Result<T, cosmrs::rpc::Error>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(ChainError::Rpc(format!("{} failed: {}", method, e))),
            Err(_) => Err(ChainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }
}

#[async_trait]
impl ChainNode for NodeClient {
    async fn account(&self, address: &AccountId) -> ChainResult<AccountInfo> {
        let request = QueryAccountRequest {
            address: address.to_string(),
        };
        let response = self
            .call(
                "abci_query",
                self.rpc.abci_query(
                    Some(ACCOUNT_QUERY_PATH.to_string()),
                    request.encode_to_vec(),
                    None,
                    false,
                ),
            )
            .await?;

        if response.code.is_err() {
            if response.log.contains("not found") {
                return Err(ChainError::AccountNotFound(address.to_string()));
            }
            return Err(ChainError::Query {
                code: response.code.value(),
                log: response.log,
            });
        }

        let info = decode_account(&response.value)?;
        tracing::debug!(
            address = %address,
            account_number = info.account_number,
            sequence = info.sequence,
            "Fetched account"
        );
        Ok(info)
    }

    async fn broadcast_commit(&self, tx_bytes: Vec<u8>) -> ChainResult<BroadcastOutcome> {
        let response = self
            .call("broadcast_tx_commit", self.rpc.broadcast_tx_commit(tx_bytes))
            .await?;

        if response.check_tx.code.is_err() {
            return Err(ChainError::CheckTx {
                code: response.check_tx.code.value(),
                log: response.check_tx.log,
            });
        }
        if response.tx_result.code.is_err() {
            return Err(ChainError::DeliverTx {
                code: response.tx_result.code.value(),
                log: response.tx_result.log,
            });
        }

        Ok(BroadcastOutcome {
            hash: response.hash.to_string(),
            height: response.height.value(),
        })
    }
}

/// Decode a `QueryAccountResponse` holding a `BaseAccount`.
pub fn decode_account(bytes: &[u8]) -> ChainResult<AccountInfo> {
    let response = QueryAccountResponse::decode(bytes)
        .map_err(|e| ChainError::Encoding(format!("QueryAccountResponse: {}", e)))?;
    let any = response
        .account
        .ok_or_else(|| ChainError::Encoding("account missing from query response".to_string()))?;

    if any.type_url != BASE_ACCOUNT_TYPE_URL {
        return Err(ChainError::UnsupportedAccount(any.type_url));
    }

    let account = BaseAccount::decode(any.value.as_slice())
        .map_err(|e| ChainError::Encoding(format!("BaseAccount: {}", e)))?;

    Ok(AccountInfo {
        account_number: account.account_number,
        sequence: account.sequence,
    })
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
