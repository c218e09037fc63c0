/*
 * RPC client module for reading contracts over JSON-RPC
 */

use async_trait::async_trait;
use ethers::abi::{Function, Token};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Bytes, TransactionRequest};
use std::sync::Arc;
use tracing::debug;
use crate::models::{NvoError, Result};

/// Generic read of a contract function given its address, ABI entry and arguments.
#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn read_contract(&self, address: Address, function: &Function, args: Vec<Token>) -> Result<Vec<Token>>;
}

pub struct RpcClient {
    provider: Arc<Provider<Http>>,
    chain_id: u64,
}

impl RpcClient {
    pub async fn new(rpc_url: &str, chain_id: u64) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| NvoError::ConfigError(format!("Failed to create provider: {e}")))?;

        let chain = provider
            .get_chainid()
            .await
            .map_err(|e| NvoError::RemoteCallFailed(format!("Failed to get chain ID: {e}")))?;

        if chain.as_u64() != chain_id {
            return Err(NvoError::ConfigError(format!(
                "Chain ID mismatch: expected {}, got {}",
                chain_id,
                chain.as_u64()
            )));
        }

        Ok(Self {
            provider: Arc::new(provider),
            chain_id,
        })
    }

    #[must_use]
    pub fn provider(&self) -> Arc<Provider<Http>> {
        self.provider.clone()
    }

    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[async_trait]
impl ContractReader for RpcClient {
    async fn read_contract(&self, address: Address, function: &Function, args: Vec<Token>) -> Result<Vec<Token>> {
        let call_data = function
            .encode_input(&args)
            .map_err(|e| NvoError::AbiError(format!("Failed to encode {}: {e}", function.name)))?;

        let tx = TransactionRequest::new()
            .to(address)
            .data(Bytes::from(call_data));

        debug!("eth_call {} on {:?}", function.name, address);

        let result = self
            .provider
            .call(&tx.into(), None)
            .await
            .map_err(|e| NvoError::RemoteCallFailed(format!("Failed to call {}: {e}", function.name)))?;

        function
            .decode_output(&result)
            .map_err(|e| NvoError::DecodeFailed(format!("Invalid {} response: {e}", function.name)))
    }
}
