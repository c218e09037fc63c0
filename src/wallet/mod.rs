/*
 * Wallet session: connection state, contract writes and confirmation waits
 */

use async_trait::async_trait;
use ethers::abi::{Function, Token};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, PendingTransaction, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TransactionReceipt, TransactionRequest, H256, U64};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use crate::models::{NvoError, Result, SessionInfo, SessionStatus};

#[async_trait]
pub trait Session: Send + Sync {
    async fn info(&self) -> SessionInfo;

    async fn account(&self) -> Option<Address>;

    async fn connect(&self) -> Result<Address>;

    async fn disconnect(&self);

    /// Submits a state-changing call and returns its transaction hash.
    async fn write_contract(&self, address: Address, function: &Function, args: Vec<Token>) -> Result<H256>;

    /// Resolves once the transaction is included; a reverted receipt is an error.
    async fn wait_for_confirmation(&self, tx_hash: H256) -> Result<TransactionReceipt>;
}

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Session backed by a locally held private key.
pub struct LocalSession {
    provider: Provider<Http>,
    chain_id: u64,
    private_key: Option<String>,
    client: RwLock<Option<Arc<SignerClient>>>,
}

impl LocalSession {
    #[must_use]
    pub fn new(provider: Provider<Http>, chain_id: u64, private_key: Option<String>) -> Self {
        Self {
            provider,
            chain_id,
            private_key,
            client: RwLock::new(None),
        }
    }

    async fn client(&self) -> Result<Arc<SignerClient>> {
        self.client.read().await.clone().ok_or(NvoError::NotConnected)
    }
}

#[async_trait]
impl Session for LocalSession {
    async fn info(&self) -> SessionInfo {
        let account = self.account().await;
        SessionInfo {
            status: if account.is_some() {
                SessionStatus::Connected
            } else {
                SessionStatus::Disconnected
            },
            account,
            chain_id: self.chain_id,
        }
    }

    async fn account(&self) -> Option<Address> {
        self.client.read().await.as_ref().map(|c| c.address())
    }

    async fn connect(&self) -> Result<Address> {
        let key = self
            .private_key
            .as_deref()
            .ok_or_else(|| NvoError::ConfigError("WALLET_PRIVATE_KEY not set".to_string()))?;

        let wallet = LocalWallet::from_str(key)
            .map_err(|e| NvoError::ConfigError(format!("Invalid wallet private key: {e}")))?
            .with_chain_id(self.chain_id);
        let address = wallet.address();

        let client = SignerMiddleware::new(self.provider.clone(), wallet);
        *self.client.write().await = Some(Arc::new(client));

        info!("Wallet connected: {:?}", address);
        Ok(address)
    }

    async fn disconnect(&self) {
        if self.client.write().await.take().is_some() {
            info!("Wallet disconnected");
        }
    }

    async fn write_contract(&self, address: Address, function: &Function, args: Vec<Token>) -> Result<H256> {
        let client = self.client().await?;

        let call_data = function
            .encode_input(&args)
            .map_err(|e| NvoError::AbiError(format!("Failed to encode {}: {e}", function.name)))?;

        let tx = TransactionRequest::new()
            .from(client.address())
            .to(address)
            .data(call_data);

        let pending = client
            .send_transaction(tx, None)
            .await
            .map_err(|e| NvoError::RemoteCallFailed(format!("Failed to send {}: {e}", function.name)))?;

        Ok(pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, tx_hash: H256) -> Result<TransactionReceipt> {
        let receipt = PendingTransaction::new(tx_hash, &self.provider)
            .await
            .map_err(|e| NvoError::RemoteCallFailed(format!("Failed waiting for {tx_hash:?}: {e}")))?
            .ok_or_else(|| NvoError::RemoteCallFailed(format!("Transaction {tx_hash:?} was dropped")))?;

        if receipt.status == Some(U64::zero()) {
            warn!("Transaction {:?} reverted", tx_hash);
            return Err(NvoError::RemoteCallFailed(format!("Transaction {tx_hash:?} reverted")));
        }

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // First default anvil/hardhat account.
    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn session(key: Option<&str>) -> LocalSession {
        let provider = Provider::<Http>::try_from("http://127.0.0.1:8545").unwrap();
        LocalSession::new(provider, 31337, key.map(str::to_string))
    }

    #[tokio::test]
    async fn connect_and_disconnect_toggle_account() {
        let session = session(Some(TEST_KEY));
        assert!(session.account().await.is_none());

        let address = session.connect().await.unwrap();
        assert_eq!(address, Address::from_str(TEST_ADDRESS).unwrap());
        assert!(matches!(session.info().await.status, SessionStatus::Connected));

        session.disconnect().await;
        assert!(session.account().await.is_none());
        assert!(matches!(session.info().await.status, SessionStatus::Disconnected));
    }

    #[tokio::test]
    async fn connect_without_key_is_a_config_error() {
        let session = session(None);
        assert!(matches!(session.connect().await, Err(NvoError::ConfigError(_))));
    }

    #[tokio::test]
    async fn write_while_disconnected_is_not_connected() {
        let session = session(Some(TEST_KEY));
        let contracts = crate::contracts::Contracts::load(None).unwrap();
        let mint = contracts.token.function("mint", 2).unwrap();

        let result = session.write_contract(Address::zero(), mint, Vec::new()).await;
        assert!(matches!(result, Err(NvoError::NotConnected)));
    }
}
