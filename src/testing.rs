/*
 * In-memory chain reader and wallet session for unit tests
 */

use async_trait::async_trait;
use ethers::abi::{Function, Token};
use ethers::types::{Address, TransactionReceipt, H256, U256, U64};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use crate::config::DeploymentConfig;
use crate::contracts::{ContractInterface, Contracts, OracleInterface};
use crate::metrics::Metrics;
use crate::models::{NvoError, Result, SessionInfo, SessionStatus, TokenDescriptor};
use crate::rpc::ContractReader;
use crate::service::DemoService;
use crate::wallet::Session;

pub const ACCOUNT: Address = Address::repeat_byte(0xaa);

pub type Call = (Address, String, Vec<Token>);

#[must_use]
pub fn deployment() -> DeploymentConfig {
    DeploymentConfig {
        token0: TokenDescriptor::new(Address::repeat_byte(0x11), "Token1", "TK1", 18),
        token1: TokenDescriptor::new(Address::repeat_byte(0x22), "Token2", "TK2", 18),
        pool_fee: 3000,
        tick_spacing: 60,
        hook_address: Address::repeat_byte(0x40),
        swap_router_address: Address::repeat_byte(0x50),
        oracle_abi_path: None,
    }
}

#[must_use]
pub fn service_with(reader: FakeReader, session: FakeSession) -> DemoService {
    DemoService::from_parts(
        deployment(),
        Arc::new(reader),
        Arc::new(session),
        Contracts::load(None).expect("bundled ABIs load"),
        Arc::new(Metrics::new().expect("metrics registry")),
    )
}

/// Bundled contracts with the oracle cut down to its `(key, start)` overload.
#[must_use]
pub fn start_only_oracle_contracts() -> Contracts {
    let mut contracts = Contracts::load(None).expect("bundled ABIs load");
    let abi: Vec<serde_json::Value> =
        serde_json::from_str(include_str!("../abis/NetVolumeOracle.json")).expect("oracle ABI is JSON");
    let start_only: Vec<_> = abi
        .into_iter()
        .filter(|entry| entry["inputs"].as_array().map_or(true, |inputs| inputs.len() == 2))
        .collect();

    let json = serde_json::to_string(&start_only).expect("oracle ABI serializes");
    let oracle = ContractInterface::from_json("NetVolumeOracle", &json).expect("start-only ABI parses");
    contracts.oracle = OracleInterface::new(oracle).expect("start-only oracle resolves");
    contracts
}

/// Answers reads from canned responses keyed by contract address and function name.
#[derive(Clone, Default)]
pub struct FakeReader {
    responses: Arc<Mutex<HashMap<(Address, String), Vec<Token>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_zero_balances() -> Self {
        let reader = Self::new();
        let deployment = deployment();
        for token in [deployment.token0.address, deployment.token1.address] {
            reader.respond(token, "balanceOf", vec![Token::Uint(U256::zero())]);
            reader.respond(token, "allowance", vec![Token::Uint(U256::MAX)]);
        }
        reader
    }

    pub fn respond(&self, address: Address, function: &str, output: Vec<Token>) {
        self.responses
            .lock()
            .unwrap()
            .insert((address, function.to_string()), output);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContractReader for FakeReader {
    async fn read_contract(&self, address: Address, function: &Function, args: Vec<Token>) -> Result<Vec<Token>> {
        self.calls
            .lock()
            .unwrap()
            .push((address, function.name.clone(), args));

        self.responses
            .lock()
            .unwrap()
            .get(&(address, function.name.clone()))
            .cloned()
            .ok_or_else(|| NvoError::RemoteCallFailed(format!("execution reverted: {}", function.name)))
    }
}

/// Records writes and confirms every transaction in block 7.
#[derive(Clone, Default)]
pub struct FakeSession {
    account: Arc<Mutex<Option<Address>>>,
    writes: Arc<Mutex<Vec<Call>>>,
}

impl FakeSession {
    #[must_use]
    pub fn connected() -> Self {
        let session = Self::default();
        *session.account.lock().unwrap() = Some(ACCOUNT);
        session
    }

    #[must_use]
    pub fn disconnected() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn writes(&self) -> Vec<Call> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn info(&self) -> SessionInfo {
        let account = *self.account.lock().unwrap();
        SessionInfo {
            status: if account.is_some() {
                SessionStatus::Connected
            } else {
                SessionStatus::Disconnected
            },
            account,
            chain_id: 31337,
        }
    }

    async fn account(&self) -> Option<Address> {
        *self.account.lock().unwrap()
    }

    async fn connect(&self) -> Result<Address> {
        *self.account.lock().unwrap() = Some(ACCOUNT);
        Ok(ACCOUNT)
    }

    async fn disconnect(&self) {
        *self.account.lock().unwrap() = None;
    }

    async fn write_contract(&self, address: Address, function: &Function, args: Vec<Token>) -> Result<H256> {
        if self.account.lock().unwrap().is_none() {
            return Err(NvoError::NotConnected);
        }
        function
            .encode_input(&args)
            .map_err(|e| NvoError::AbiError(e.to_string()))?;

        let mut writes = self.writes.lock().unwrap();
        writes.push((address, function.name.clone(), args));
        Ok(H256::from_low_u64_be(writes.len() as u64))
    }

    async fn wait_for_confirmation(&self, tx_hash: H256) -> Result<TransactionReceipt> {
        Ok(TransactionReceipt {
            transaction_hash: tx_hash,
            block_number: Some(U64::from(7)),
            status: Some(U64::one()),
            ..Default::default()
        })
    }
}
