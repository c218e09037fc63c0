/*
 * Demo service that runs each user action: encode, call, decode
 */

use chrono::Utc;
use ethers::abi::Token;
use ethers::types::{Address, TransactionReceipt, H256, U256};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};
use crate::{
    codec::{self, RawNetVolume},
    config::{Config, DeploymentConfig},
    contracts::{ContractInterface, Contracts, EndTimeSupport},
    dex::uniswap_v4::{PoolKey, TestSettings},
    metrics::Metrics,
    models::{
        Balances, NetVolumeReport, NvoError, Result, SessionInfo, TimeRange, TokenBalance, TokenDescriptor,
        TransactionOutcome,
    },
    rpc::{ContractReader, RpcClient},
    wallet::{LocalSession, Session},
};

pub struct DemoService {
    deployment: DeploymentConfig,
    pool_key: PoolKey,
    reader: Arc<dyn ContractReader>,
    session: Arc<dyn Session>,
    contracts: Contracts,
    metrics: Arc<Metrics>,
}

impl DemoService {
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Initializing Net Volume Oracle demo service");

        let rpc = Arc::new(RpcClient::new(&config.chain.rpc_url, config.chain.chain_id).await?);
        info!("Connected to RPC {} (chain {})", config.chain.rpc_url, rpc.chain_id());

        let contracts = Contracts::load(config.deployment.oracle_abi_path.as_deref())?;
        info!(
            "Oracle getNetVolume end time support: {:?}",
            contracts.oracle.end_time_support()
        );

        let session = Arc::new(LocalSession::new(
            (*rpc.provider()).clone(),
            rpc.chain_id(),
            config.wallet.private_key.clone(),
        ));
        if config.wallet.auto_connect {
            session.connect().await?;
        }

        let metrics = Arc::new(Metrics::new()?);

        Ok(Self::from_parts(config.deployment.clone(), rpc, session, contracts, metrics))
    }

    #[must_use]
    pub fn from_parts(
        deployment: DeploymentConfig,
        reader: Arc<dyn ContractReader>,
        session: Arc<dyn Session>,
        contracts: Contracts,
        metrics: Arc<Metrics>,
    ) -> Self {
        let pool_key = PoolKey::new(
            deployment.token0.address,
            deployment.token1.address,
            deployment.pool_fee,
            deployment.tick_spacing,
            deployment.hook_address,
        );
        info!("Pool id {}", pool_key.id_hex());

        Self {
            deployment,
            pool_key,
            reader,
            session,
            contracts,
            metrics,
        }
    }

    #[must_use]
    pub fn pool_key(&self) -> &PoolKey {
        &self.pool_key
    }

    #[must_use]
    pub fn end_time_support(&self) -> EndTimeSupport {
        self.contracts.oracle.end_time_support()
    }

    #[must_use]
    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    pub async fn session_info(&self) -> SessionInfo {
        self.session.info().await
    }

    pub async fn connect(&self) -> Result<SessionInfo> {
        self.tracked("connect", self.session.connect()).await?;
        Ok(self.session.info().await)
    }

    pub async fn disconnect(&self) -> SessionInfo {
        self.session.disconnect().await;
        self.session.info().await
    }

    /// Looks a configured token up by symbol (case-insensitive) or address.
    pub fn token(&self, key: &str) -> Result<&TokenDescriptor> {
        let key = key.trim();
        let by_address = crate::utils::parse_address(key).ok();

        [&self.deployment.token0, &self.deployment.token1]
            .into_iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(key) || Some(t.address) == by_address)
            .ok_or_else(|| NvoError::UnknownToken(key.to_string()))
    }

    /// The configured token sitting in the pool's `currency0` slot.
    fn currency0(&self) -> &TokenDescriptor {
        if self.deployment.token0.address == self.pool_key.currency0 {
            &self.deployment.token0
        } else {
            &self.deployment.token1
        }
    }

    pub async fn balances(&self) -> Result<Balances> {
        self.tracked("balances", self.fetch_balances()).await
    }

    pub async fn mint(&self, token: &str, amount: &str) -> Result<TransactionOutcome> {
        self.tracked("mint", self.execute_mint(token, amount)).await
    }

    pub async fn swap(&self, token_in: &str, amount: &str) -> Result<TransactionOutcome> {
        self.tracked("swap", self.execute_swap(token_in, amount)).await
    }

    pub async fn net_volume(&self, range: TimeRange) -> Result<NetVolumeReport> {
        self.tracked("net_volume", self.query_net_volume(range)).await
    }

    async fn tracked<T, F>(&self, action: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let running = self.metrics.action_started(action);
        if running > 0 {
            warn!(
                "{} started while {} earlier {} still in flight; duplicate submissions are possible",
                action, running, action
            );
        }

        let result = fut.await;

        match &result {
            Ok(_) => self.metrics.action_finished(action, "ok"),
            Err(e) => {
                if e.is_validation() {
                    warn!("{} rejected: {}", action, e);
                } else {
                    error!("{} failed: {}", action, e);
                }
                self.metrics.action_finished(action, e.kind());
            }
        }

        result
    }

    async fn connected_account(&self) -> Result<Address> {
        self.session.account().await.ok_or(NvoError::NotConnected)
    }

    async fn fetch_balances(&self) -> Result<Balances> {
        let account = self.connected_account().await?;

        let (balance0, balance1) = tokio::try_join!(
            self.balance_of(&self.deployment.token0, account),
            self.balance_of(&self.deployment.token1, account)
        )?;

        Ok(Balances {
            account,
            tokens: vec![balance0, balance1],
        })
    }

    /// Balance refresh after a confirmed write. The write already landed, so a failed read
    /// is logged and does not fail the action.
    async fn refreshed_balances(&self) -> Option<Balances> {
        self.fetch_balances()
            .await
            .map_err(|e| warn!("Balance refresh after confirmation failed: {}", e))
            .ok()
    }

    async fn balance_of(&self, token: &TokenDescriptor, account: Address) -> Result<TokenBalance> {
        let raw = self
            .read_uint(token.address, "balanceOf", vec![Token::Address(account)])
            .await?;

        Ok(TokenBalance {
            symbol: token.symbol.clone(),
            address: token.address,
            raw: raw.to_string(),
            display: codec::decode_amount(raw, token.decimals),
        })
    }

    async fn read_uint(&self, address: Address, function: &str, args: Vec<Token>) -> Result<U256> {
        let function = self.contracts.token.function(function, args.len())?;
        let output = self.reader.read_contract(address, function, args).await?;

        match output.as_slice() {
            [Token::Uint(value)] => Ok(*value),
            other => Err(NvoError::DecodeFailed(format!(
                "{} returned {other:?}",
                function.name
            ))),
        }
    }

    async fn submit(
        &self,
        interface: &ContractInterface,
        address: Address,
        function: &str,
        args: Vec<Token>,
    ) -> Result<TransactionReceipt> {
        let function = interface.function(function, args.len())?;

        let tx_hash: H256 = self.session.write_contract(address, function, args).await?;
        info!("{} submitted: {:?}", function.name, tx_hash);

        let receipt = self.session.wait_for_confirmation(tx_hash).await?;
        info!(
            "{} confirmed in block {:?}",
            function.name,
            receipt.block_number.map(|b| b.as_u64())
        );
        Ok(receipt)
    }

    async fn execute_mint(&self, token: &str, amount: &str) -> Result<TransactionOutcome> {
        let token = self.token(token)?;
        let account = self.connected_account().await?;
        let amount_raw = codec::encode_amount(amount, token.decimals)?;

        info!("Minting {} {} ({} base units) to {:?}", amount.trim(), token.symbol, amount_raw, account);

        let args = codec::build_mint_args(account, amount_raw);
        let receipt = self
            .submit(&self.contracts.token, token.address, "mint", args.into_tokens())
            .await?;

        Ok(TransactionOutcome {
            action: "mint".to_string(),
            token: token.symbol.clone(),
            amount_raw: amount_raw.to_string(),
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|b| b.as_u64()),
            zero_for_one: None,
            balances: self.refreshed_balances().await,
        })
    }

    async fn execute_swap(&self, token_in: &str, amount: &str) -> Result<TransactionOutcome> {
        let token_in = self.token(token_in)?;
        let account = self.connected_account().await?;
        let amount_raw = codec::encode_amount(amount, token_in.decimals)?;
        if amount_raw.is_zero() {
            return Err(NvoError::InvalidAmount("swap amount must be greater than zero".to_string()));
        }

        let params = codec::build_swap_params(token_in, self.currency0(), amount_raw)?;
        info!(
            "Swapping {} {} exact input, zero_for_one={}",
            amount.trim(),
            token_in.symbol,
            params.zero_for_one
        );

        self.ensure_allowance(token_in, account, amount_raw).await?;

        let args = codec::build_swap_call(self.pool_key, params, TestSettings::default());
        let receipt = self
            .submit(&self.contracts.swap_router, self.deployment.swap_router_address, "swap", args)
            .await?;

        Ok(TransactionOutcome {
            action: "swap".to_string(),
            token: token_in.symbol.clone(),
            amount_raw: amount_raw.to_string(),
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|b| b.as_u64()),
            zero_for_one: Some(params.zero_for_one),
            balances: self.refreshed_balances().await,
        })
    }

    /// Approves the swap router for `amount` when its current allowance falls short.
    async fn ensure_allowance(&self, token: &TokenDescriptor, owner: Address, amount: U256) -> Result<()> {
        let router = self.deployment.swap_router_address;
        let allowance = self
            .read_uint(token.address, "allowance", vec![Token::Address(owner), Token::Address(router)])
            .await?;

        if allowance >= amount {
            return Ok(());
        }

        info!("Approving router {:?} for {} {} base units", router, amount, token.symbol);
        self.submit(
            &self.contracts.token,
            token.address,
            "approve",
            vec![Token::Address(router), Token::Uint(amount)],
        )
        .await?;
        Ok(())
    }

    async fn query_net_volume(&self, range: TimeRange) -> Result<NetVolumeReport> {
        let oracle = &self.contracts.oracle;
        if range.end.is_some() && !oracle.end_time_support().accepts_end_time() {
            return Err(NvoError::UnsupportedArgument(
                "oracle getNetVolume does not take an end time".to_string(),
            ));
        }

        let query = codec::build_net_volume_query_args(
            &self.pool_key,
            &range,
            oracle.end_time_support().requires_end_time(),
        )?;
        let arity = query.arity();
        let function = oracle.function(arity)?;

        info!("Querying net volume from {} to {:?}", range.start, range.end);

        let output = self
            .reader
            .read_contract(self.deployment.hook_address, function, query.into_tokens())
            .await?;
        let raw = RawNetVolume::from_tokens(&oracle.result_shape(arity), output)?;
        let result = codec::decode_net_volume_result(raw)?;

        let currency0 = self.currency0();
        let currency1 = if currency0.address == self.deployment.token0.address {
            &self.deployment.token1
        } else {
            &self.deployment.token0
        };

        Ok(NetVolumeReport {
            pool_id: self.pool_key.id_hex(),
            start: range.start,
            end: range.end,
            token0_net_volume: result.token0_net_volume.to_string(),
            token1_net_volume: result.token1_net_volume.to_string(),
            token0_net_volume_display: codec::decode_signed_amount(result.token0_net_volume, currency0.decimals),
            token1_net_volume_display: codec::decode_signed_amount(result.token1_net_volume, currency1.decimals),
            queried_at_utc: Utc::now(),
        })
    }
}
