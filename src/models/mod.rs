/*
 * Data models and types for the Net Volume Oracle demo service
 */

use chrono::{DateTime, Utc};
use ethers::types::{Address, H256, I256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenDescriptor {
    #[must_use]
    pub fn new(address: Address, name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Query window in UNIX seconds. A missing `end` means "up to latest".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl TimeRange {
    #[must_use]
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetVolumeResult {
    pub token0_net_volume: I256,
    pub token1_net_volume: I256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub status: SessionStatus,
    pub account: Option<Address>,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub address: Address,
    pub raw: String,
    pub display: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balances {
    pub account: Address,
    pub tokens: Vec<TokenBalance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub action: String,
    pub token: String,
    pub amount_raw: String,
    pub tx_hash: H256,
    pub block_number: Option<u64>,
    pub zero_for_one: Option<bool>,
    /// Post-confirmation balances; `None` when the refresh read failed.
    pub balances: Option<Balances>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetVolumeReport {
    pub pool_id: String,
    pub start: u64,
    pub end: Option<u64>,
    pub token0_net_volume: String,
    pub token1_net_volume: String,
    pub token0_net_volume_display: String,
    pub token1_net_volume_display: String,
    pub queried_at_utc: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum NvoError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),

    #[error("Unsupported argument: {0}")]
    UnsupportedArgument(String),

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Remote call failed: {0}")]
    RemoteCallFailed(String),

    #[error("Failed to decode result: {0}")]
    DecodeFailed(String),

    #[error("ABI error: {0}")]
    AbiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl NvoError {
    /// Stable identifier used in API error bodies and metric labels.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            NvoError::InvalidAmount(_) => "invalid_amount",
            NvoError::InvalidAddress(_) => "invalid_address",
            NvoError::UnknownToken(_) => "unknown_token",
            NvoError::MissingRequiredArgument(_) => "missing_required_argument",
            NvoError::UnsupportedArgument(_) => "unsupported_argument",
            NvoError::NotConnected => "not_connected",
            NvoError::RemoteCallFailed(_) => "remote_call_failed",
            NvoError::DecodeFailed(_) => "decode_failed",
            NvoError::AbiError(_) => "abi_error",
            NvoError::ConfigError(_) => "config_error",
            NvoError::SerializationError(_) => "serialization_error",
        }
    }

    /// True for failures detected before anything goes over the wire.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NvoError::InvalidAmount(_)
                | NvoError::InvalidAddress(_)
                | NvoError::UnknownToken(_)
                | NvoError::MissingRequiredArgument(_)
                | NvoError::UnsupportedArgument(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NvoError>;
