/*
 * Configuration management for the Net Volume Oracle demo service
 */

use crate::models::{NvoError, Result, TokenDescriptor};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub chain: ChainConfig,
    pub deployment: DeploymentConfig,
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
}

/// Deployment-specific addresses and pool parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeploymentConfig {
    pub token0: TokenDescriptor,
    pub token1: TokenDescriptor,
    pub pool_fee: u32,
    pub tick_spacing: i32,
    pub hook_address: Address,
    pub swap_router_address: Address,
    pub oracle_abi_path: Option<PathBuf>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct WalletConfig {
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
    pub auto_connect: bool,
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("auto_connect", &self.auto_connect)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let required = |name: &str| {
            lookup(name).ok_or_else(|| NvoError::ConfigError(format!("{name} not set")))
        };

        let token = |prefix: &str, name: &str, symbol: &str| -> Result<TokenDescriptor> {
            let address = parse_address(&format!("{prefix}_ADDRESS"), &required(&format!("{prefix}_ADDRESS"))?)?;
            let decimals = parse_number(&format!("{prefix}_DECIMALS"), &var(&format!("{prefix}_DECIMALS"), "18"))?;
            Ok(TokenDescriptor::new(
                address,
                var(&format!("{prefix}_NAME"), name),
                var(&format!("{prefix}_SYMBOL"), symbol),
                decimals,
            ))
        };

        let private_key = lookup("WALLET_PRIVATE_KEY").filter(|k| !k.trim().is_empty());
        let auto_connect = private_key.is_some()
            && parse_number::<bool>("WALLET_AUTO_CONNECT", &var("WALLET_AUTO_CONNECT", "true"))?;

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST", "0.0.0.0"),
                port: parse_number("SERVER_PORT", &var("SERVER_PORT", "8080"))?,
                log_level: var("LOG_LEVEL", "info"),
            },
            chain: ChainConfig {
                rpc_url: var("RPC_URL", "http://127.0.0.1:8545"),
                chain_id: parse_number("CHAIN_ID", &var("CHAIN_ID", "31337"))?,
            },
            deployment: DeploymentConfig {
                token0: token("TOKEN0", "Token1", "TK1")?,
                token1: token("TOKEN1", "Token2", "TK2")?,
                pool_fee: parse_number("POOL_FEE", &var("POOL_FEE", "3000"))?,
                tick_spacing: parse_number("POOL_TICK_SPACING", &var("POOL_TICK_SPACING", "60"))?,
                hook_address: parse_address("HOOK_ADDRESS", &required("HOOK_ADDRESS")?)?,
                swap_router_address: parse_address("SWAP_ROUTER_ADDRESS", &required("SWAP_ROUTER_ADDRESS")?)?,
                oracle_abi_path: lookup("ORACLE_ABI_PATH").map(PathBuf::from),
            },
            wallet: WalletConfig {
                private_key,
                auto_connect,
            },
        })
        .and_then(Config::validated)
    }

    fn validated(self) -> Result<Self> {
        let deployment = &self.deployment;
        if deployment.token0.address == deployment.token1.address {
            return Err(NvoError::ConfigError(
                "TOKEN0_ADDRESS and TOKEN1_ADDRESS must differ".to_string(),
            ));
        }
        if deployment.tick_spacing <= 0 {
            return Err(NvoError::ConfigError(format!(
                "POOL_TICK_SPACING must be positive, got {}",
                deployment.tick_spacing
            )));
        }
        if deployment.pool_fee >= 1 << 24 {
            return Err(NvoError::ConfigError(format!(
                "POOL_FEE must fit uint24, got {}",
                deployment.pool_fee
            )));
        }
        Ok(self)
    }
}

fn parse_address(name: &str, value: &str) -> Result<Address> {
    crate::utils::parse_address(value)
        .map_err(|e| NvoError::ConfigError(format!("Invalid {name}: {e}")))
}

fn parse_number<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| NvoError::ConfigError(format!("Invalid {name}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("TOKEN0_ADDRESS", "0x8464135c8f25da09e49bc8782676a84730c318bc"),
            ("TOKEN1_ADDRESS", "0x71c95911e9a5d330f4d621842ec243ee1343292e"),
            ("HOOK_ADDRESS", "0x5675fbC66019148AAb306C1aDf490fa12eD1D040"),
            ("SWAP_ROUTER_ADDRESS", "0x0165878A594ca255338adfa4d48449f69242Eb8F"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config> {
        Config::from_lookup(|name| vars.get(name).map(|v| (*v).to_string()))
    }

    #[test]
    fn defaults_are_applied() {
        let config = load(&base_vars()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.chain.chain_id, 31337);
        assert_eq!(config.deployment.token0.symbol, "TK1");
        assert_eq!(config.deployment.token1.decimals, 18);
        assert_eq!(config.deployment.pool_fee, 3000);
        assert_eq!(config.deployment.tick_spacing, 60);
        assert!(config.wallet.private_key.is_none());
        assert!(!config.wallet.auto_connect);
    }

    #[test]
    fn deployment_addresses_are_required() {
        let mut vars = base_vars();
        vars.remove("HOOK_ADDRESS");
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("HOOK_ADDRESS"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let mut vars = base_vars();
        vars.insert("TOKEN0_ADDRESS", "0x1234");
        assert!(matches!(load(&vars), Err(NvoError::ConfigError(_))));

        let mut vars = base_vars();
        vars.insert("POOL_TICK_SPACING", "0");
        assert!(matches!(load(&vars), Err(NvoError::ConfigError(_))));

        let mut vars = base_vars();
        vars.insert("SERVER_PORT", "http");
        assert!(matches!(load(&vars), Err(NvoError::ConfigError(_))));
    }

    #[test]
    fn private_key_enables_auto_connect_and_is_redacted() {
        let mut vars = base_vars();
        vars.insert("WALLET_PRIVATE_KEY", "0xdeadbeef");
        let config = load(&vars).unwrap();
        assert!(config.wallet.auto_connect);
        assert!(!format!("{:?}", config.wallet).contains("deadbeef"));
    }
}
