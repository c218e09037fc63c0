/*
 * Contract interface descriptions for the token, swap router and oracle hook
 */

mod oracle;

use ethers::abi::{Abi, Function};
use serde::Deserialize;
use std::path::Path;
use crate::models::{NvoError, Result};

pub use oracle::{EndTimeSupport, OracleInterface, NET_VOLUME_FUNCTION};

const MOCK_ERC20_ABI: &str = include_str!("../../abis/MockERC20.json");
const POOL_SWAP_TEST_ABI: &str = include_str!("../../abis/PoolSwapTest.json");
const NET_VOLUME_ORACLE_ABI: &str = include_str!("../../abis/NetVolumeOracle.json");

/// A parsed ABI plus the raw parameter names ethers drops from tuple types.
#[derive(Debug, Clone)]
pub struct ContractInterface {
    name: String,
    abi: Abi,
    entries: Vec<AbiEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
    #[serde(default)]
    outputs: Vec<AbiParam>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub components: Vec<AbiParam>,
}

impl ContractInterface {
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let abi: Abi = serde_json::from_str(json)
            .map_err(|e| NvoError::AbiError(format!("Invalid {name} ABI: {e}")))?;
        let entries: Vec<AbiEntry> = serde_json::from_str(json)?;

        Ok(Self {
            name: name.to_string(),
            abi,
            entries,
        })
    }

    pub fn from_file(name: &str, path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            NvoError::ConfigError(format!("Cannot read {name} ABI at {}: {e}", path.display()))
        })?;
        Self::from_json(name, &json)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The overload of `function` taking exactly `arity` inputs.
    pub fn function(&self, function: &str, arity: usize) -> Result<&Function> {
        self.abi
            .functions_by_name(function)
            .map_err(|e| NvoError::AbiError(format!("{}.{function}: {e}", self.name)))?
            .iter()
            .find(|f| f.inputs.len() == arity)
            .ok_or_else(|| {
                NvoError::AbiError(format!(
                    "{} has no {function} overload with {arity} inputs",
                    self.name
                ))
            })
    }

    /// Input counts of every declared overload of `function`.
    #[must_use]
    pub fn overload_arities(&self, function: &str) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|e| e.kind == "function" && e.name == function)
            .map(|e| e.inputs.len())
            .collect()
    }

    #[must_use]
    pub fn declared_outputs(&self, function: &str, arity: usize) -> Option<&[AbiParam]> {
        self.entries
            .iter()
            .find(|e| e.kind == "function" && e.name == function && e.inputs.len() == arity)
            .map(|e| e.outputs.as_slice())
    }
}

pub struct Contracts {
    pub token: ContractInterface,
    pub swap_router: ContractInterface,
    pub oracle: OracleInterface,
}

impl Contracts {
    /// Loads the bundled ABIs, replacing the oracle's with `oracle_abi_path` when given.
    pub fn load(oracle_abi_path: Option<&Path>) -> Result<Self> {
        let oracle = match oracle_abi_path {
            Some(path) => ContractInterface::from_file("NetVolumeOracle", path)?,
            None => ContractInterface::from_json("NetVolumeOracle", NET_VOLUME_ORACLE_ABI)?,
        };

        Ok(Self {
            token: ContractInterface::from_json("MockERC20", MOCK_ERC20_ABI)?,
            swap_router: ContractInterface::from_json("PoolSwapTest", POOL_SWAP_TEST_ABI)?,
            oracle: OracleInterface::new(oracle)?,
        })
    }
}
