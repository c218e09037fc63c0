/*
 * Net Volume Oracle hook interface and its getNetVolume overloads
 */

use ethers::abi::Function;
use serde::Serialize;
use super::ContractInterface;
use crate::codec::ResultShape;
use crate::models::{NvoError, Result};

pub const NET_VOLUME_FUNCTION: &str = "getNetVolume";

const START_ONLY_ARITY: usize = 2;
const START_AND_END_ARITY: usize = 3;

/// Which `getNetVolume` overloads the deployed oracle exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndTimeSupport {
    /// Both `(key, start)` and `(key, start, end)`.
    Optional,
    /// Only `(key, start, end)`.
    Required,
    /// Only `(key, start)`.
    Unsupported,
}

impl EndTimeSupport {
    #[must_use]
    pub fn requires_end_time(self) -> bool {
        self == EndTimeSupport::Required
    }

    #[must_use]
    pub fn accepts_end_time(self) -> bool {
        self != EndTimeSupport::Unsupported
    }
}

#[derive(Debug, Clone)]
pub struct OracleInterface {
    interface: ContractInterface,
    end_time_support: EndTimeSupport,
}

impl OracleInterface {
    /// Resolves the end-time capability once from the interface description.
    pub fn new(interface: ContractInterface) -> Result<Self> {
        let arities = interface.overload_arities(NET_VOLUME_FUNCTION);
        let start_only = arities.contains(&START_ONLY_ARITY);
        let start_and_end = arities.contains(&START_AND_END_ARITY);

        let end_time_support = match (start_only, start_and_end) {
            (true, true) => EndTimeSupport::Optional,
            (false, true) => EndTimeSupport::Required,
            (true, false) => EndTimeSupport::Unsupported,
            (false, false) => {
                return Err(NvoError::ConfigError(format!(
                    "{} declares no usable {NET_VOLUME_FUNCTION} overload (found arities {arities:?})",
                    interface.name()
                )))
            }
        };

        Ok(Self {
            interface,
            end_time_support,
        })
    }

    #[must_use]
    pub fn end_time_support(&self) -> EndTimeSupport {
        self.end_time_support
    }

    pub fn function(&self, arity: usize) -> Result<&Function> {
        self.interface.function(NET_VOLUME_FUNCTION, arity)
    }

    /// Named when every declared output (or every component of a single
    /// struct output) carries a name, positional otherwise.
    #[must_use]
    pub fn result_shape(&self, arity: usize) -> ResultShape {
        let Some(outputs) = self.interface.declared_outputs(NET_VOLUME_FUNCTION, arity) else {
            return ResultShape::Positional;
        };

        let fields = match outputs {
            [single] if single.kind.starts_with("tuple") && !single.components.is_empty() => {
                single.components.as_slice()
            }
            _ => outputs,
        };

        if !fields.is_empty() && fields.iter().all(|p| !p.name.is_empty()) {
            ResultShape::Named(fields.iter().map(|p| p.name.clone()).collect())
        } else {
            ResultShape::Positional
        }
    }
}
