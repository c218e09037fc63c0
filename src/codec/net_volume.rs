/*
 * Normalization of getNetVolume results
 */

use ethers::abi::Token;
use ethers::types::I256;
use crate::models::{NetVolumeResult, NvoError, Result};

pub const TOKEN0_FIELD: &str = "token0NetVolume";
pub const TOKEN1_FIELD: &str = "token1NetVolume";

/// Output layout declared by the oracle ABI for a `getNetVolume` overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultShape {
    /// Single struct output; component names in declaration order.
    Named(Vec<String>),
    Positional,
}

/// A `getNetVolume` result before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNetVolume {
    Named(Vec<(String, I256)>),
    Positional(Vec<I256>),
}

impl RawNetVolume {
    /// Builds the raw result from ABI-decoded output tokens.
    ///
    /// A single tuple output is unwrapped first, so a struct return and a
    /// multi-value return both reduce to a flat list of integers.
    pub fn from_tokens(shape: &ResultShape, tokens: Vec<Token>) -> Result<Self> {
        let fields = match <[Token; 1]>::try_from(tokens) {
            Ok([Token::Tuple(inner)]) => inner,
            Ok([single]) => vec![single],
            Err(tokens) => tokens,
        };

        let values = fields
            .into_iter()
            .map(token_to_i256)
            .collect::<Result<Vec<_>>>()?;

        match shape {
            ResultShape::Named(names) => {
                if names.len() != values.len() {
                    return Err(NvoError::DecodeFailed(format!(
                        "expected {} named fields, got {}",
                        names.len(),
                        values.len()
                    )));
                }
                Ok(RawNetVolume::Named(names.iter().cloned().zip(values).collect()))
            }
            ResultShape::Positional => Ok(RawNetVolume::Positional(values)),
        }
    }
}

pub fn decode_net_volume_result(raw: RawNetVolume) -> Result<NetVolumeResult> {
    match raw {
        RawNetVolume::Named(fields) => {
            let lookup = |name: &str| {
                fields
                    .iter()
                    .find(|(field, _)| field == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| NvoError::DecodeFailed(format!("missing field {name}")))
            };
            Ok(NetVolumeResult {
                token0_net_volume: lookup(TOKEN0_FIELD)?,
                token1_net_volume: lookup(TOKEN1_FIELD)?,
            })
        }
        RawNetVolume::Positional(values) => match values.as_slice() {
            [token0, token1] => Ok(NetVolumeResult {
                token0_net_volume: *token0,
                token1_net_volume: *token1,
            }),
            other => Err(NvoError::DecodeFailed(format!(
                "expected 2 values, got {}",
                other.len()
            ))),
        },
    }
}

fn token_to_i256(token: Token) -> Result<I256> {
    match token {
        Token::Int(raw) => Ok(I256::from_raw(raw)),
        Token::Uint(raw) => I256::try_from(raw)
            .map_err(|_| NvoError::DecodeFailed(format!("{raw} exceeds int256 range"))),
        other => Err(NvoError::DecodeFailed(format!("expected an integer, got {other:?}"))),
    }
}
