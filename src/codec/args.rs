/*
 * Positional argument builders for the token, swap router and oracle calls
 */

use ethers::abi::Token;
use ethers::types::{Address, I256, U256};
use crate::dex::uniswap_v4::{PoolKey, SwapParams, TestSettings, MAX_PRICE_LIMIT, MIN_PRICE_LIMIT};
use crate::models::{NvoError, Result, TimeRange, TokenDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintArgs {
    pub to: Address,
    pub amount: U256,
}

impl MintArgs {
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        vec![Token::Address(self.to), Token::Uint(self.amount)]
    }
}

#[must_use]
pub fn build_mint_args(account: Address, amount: U256) -> MintArgs {
    MintArgs { to: account, amount }
}

/// Exact-input swap of `amount_in` base units of `token_in`.
pub fn build_swap_params(
    token_in: &TokenDescriptor,
    token0: &TokenDescriptor,
    amount_in: U256,
) -> Result<SwapParams> {
    let zero_for_one = token_in.address == token0.address;

    let magnitude = I256::try_from(amount_in).map_err(|_| {
        NvoError::InvalidAmount(format!("swap amount {amount_in} exceeds int256 range"))
    })?;

    let sqrt_price_limit_x96 = if zero_for_one {
        MIN_PRICE_LIMIT
    } else {
        MAX_PRICE_LIMIT
    };

    Ok(SwapParams {
        zero_for_one,
        amount_specified: -magnitude,
        sqrt_price_limit_x96,
    })
}

/// Arguments for `PoolSwapTest.swap(key, params, testSettings, hookData)`.
#[must_use]
pub fn build_swap_call(pool_key: PoolKey, params: SwapParams, settings: TestSettings) -> Vec<Token> {
    vec![
        pool_key.into_token(),
        params.into_token(),
        settings.into_token(),
        Token::Bytes(Vec::new()),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetVolumeQuery {
    pub pool_key: PoolKey,
    pub start: u64,
    pub end: Option<u64>,
}

impl NetVolumeQuery {
    /// Number of inputs of the `getNetVolume` overload these arguments target.
    #[must_use]
    pub fn arity(&self) -> usize {
        if self.end.is_some() {
            3
        } else {
            2
        }
    }

    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        let mut tokens = vec![self.pool_key.into_token(), Token::Uint(U256::from(self.start))];
        if let Some(end) = self.end {
            tokens.push(Token::Uint(U256::from(end)));
        }
        tokens
    }
}

/// `requires_end_time` is true when the oracle only exposes the
/// `(key, start, end)` overload, in which case `end` cannot be omitted.
pub fn build_net_volume_query_args(
    pool_key: &PoolKey,
    range: &TimeRange,
    requires_end_time: bool,
) -> Result<NetVolumeQuery> {
    if range.end.is_none() && requires_end_time {
        return Err(NvoError::MissingRequiredArgument(
            "end time is required by the oracle's getNetVolume".to_string(),
        ));
    }

    Ok(NetVolumeQuery {
        pool_key: *pool_key,
        start: range.start,
        end: range.end,
    })
}
