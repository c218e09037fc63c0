/*
 * Uniswap V4 types and structures
 */

use ethers::abi::{encode, Token};
use ethers::types::{Address, I256, U256};
use ethers::utils::{hex, keccak256};
use serde::{Deserialize, Serialize};

/// Must match the key the pool was initialized with field for field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolKey {
    pub currency0: Address,
    pub currency1: Address,
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: Address,
}

impl PoolKey {
    /// Builds a key with the two currencies in canonical (ascending) order.
    #[must_use]
    pub fn new(token_a: Address, token_b: Address, fee: u32, tick_spacing: i32, hooks: Address) -> Self {
        let (currency0, currency1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        Self {
            currency0,
            currency1,
            fee,
            tick_spacing,
            hooks,
        }
    }

    #[must_use]
    pub fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::Address(self.currency0),
            Token::Address(self.currency1),
            Token::Uint(self.fee.into()),
            Token::Int(I256::from(self.tick_spacing).into_raw()),
            Token::Address(self.hooks),
        ])
    }

    #[must_use]
    pub fn to_id(&self) -> [u8; 32] {
        let encoded = encode(&[
            Token::Address(self.currency0),
            Token::Address(self.currency1),
            Token::Uint(self.fee.into()),
            Token::Int(I256::from(self.tick_spacing).into_raw()),
            Token::Address(self.hooks),
        ]);

        keccak256(encoded)
    }

    #[must_use]
    pub fn id_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_id()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapParams {
    pub zero_for_one: bool,
    /// Negative for exact input.
    pub amount_specified: I256,
    pub sqrt_price_limit_x96: U256,
}

impl SwapParams {
    #[must_use]
    pub fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::Bool(self.zero_for_one),
            Token::Int(self.amount_specified.into_raw()),
            Token::Uint(self.sqrt_price_limit_x96),
        ])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestSettings {
    pub take_claims: bool,
    pub settle_using_burn: bool,
}

impl TestSettings {
    #[must_use]
    pub fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::Bool(self.take_claims),
            Token::Bool(self.settle_using_burn),
        ])
    }
}
