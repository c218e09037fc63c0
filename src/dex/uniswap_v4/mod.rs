/*
 * Uniswap V4 integration module
 */

mod types;

use ethers::types::U256;

pub use types::{PoolKey, SwapParams, TestSettings};

/// `TickMath.MIN_SQRT_PRICE + 1`, the lowest price limit a zero-for-one swap may pass.
pub const MIN_PRICE_LIMIT: U256 = U256([4_295_128_740, 0, 0, 0]);

/// `TickMath.MAX_SQRT_PRICE - 1`, the highest price limit a one-for-zero swap may pass.
/// Decimal: 1461446703485210103287273052203988822378723970341.
pub const MAX_PRICE_LIMIT: U256 = U256([
    0x5d95_1d52_6398_8d25,
    0xefd1_fc6a_5064_8849,
    0xfffd_8963,
    0,
]);
