/*
 * DEX integration module for the Uniswap V4 pool and hook
 */

pub mod uniswap_v4;
