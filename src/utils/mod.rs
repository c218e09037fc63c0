/*
 * Utility functions and helpers
 */

use chrono::{DateTime, Utc};
use ethers::types::Address;
use std::str::FromStr;
use crate::models::{NvoError, Result};

/// Parses a `0x`-prefixed 20-byte hex address. Checksum casing is not enforced.
pub fn parse_address(address: &str) -> Result<Address> {
    let address = address.trim();
    if !address.starts_with("0x") || address.len() != 42 {
        return Err(NvoError::InvalidAddress(format!("Invalid address format: {address}")));
    }
    Address::from_str(address).map_err(|e| NvoError::InvalidAddress(format!("{address}: {e}")))
}

#[must_use]
pub fn unix_seconds(time: DateTime<Utc>) -> u64 {
    u64::try_from(time.timestamp()).unwrap_or(0)
}
