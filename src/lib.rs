/*
 * Net Volume Oracle demo service
 * Core library exports and module declarations
 */

pub mod api;
pub mod clock;
pub mod codec;
pub mod config;
pub mod contracts;
pub mod dex;
pub mod metrics;
pub mod models;
pub mod rpc;
pub mod service;
pub mod utils;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use models::*;
pub use service::DemoService;
