//! Sui market-data domain: coin registry, provider types, and the
//! Aftermath aggregator client.
//!
//! The [`MarketData`] trait is the provider boundary. Everything above it
//! (the agent pipeline) is independent of how market data is fetched, which
//! keeps that layer testable against stub providers.

pub mod client;
pub mod coins;
mod error;
pub mod types;

pub use client::{AftermathClient, MarketData};
pub use coins::CoinRegistry;
pub use error::{Error, Result};
pub use types::{DcaOrder, Network, PoolInfo, RouteCoin, StakingPosition, TokenPrice, TradeRoute};
