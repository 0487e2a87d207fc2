//! Market-data domain types.

use serde::{Deserialize, Serialize};

/// The Sui network a request targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MAINNET" => Ok(Self::Mainnet),
            "TESTNET" => Ok(Self::Testnet),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mainnet => write!(f, "MAINNET"),
            Self::Testnet => write!(f, "TESTNET"),
        }
    }
}

/// Price information for one coin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPrice {
    /// Current USD price.
    pub current: f64,
    /// USD price 24 hours ago.
    pub previous: f64,
    /// Percentage change over the last 24 hours.
    pub price_change24h: f64,
}

/// Metrics for one liquidity pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolInfo {
    pub id: String,
    /// Coin types of the pool's assets, in reserve order.
    pub tokens: Vec<String>,
    /// Reserve amounts in base units (1e9 per whole coin), stringified.
    pub reserves: Vec<String>,
    pub tvl: f64,
    /// Fees earned over the last 24 hours, USD.
    pub fee: f64,
    /// Annualized return percentage.
    pub apr: f64,
}

/// One side of a trade route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCoin {
    #[serde(rename = "type")]
    pub coin_type: String,
    /// Amount in base units, stringified.
    pub amount: String,
}

/// An aggregator trade route between two coins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRoute {
    pub coin_in: RouteCoin,
    pub coin_out: RouteCoin,
    pub spot_price: f64,
}

/// A staking position held by a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingPosition {
    /// Staked SUI in base units, stringified.
    pub staked_sui_amount: String,
    /// afSUI minted against the stake, base units, stringified.
    pub af_sui_amount: String,
    pub state: String,
}

/// A recurring dollar-cost-averaging order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcaOrder {
    pub id: String,
    pub from_coin: String,
    pub to_coin: String,
    /// Per-trade amount in base units, stringified.
    pub amount: String,
    /// Human-readable trade cadence, e.g. "daily".
    pub frequency: String,
}
