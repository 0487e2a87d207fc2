//! Market-data provider boundary and the Aftermath HTTP client.

use crate::coins;
use crate::error::{Error, Result};
use crate::types::{DcaOrder, Network, PoolInfo, StakingPosition, TokenPrice, TradeRoute};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;

const MAINNET_API_URL: &str = "https://aftermath.finance/api";
const TESTNET_API_URL: &str = "https://testnet.aftermath.finance/api";

/// Trait for market-data providers.
///
/// This is the boundary between the query pipeline and the network. All
/// operations are reads; implementations hold no per-request state and are
/// safe to share across concurrent queries.
pub trait MarketData: Send + Sync {
    /// Price information for a single coin.
    fn token_price(
        &self,
        coin_type: &str,
        network: Network,
    ) -> impl Future<Output = Result<TokenPrice>> + Send;

    /// Price information for several coins, keyed by coin type.
    fn coins_price_info(
        &self,
        coins: &[String],
        network: Network,
    ) -> impl Future<Output = Result<HashMap<String, TokenPrice>>> + Send;

    /// Metrics for one pool.
    fn pool(
        &self,
        pool_id: &str,
        network: Network,
    ) -> impl Future<Output = Result<PoolInfo>> + Send;

    /// Metrics for every pool the provider tracks.
    fn all_pools(&self, network: Network) -> impl Future<Output = Result<Vec<PoolInfo>>> + Send;

    /// Instantaneous exchange rate between two assets of a pool.
    fn pool_spot_price(
        &self,
        pool_id: &str,
        coin_in_type: &str,
        coin_out_type: &str,
        with_fees: bool,
        network: Network,
    ) -> impl Future<Output = Result<f64>> + Send;

    /// Best aggregator route for a trade.
    fn trade_route(
        &self,
        coin_in_type: &str,
        coin_out_type: &str,
        coin_in_amount: u64,
        network: Network,
    ) -> impl Future<Output = Result<TradeRoute>> + Send;

    /// Staking positions held by a wallet.
    fn staking_positions(
        &self,
        wallet_address: &str,
        network: Network,
    ) -> impl Future<Output = Result<Vec<StakingPosition>>> + Send;

    /// Active DCA orders held by a wallet.
    fn dca_orders(
        &self,
        wallet_address: &str,
        network: Network,
    ) -> impl Future<Output = Result<Vec<DcaOrder>>> + Send;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceInfoRequest<'a> {
    coins: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TradeRouteRequest<'a> {
    coin_in_type: &'a str,
    coin_out_type: &'a str,
    coin_in_amount: String,
}

/// HTTP client for the Aftermath Finance aggregator API.
#[derive(Debug, Clone)]
pub struct AftermathClient {
    client: reqwest::Client,
    mainnet_url: String,
    testnet_url: String,
}

impl AftermathClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            mainnet_url: MAINNET_API_URL.to_string(),
            testnet_url: TESTNET_API_URL.to_string(),
        }
    }

    /// Point both networks at a custom base URL.
    pub fn with_base_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            client: reqwest::Client::new(),
            mainnet_url: url.clone(),
            testnet_url: url,
        }
    }

    fn base(&self, network: Network) -> &str {
        match network {
            Network::Mainnet => &self.mainnet_url,
            Network::Testnet => &self.testnet_url,
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!("{status}: {body}")));
        }
        response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, url: String, query: &[(&str, String)]) -> Result<T> {
        debug!(%url, "market GET");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, url: String, body: &B) -> Result<T> {
        debug!(%url, "market POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Self::decode(response).await
    }
}

impl Default for AftermathClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketData for AftermathClient {
    async fn token_price(&self, coin_type: &str, network: Network) -> Result<TokenPrice> {
        let coins = [coin_type.to_string()];
        let prices = self.coins_price_info(&coins, network).await?;
        // The API keys SUI by its zero-padded address regardless of the
        // form it was requested with.
        prices
            .get(coins::normalize(coin_type))
            .or_else(|| prices.get(coin_type))
            .copied()
            .ok_or_else(|| Error::InvalidResponse(format!("no price returned for {coin_type}")))
    }

    async fn coins_price_info(
        &self,
        coins: &[String],
        network: Network,
    ) -> Result<HashMap<String, TokenPrice>> {
        let url = format!("{}/price-info", self.base(network));
        self.post(url, &PriceInfoRequest { coins }).await
    }

    async fn pool(&self, pool_id: &str, network: Network) -> Result<PoolInfo> {
        let url = format!("{}/pools/{pool_id}", self.base(network));
        self.get(url, &[]).await
    }

    async fn all_pools(&self, network: Network) -> Result<Vec<PoolInfo>> {
        let url = format!("{}/pools", self.base(network));
        self.get(url, &[]).await
    }

    async fn pool_spot_price(
        &self,
        pool_id: &str,
        coin_in_type: &str,
        coin_out_type: &str,
        with_fees: bool,
        network: Network,
    ) -> Result<f64> {
        let url = format!("{}/pools/{pool_id}/spot-price", self.base(network));
        self.get(
            url,
            &[
                ("coinInType", coin_in_type.to_string()),
                ("coinOutType", coin_out_type.to_string()),
                ("withFees", with_fees.to_string()),
            ],
        )
        .await
    }

    async fn trade_route(
        &self,
        coin_in_type: &str,
        coin_out_type: &str,
        coin_in_amount: u64,
        network: Network,
    ) -> Result<TradeRoute> {
        let url = format!("{}/router/trade-route", self.base(network));
        self.post(
            url,
            &TradeRouteRequest {
                coin_in_type,
                coin_out_type,
                coin_in_amount: coin_in_amount.to_string(),
            },
        )
        .await
    }

    async fn staking_positions(
        &self,
        wallet_address: &str,
        network: Network,
    ) -> Result<Vec<StakingPosition>> {
        let url = format!("{}/staking/{wallet_address}/positions", self.base(network));
        self.get(url, &[]).await
    }

    async fn dca_orders(&self, wallet_address: &str, network: Network) -> Result<Vec<DcaOrder>> {
        let url = format!("{}/dca/{wallet_address}/orders", self.base(network));
        self.get(url, &[]).await
    }
}
