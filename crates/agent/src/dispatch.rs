//! Action dispatch.
//!
//! Validates a model-requested action against the tool catalog, resolves
//! coin symbols to their on-chain types, fills in defaults for omitted
//! optional parameters, and invokes the corresponding provider operation.
//! One failure aborts the whole batch for the current query; there are no
//! retries.

use crate::catalog::{Catalog, ToolSpec};
use crate::error::{Error, Result};
use crate::response::Action;
use market::{CoinRegistry, MarketData, Network};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Parameter names whose values are coin symbols to resolve.
const COIN_PARAMS: [&str; 3] = ["token_type", "coin_in_type", "coin_out_type"];

pub struct Dispatcher<'a, M> {
    catalog: &'a Catalog,
    coins: &'a CoinRegistry,
    market: &'a M,
}

impl<'a, M: MarketData> Dispatcher<'a, M> {
    pub fn new(catalog: &'a Catalog, coins: &'a CoinRegistry, market: &'a M) -> Self {
        Self {
            catalog,
            coins,
            market,
        }
    }

    /// Execute one action and return the operation's raw result.
    pub async fn execute(&self, action: &Action) -> Result<Value> {
        let spec = self
            .catalog
            .get(&action.tool)
            .ok_or_else(|| Error::UnknownTool(action.tool.clone()))?;

        info!(tool = %action.tool, "executing action");
        debug!(input = ?action.input, "action input");

        let input = self.resolve_symbols(&action.input)?;

        for param in &spec.inputs {
            if !param.optional && !input.contains_key(param.name) {
                return Err(Error::MissingRequiredInput {
                    tool: spec.name.to_string(),
                    field: param.name.to_string(),
                });
            }
        }

        let args = Args { spec, input };
        self.invoke(spec, &args).await
    }

    /// Replace coin symbols with on-chain types in the coin-typed
    /// parameters. Values already in `::`-path or `0x` form pass through.
    fn resolve_symbols(&self, input: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut out = input.clone();

        for name in COIN_PARAMS {
            if let Some(Value::String(symbol)) = out.get(name) {
                let resolved = self.resolve_coin(symbol)?;
                out.insert(name.to_string(), Value::String(resolved));
            }
        }

        if let Some(Value::Array(items)) = out.get("coins") {
            let resolved = items
                .iter()
                .map(|item| match item {
                    Value::String(symbol) => self.resolve_coin(symbol).map(Value::String),
                    other => Ok(other.clone()),
                })
                .collect::<Result<Vec<_>>>()?;
            out.insert("coins".to_string(), Value::Array(resolved));
        }

        Ok(out)
    }

    fn resolve_coin(&self, value: &str) -> Result<String> {
        if value.contains("::") || value.starts_with("0x") {
            return Ok(value.to_string());
        }
        self.coins
            .resolve(value)
            .map(str::to_string)
            .ok_or_else(|| Error::UnknownSymbol(value.to_string()))
    }

    async fn invoke(&self, spec: &ToolSpec, args: &Args<'_>) -> Result<Value> {
        let network = args.network()?;

        match spec.name {
            "get_token_price" => {
                let token_type = args.string("token_type")?;
                to_value(self.market.token_price(&token_type, network).await?)
            }
            "get_coins_price_info" => {
                let coins = args.string_list("coins")?;
                to_value(self.market.coins_price_info(&coins, network).await?)
            }
            "get_pool_info" => {
                let pool_id = args.string("pool_id")?;
                to_value(self.market.pool(&pool_id, network).await?)
            }
            // sort_by and limit are presentation parameters; the formatter
            // applies them from the original action input.
            "get_all_pools" => to_value(self.market.all_pools(network).await?),
            "get_pool_spot_price" => {
                let pool_id = args.string("pool_id")?;
                let coin_in = args.string("coin_in_type")?;
                let coin_out = args.string("coin_out_type")?;
                let with_fees = args.bool("with_fees")?;
                to_value(
                    self.market
                        .pool_spot_price(&pool_id, &coin_in, &coin_out, with_fees, network)
                        .await?,
                )
            }
            "get_trade_route" => {
                let coin_in = args.string("coin_in_type")?;
                let coin_out = args.string("coin_out_type")?;
                let amount = args.u64("coin_in_amount")?;
                to_value(
                    self.market
                        .trade_route(&coin_in, &coin_out, amount, network)
                        .await?,
                )
            }
            "get_staking_positions" => {
                let wallet = args.string("wallet_address")?;
                to_value(self.market.staking_positions(&wallet, network).await?)
            }
            "get_dca_orders" => {
                let wallet = args.string("wallet_address")?;
                to_value(self.market.dca_orders(&wallet, network).await?)
            }
            other => Err(Error::UnknownTool(other.to_string())),
        }
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::ToolExecution(e.to_string()))
}

/// Resolved action input plus the ToolSpec's declared defaults.
struct Args<'a> {
    spec: &'a ToolSpec,
    input: Map<String, Value>,
}

impl Args<'_> {
    /// The input value for a parameter, falling back to its default.
    fn value(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.input.get(name) {
            return Some(value.clone());
        }
        self.spec
            .inputs
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.default.clone())
    }

    fn string(&self, name: &str) -> Result<String> {
        match self.value(name) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Ok(other.to_string()),
            None => Err(Error::ToolExecution(format!("missing value for {name}"))),
        }
    }

    fn string_list(&self, name: &str) -> Result<Vec<String>> {
        match self.value(name) {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(Error::ToolExecution(format!(
                        "invalid entry in {name}: {other}"
                    ))),
                })
                .collect(),
            _ => Err(Error::ToolExecution(format!("invalid value for {name}"))),
        }
    }

    fn bool(&self, name: &str) -> Result<bool> {
        match self.value(name) {
            Some(Value::Bool(b)) => Ok(b),
            Some(other) => Err(Error::ToolExecution(format!(
                "invalid value for {name}: {other}"
            ))),
            None => Ok(false),
        }
    }

    fn u64(&self, name: &str) -> Result<u64> {
        let value = self
            .value(name)
            .ok_or_else(|| Error::ToolExecution(format!("missing value for {name}")))?;
        match value {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| Error::ToolExecution(format!("invalid value for {name}: {n}"))),
            Value::String(s) => s
                .parse()
                .map_err(|_| Error::ToolExecution(format!("invalid value for {name}: {s}"))),
            other => Err(Error::ToolExecution(format!(
                "invalid value for {name}: {other}"
            ))),
        }
    }

    fn network(&self) -> Result<Network> {
        match self.value("network") {
            Some(Value::String(s)) => s.parse().map_err(Error::ToolExecution),
            Some(other) => Err(Error::ToolExecution(format!(
                "invalid value for network: {other}"
            ))),
            None => Ok(Network::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market::types::{DcaOrder, PoolInfo, StakingPosition, TokenPrice, TradeRoute};
    use serde_json::json;
    use std::collections::HashMap;

    /// Deterministic provider that records nothing and always answers the
    /// same way.
    struct StubMarket;

    fn price(current: f64) -> TokenPrice {
        TokenPrice {
            current,
            previous: current,
            price_change24h: 0.0,
        }
    }

    fn pool(id: &str, tvl: f64) -> PoolInfo {
        PoolInfo {
            id: id.to_string(),
            tokens: vec![market::coins::SUI_LONG.to_string()],
            reserves: vec!["1000000000".to_string()],
            tvl,
            fee: 10.0,
            apr: 5.0,
        }
    }

    impl MarketData for StubMarket {
        async fn token_price(&self, _: &str, _: Network) -> market::Result<TokenPrice> {
            Ok(price(1.5))
        }

        async fn coins_price_info(
            &self,
            coins: &[String],
            _: Network,
        ) -> market::Result<HashMap<String, TokenPrice>> {
            Ok(coins.iter().map(|c| (c.clone(), price(2.0))).collect())
        }

        async fn pool(&self, pool_id: &str, _: Network) -> market::Result<PoolInfo> {
            Ok(pool(pool_id, 1000.0))
        }

        async fn all_pools(&self, _: Network) -> market::Result<Vec<PoolInfo>> {
            Ok(vec![pool("0xa", 1.0), pool("0xb", 2.0)])
        }

        async fn pool_spot_price(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: bool,
            _: Network,
        ) -> market::Result<f64> {
            Ok(1.079)
        }

        async fn trade_route(
            &self,
            coin_in: &str,
            coin_out: &str,
            amount: u64,
            _: Network,
        ) -> market::Result<TradeRoute> {
            Ok(TradeRoute {
                coin_in: market::RouteCoin {
                    coin_type: coin_in.to_string(),
                    amount: amount.to_string(),
                },
                coin_out: market::RouteCoin {
                    coin_type: coin_out.to_string(),
                    amount: "0".to_string(),
                },
                spot_price: 1.0,
            })
        }

        async fn staking_positions(
            &self,
            _: &str,
            _: Network,
        ) -> market::Result<Vec<StakingPosition>> {
            Ok(vec![])
        }

        async fn dca_orders(&self, _: &str, _: Network) -> market::Result<Vec<DcaOrder>> {
            Ok(vec![])
        }
    }

    fn action(tool: &str, input: Value) -> Action {
        Action {
            tool: tool.to_string(),
            input: input.as_object().cloned().unwrap_or_default(),
        }
    }

    fn dispatcher<'a>(
        catalog: &'a Catalog,
        coins: &'a CoinRegistry,
        market: &'a StubMarket,
    ) -> Dispatcher<'a, StubMarket> {
        Dispatcher::new(catalog, coins, market)
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let (catalog, coins, market) = (Catalog::new(), CoinRegistry::new(), StubMarket);
        let d = dispatcher(&catalog, &coins, &market);
        let err = d
            .execute(&action("get_weather", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownTool(name) if name == "get_weather"));
    }

    #[tokio::test]
    async fn missing_required_input_names_field_and_tool() {
        let (catalog, coins, market) = (Catalog::new(), CoinRegistry::new(), StubMarket);
        let d = dispatcher(&catalog, &coins, &market);
        let err = d
            .execute(&action("get_pool_info", json!({})))
            .await
            .unwrap_err();
        match err {
            Error::MissingRequiredInput { tool, field } => {
                assert_eq!(tool, "get_pool_info");
                assert_eq!(field, "pool_id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unknown_symbol_is_rejected() {
        let (catalog, coins, market) = (Catalog::new(), CoinRegistry::new(), StubMarket);
        let d = dispatcher(&catalog, &coins, &market);
        let err = d
            .execute(&action("get_token_price", json!({"token_type": "DOGE"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownSymbol(symbol) if symbol == "DOGE"));
    }

    #[tokio::test]
    async fn symbols_are_resolved_before_the_provider_call() {
        let (catalog, coins, market) = (Catalog::new(), CoinRegistry::new(), StubMarket);
        let d = dispatcher(&catalog, &coins, &market);
        let result = d
            .execute(&action("get_coins_price_info", json!({"coins": ["sui", "USDC"]})))
            .await
            .unwrap();
        let keys: Vec<_> = result.as_object().unwrap().keys().cloned().collect();
        assert!(keys.iter().any(|k| k == "0x2::sui::SUI"));
        assert!(keys.iter().all(|k| k.contains("::")));
    }

    #[tokio::test]
    async fn dispatch_is_idempotent_against_a_deterministic_provider() {
        let (catalog, coins, market) = (Catalog::new(), CoinRegistry::new(), StubMarket);
        let d = dispatcher(&catalog, &coins, &market);
        let a = action("get_pool_info", json!({"pool_id": "0x52ac"}));
        let first = d.execute(&a).await.unwrap();
        let second = d.execute(&a).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn trade_route_accepts_stringified_amount() {
        let (catalog, coins, market) = (Catalog::new(), CoinRegistry::new(), StubMarket);
        let d = dispatcher(&catalog, &coins, &market);
        let result = d
            .execute(&action(
                "get_trade_route",
                json!({
                    "coin_in_type": "SUI",
                    "coin_out_type": "USDC",
                    "coin_in_amount": "1000000000"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(result["coinIn"]["amount"], "1000000000");
        assert_eq!(result["coinIn"]["type"], "0x2::sui::SUI");
    }

    #[tokio::test]
    async fn pass_through_for_full_coin_types() {
        let (catalog, coins, market) = (Catalog::new(), CoinRegistry::new(), StubMarket);
        let d = dispatcher(&catalog, &coins, &market);
        let result = d
            .execute(&action(
                "get_token_price",
                json!({"token_type": "0x2::sui::SUI"}),
            ))
            .await
            .unwrap();
        assert_eq!(result["current"], 1.5);
    }
}
