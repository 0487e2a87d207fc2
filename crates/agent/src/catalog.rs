//! Tool catalog.
//!
//! Describes every market-data operation the dispatcher can invoke: name,
//! ordered parameters with optionality and defaults, and a human-readable
//! description. The catalog is serialized into the prompt so the model
//! knows what it may request, and consulted again at dispatch time to
//! validate what it did request.

use market::Network;
use serde::Serialize;
use serde_json::{Value, json};

/// One parameter of a tool, in declared order.
#[derive(Debug, Clone, Serialize)]
pub struct InputSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl InputSpec {
    fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            optional: false,
            default: None,
        }
    }

    fn optional(name: &'static str, description: &'static str, default: Value) -> Self {
        Self {
            name,
            description,
            optional: true,
            default: Some(default),
        }
    }
}

/// A tool definition exposed to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub inputs: Vec<InputSpec>,
    pub output: &'static str,
}

/// The full set of callable tools. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    tools: Vec<ToolSpec>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::for_network(Network::Mainnet)
    }

    /// Build the catalog with a different default network in every tool's
    /// optional `network` parameter.
    pub fn for_network(default_network: Network) -> Self {
        let network = || {
            InputSpec::optional(
                "network",
                "Target network, MAINNET or TESTNET",
                json!(default_network.to_string()),
            )
        };

        let tools = vec![
            ToolSpec {
                name: "get_token_price",
                description: "Current USD price and 24h change for one coin",
                inputs: vec![
                    InputSpec::required("token_type", "Coin symbol, e.g. SUI"),
                    network(),
                ],
                output: "price info with current, previous and priceChange24h",
            },
            ToolSpec {
                name: "get_coins_price_info",
                description: "Current USD prices for several coins at once",
                inputs: vec![
                    InputSpec::required("coins", "List of coin symbols, e.g. [\"SUI\", \"USDC\"]"),
                    network(),
                ],
                output: "mapping from coin type to price info",
            },
            ToolSpec {
                name: "get_pool_info",
                description: "TVL, daily fees, APR and reserves for one pool",
                inputs: vec![
                    InputSpec::required("pool_id", "Pool object ID, 0x-prefixed"),
                    network(),
                ],
                output: "pool metrics with id, tokens, reserves, tvl, fee, apr",
            },
            ToolSpec {
                name: "get_all_pools",
                description: "Ranked overview of every tracked pool",
                inputs: vec![
                    InputSpec::optional(
                        "sort_by",
                        "Ranking field: tvl, apr or fees",
                        json!("tvl"),
                    ),
                    InputSpec::optional("limit", "Maximum number of pools to return", json!(10)),
                    network(),
                ],
                output: "list of pool metrics",
            },
            ToolSpec {
                name: "get_pool_spot_price",
                description: "Instantaneous exchange rate between two assets of a pool",
                inputs: vec![
                    InputSpec::required("pool_id", "Pool object ID, 0x-prefixed"),
                    InputSpec::required("coin_in_type", "Symbol of the coin being sold"),
                    InputSpec::required("coin_out_type", "Symbol of the coin being bought"),
                    InputSpec::optional("with_fees", "Include pool fees in the rate", json!(false)),
                    network(),
                ],
                output: "spot price as a number",
            },
            ToolSpec {
                name: "get_trade_route",
                description: "Best aggregator route for a trade",
                inputs: vec![
                    InputSpec::required("coin_in_type", "Symbol of the coin being sold"),
                    InputSpec::required("coin_out_type", "Symbol of the coin being bought"),
                    InputSpec::required("coin_in_amount", "Amount to sell, in base units"),
                    network(),
                ],
                output: "route with coinIn, coinOut and spotPrice",
            },
            ToolSpec {
                name: "get_staking_positions",
                description: "Staking positions held by a wallet",
                inputs: vec![
                    InputSpec::required("wallet_address", "Wallet address, 0x-prefixed"),
                    network(),
                ],
                output: "list of staking positions",
            },
            ToolSpec {
                name: "get_dca_orders",
                description: "Active DCA orders held by a wallet",
                inputs: vec![
                    InputSpec::required("wallet_address", "Wallet address, 0x-prefixed"),
                    network(),
                ],
                output: "list of DCA orders",
            },
        ];

        Self { tools }
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// All tool definitions, in catalog order.
    pub fn specs(&self) -> &[ToolSpec] {
        &self.tools
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_names_are_unique() {
        let catalog = Catalog::new();
        let mut names: Vec<_> = catalog.specs().iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog.specs().len());
    }

    #[test]
    fn lookup_known_and_unknown() {
        let catalog = Catalog::new();
        assert!(catalog.get("get_pool_info").is_some());
        assert!(catalog.get("get_weather").is_none());
    }

    #[test]
    fn optional_inputs_carry_defaults() {
        let catalog = Catalog::new();
        let spec = catalog.get("get_all_pools").unwrap();
        let sort_by = spec.inputs.iter().find(|i| i.name == "sort_by").unwrap();
        assert!(sort_by.optional);
        assert_eq!(sort_by.default, Some(json!("tvl")));
        let limit = spec.inputs.iter().find(|i| i.name == "limit").unwrap();
        assert_eq!(limit.default, Some(json!(10)));
    }

    #[test]
    fn network_default_follows_construction() {
        let catalog = Catalog::for_network(Network::Testnet);
        let spec = catalog.get("get_pool_info").unwrap();
        let network = spec.inputs.iter().find(|i| i.name == "network").unwrap();
        assert_eq!(network.default, Some(json!("TESTNET")));
    }

    #[test]
    fn required_inputs_have_no_default() {
        let catalog = Catalog::new();
        for spec in catalog.specs() {
            for input in &spec.inputs {
                if !input.optional {
                    assert!(input.default.is_none(), "{}.{}", spec.name, input.name);
                }
            }
        }
    }
}
