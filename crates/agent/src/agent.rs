//! Pipeline entry point.

use crate::catalog::Catalog;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::extract::extract_json;
use crate::format::format_final_answer;
use crate::llm::{LlmBackend, ModelError};
use crate::prompt::build_prompt;
use crate::response::{ActionResult, AiResponse, AiStatus, QueryResponse};
use market::{CoinRegistry, MarketData};
use tracing::{debug, error, info};

/// The query pipeline: prompt → model → extract → dispatch → format.
///
/// Client handles are injected at construction so tests can substitute
/// stubs for both collaborators. The agent holds no per-query state; one
/// instance serves any number of concurrent queries.
pub struct Agent<L, M> {
    llm: L,
    market: M,
    catalog: Catalog,
    coins: CoinRegistry,
}

impl<L: LlmBackend, M: MarketData> Agent<L, M> {
    pub fn new(llm: L, market: M) -> Self {
        Self {
            llm,
            market,
            catalog: Catalog::new(),
            coins: CoinRegistry::new(),
        }
    }

    /// Default tool calls to a different network.
    pub fn with_network(mut self, network: market::Network) -> Self {
        self.catalog = Catalog::for_network(network);
        self
    }

    /// Answer one natural-language market-data query.
    ///
    /// Never fails: every pipeline error is caught here and converted into
    /// an error response. Actions execute sequentially in model order and
    /// the whole batch is all-or-nothing.
    pub async fn price_info(&self, query: &str) -> QueryResponse {
        match self.run(query).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "query failed");
                QueryResponse::Error {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn run(&self, query: &str) -> Result<QueryResponse> {
        info!(query, "handling query");

        let prompt = build_prompt(&self.catalog, &self.coins, query);
        let content = self.llm.complete(&prompt).await?;
        if content.trim().is_empty() {
            return Err(Error::ModelCall(ModelError::Empty));
        }
        debug!(content, "model completion");

        let plan = extract_json(&content)?;
        let ai: AiResponse =
            serde_json::from_value(plan).map_err(|e| Error::UnparsableResponse(e.to_string()))?;

        match ai.status {
            AiStatus::Error => Ok(QueryResponse::Error {
                error: ai
                    .error_message
                    .or(ai.reasoning)
                    .unwrap_or_else(|| "model declared an error".to_string()),
            }),
            AiStatus::RequiresInfo => Ok(QueryResponse::NeedsInfo {
                request: ai
                    .request
                    .unwrap_or_else(|| "more information required".to_string()),
            }),
            AiStatus::Success => self.execute_plan(ai, query).await,
        }
    }

    async fn execute_plan(&self, ai: AiResponse, query: &str) -> Result<QueryResponse> {
        let template = ai
            .final_answer
            .ok_or_else(|| Error::UnparsableResponse("missing final_answer".to_string()))?;

        let dispatcher = Dispatcher::new(&self.catalog, &self.coins, &self.market);
        let mut results = Vec::with_capacity(ai.actions.len());
        for action in ai.actions {
            let result = dispatcher.execute(&action).await?;
            results.push(ActionResult {
                tool: action.tool.clone(),
                result,
                action,
            });
        }

        let final_answer = format_final_answer(&self.coins, &template, &results, query);
        Ok(QueryResponse::Success {
            reasoning: ai.reasoning.unwrap_or_default(),
            results,
            final_answer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market::types::{DcaOrder, PoolInfo, StakingPosition, TokenPrice, TradeRoute};
    use market::Network;
    use std::collections::HashMap;

    /// Backend that replays a canned completion.
    struct ScriptedLlm(&'static str);

    impl LlmBackend for ScriptedLlm {
        async fn complete(&self, _prompt: &str) -> std::result::Result<String, ModelError> {
            Ok(self.0.to_string())
        }
    }

    struct StubMarket;

    impl MarketData for StubMarket {
        async fn token_price(&self, _: &str, _: Network) -> market::Result<TokenPrice> {
            Ok(TokenPrice {
                current: 3.5,
                previous: 3.2,
                price_change24h: 9.375,
            })
        }

        async fn coins_price_info(
            &self,
            _: &[String],
            _: Network,
        ) -> market::Result<HashMap<String, TokenPrice>> {
            Err(market::Error::Api("not scripted".into()))
        }

        async fn pool(&self, pool_id: &str, _: Network) -> market::Result<PoolInfo> {
            Ok(PoolInfo {
                id: pool_id.to_string(),
                tokens: vec![market::coins::SUI_LONG.to_string()],
                reserves: vec!["5000000000".to_string()],
                tvl: 1234567.891,
                fee: 234.5,
                apr: 12.345,
            })
        }

        async fn all_pools(&self, _: Network) -> market::Result<Vec<PoolInfo>> {
            Err(market::Error::Api("not scripted".into()))
        }

        async fn pool_spot_price(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: bool,
            _: Network,
        ) -> market::Result<f64> {
            Err(market::Error::Api("not scripted".into()))
        }

        async fn trade_route(
            &self,
            _: &str,
            _: &str,
            _: u64,
            _: Network,
        ) -> market::Result<TradeRoute> {
            Err(market::Error::Api("not scripted".into()))
        }

        async fn staking_positions(
            &self,
            _: &str,
            _: Network,
        ) -> market::Result<Vec<StakingPosition>> {
            Err(market::Error::Api("not scripted".into()))
        }

        async fn dca_orders(&self, _: &str, _: Network) -> market::Result<Vec<DcaOrder>> {
            Ok(vec![])
        }
    }

    fn agent(completion: &'static str) -> Agent<ScriptedLlm, StubMarket> {
        Agent::new(ScriptedLlm(completion), StubMarket)
    }

    #[tokio::test]
    async fn pool_query_end_to_end() {
        let agent = agent(
            "```json\n{\"status\": \"success\", \"reasoning\": \"checking the pool\", \
             \"actions\": [{\"tool\": \"get_pool_info\", \"input\": {\"pool_id\": \"0x52ac\"}}], \
             \"final_answer\": \"${result}\"}\n```",
        );
        match agent.price_info("Tell me about pool 0x52ac").await {
            QueryResponse::Success {
                reasoning,
                results,
                final_answer,
            } => {
                assert_eq!(reasoning, "checking the pool");
                assert_eq!(results.len(), 1);
                assert!(final_answer.contains("TVL: $1,234,567.89"));
                assert!(final_answer.contains("APR: 12.35%"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dca_query_renders_the_empty_sentinel() {
        let agent = agent(
            "{\"status\": \"success\", \"reasoning\": \"looking up orders\", \
             \"actions\": [{\"tool\": \"get_dca_orders\", \"input\": {\"wallet_address\": \"0xw\"}}], \
             \"final_answer\": \"${result}\"}",
        );
        match agent.price_info("show my DCA orders").await {
            QueryResponse::Success { final_answer, .. } => {
                assert_eq!(final_answer, "No active DCA orders found for this wallet.");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn requires_info_passes_through_without_dispatch() {
        let agent = agent("{\"status\": \"requires_info\", \"request\": \"Which pool?\"}");
        match agent.price_info("tell me about the pool").await {
            QueryResponse::NeedsInfo { request } => assert_eq!(request, "Which pool?"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn model_declared_error_surfaces_its_message() {
        let agent =
            agent("{\"status\": \"error\", \"error_message\": \"I only know market data\"}");
        match agent.price_info("write me a poem").await {
            QueryResponse::Error { error } => assert_eq!(error, "I only know market data"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparsable_completion_becomes_an_error_response() {
        let agent = agent("I'm sorry, I can't answer that.");
        match agent.price_info("price of SUI").await {
            QueryResponse::Error { error } => {
                assert!(error.contains("could not parse model response"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_tool_fails_the_whole_batch() {
        let agent = agent(
            "{\"status\": \"success\", \"actions\": [{\"tool\": \"get_weather\", \"input\": {}}], \
             \"final_answer\": \"${result}\"}",
        );
        match agent.price_info("weather in Lisbon").await {
            QueryResponse::Error { error } => assert!(error.contains("unknown tool")),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_without_actions_keeps_the_answer_verbatim() {
        let agent = agent(
            "{\"status\": \"success\", \"reasoning\": \"greeting\", \"actions\": [], \
             \"final_answer\": \"Hello! Ask me about Sui pools and prices.\"}",
        );
        match agent.price_info("hi").await {
            QueryResponse::Success {
                results,
                final_answer,
                ..
            } => {
                assert!(results.is_empty());
                assert_eq!(final_answer, "Hello! Ask me about Sui pools and prices.");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
