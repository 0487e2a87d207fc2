//! Wire types for the model's plan and the pipeline's public response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One model-requested tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub tool: String,
    #[serde(default)]
    pub input: Map<String, Value>,
}

/// Status field of the model's JSON plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiStatus {
    Success,
    Error,
    RequiresInfo,
}

/// The model's plan, parsed once per query from its completion.
///
/// Unknown extra fields (e.g. `expected_outcome` inside actions) are
/// ignored; the model is untrusted and inconsistently chatty.
#[derive(Debug, Deserialize)]
pub struct AiResponse {
    pub status: AiStatus,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Answer template with `${...}` placeholders.
    #[serde(default)]
    pub final_answer: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub request: Option<String>,
}

/// The raw outcome of one dispatched action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub tool: String,
    pub result: Value,
    pub action: Action,
}

/// The public result of one query. No error crosses this boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryResponse {
    Success {
        reasoning: String,
        results: Vec<ActionResult>,
        final_answer: String,
    },
    NeedsInfo {
        request: String,
    },
    Error {
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plan_with_extra_fields() {
        let plan = json!({
            "status": "success",
            "reasoning": "checking the pool",
            "actions": [{
                "tool": "get_pool_info",
                "input": {"pool_id": "0xabc"},
                "expected_outcome": "pool metrics"
            }],
            "final_answer": "${result}"
        });
        let parsed: AiResponse = serde_json::from_value(plan).unwrap();
        assert_eq!(parsed.status, AiStatus::Success);
        assert_eq!(parsed.actions.len(), 1);
        assert_eq!(parsed.actions[0].tool, "get_pool_info");
    }

    #[test]
    fn parses_requires_info() {
        let plan = json!({
            "status": "requires_info",
            "request": "Which pool do you mean?"
        });
        let parsed: AiResponse = serde_json::from_value(plan).unwrap();
        assert_eq!(parsed.status, AiStatus::RequiresInfo);
        assert!(parsed.actions.is_empty());
    }

    #[test]
    fn query_response_is_status_tagged() {
        let response = QueryResponse::NeedsInfo {
            request: "which wallet?".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "needs_info");
        assert_eq!(json["request"], "which wallet?");
    }
}
