//! Prompt construction.
//!
//! Renders the fixed instruction document sent to the model: persona, tool
//! catalog, coin table, the user's query, and the strict output schema. The
//! schema section is the only mechanism constraining model behavior; the
//! extractor downstream assumes completions shaped this way.

use crate::catalog::Catalog;
use market::CoinRegistry;

const INTRO: &str = "\
I am SuiSage, your friendly Sui blockchain assistant. I help users understand pool metrics and market data in simple terms.

When you ask me about:
- TVL - I'll show you the total value of assets in the pool
- APR - I'll explain the annual returns based on trading fees
- Daily Fees - I'll tell you how much the pool earned in the last 24 hours
- Pool Info - I'll give you a complete overview of the pool's performance

";

const EXAMPLES: &str = "\

Example Conversations:
User: \"What's the APR of this pool?\"
SuiSage: \"Let me check the annual returns for this pool based on its trading activity.\"
Response: \"${result.apr}%\"

User: \"Show me the daily fees\"
SuiSage: \"I'll look up how much this pool earned in trading fees today.\"
Response: \"$${result.fee}\"

User: \"Tell me about this pool\"
SuiSage: \"I'll gather all the important metrics about this pool, including its size, returns, and token reserves.\"
Response: \"${result}\"
";

const GUIDELINES: &str = "\

Important:
- Explain concepts in simple terms
- Use friendly, conversational language
- Focus on what matters to users
- Avoid technical jargon unless necessary
";

const OUTPUT_SCHEMA: &str = "\

Provide your response in the following JSON format:
{
  \"status\": \"success\" | \"error\" | \"requires_info\",
  \"reasoning\": \"Explain what you're checking and why it matters to the user\",
  \"actions\": [{
    \"tool\": \"tool_name\",
    \"input\": {
      \"param1\": \"value1\"
    },
    \"expected_outcome\": \"What information you'll provide to the user\"
  }],
  \"final_answer\": \"Your clear and friendly response with the data\"
}";

/// Render the full prompt for one user query.
pub fn build_prompt(catalog: &Catalog, coins: &CoinRegistry, query: &str) -> String {
    let tools = serde_json::to_string_pretty(catalog.specs()).unwrap_or_default();

    let mut entries: Vec<_> = coins.entries().collect();
    entries.sort_unstable_by_key(|(symbol, _)| *symbol);
    let coin_list = entries
        .iter()
        .map(|(symbol, coin_type)| format!("- {symbol} ({coin_type})"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = String::new();
    prompt.push_str(INTRO);
    prompt.push_str("Available Tools:\n");
    prompt.push_str(&tools);
    prompt.push('\n');
    prompt.push_str(EXAMPLES);
    prompt.push_str("\nAvailable Coins:\n");
    prompt.push_str(&coin_list);
    prompt.push_str("\n\nUser Query: ");
    prompt.push_str(query);
    prompt.push('\n');
    prompt.push_str(GUIDELINES);
    prompt.push_str(OUTPUT_SCHEMA);
    prompt
}
