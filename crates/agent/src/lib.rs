//! SuiSage agent — natural-language front end over Sui market-data reads.
//!
//! One query flows through a straight-line pipeline:
//!
//! 1. **Prompt** — the query is embedded in a fixed instruction document
//!    together with the tool catalog and coin table.
//! 2. **Model** — an [`LlmBackend`] turns the prompt into free-form text
//!    expected to contain a JSON plan.
//! 3. **Extract** — the plan is pulled out of the text, tolerating code
//!    fences and surrounding prose.
//! 4. **Dispatch** — each requested action is validated against the
//!    catalog and executed against a [`market::MarketData`] provider,
//!    sequentially, all-or-nothing.
//! 5. **Format** — the first result is rendered into the plan's answer
//!    template.
//!
//! The entry point is [`Agent::price_info`]; it never returns an error.
//! Every failure becomes a structured [`QueryResponse::Error`].
//!
//! # Example
//!
//! ```ignore
//! use agent::{Agent, AnthropicBackend};
//! use market::AftermathClient;
//!
//! let llm = AnthropicBackend::builder(api_key, "claude-sonnet-4-20250514").build();
//! let agent = Agent::new(llm, AftermathClient::new());
//! let response = agent.price_info("What are the top pools by apr?").await;
//! ```

mod agent;
pub mod catalog;
mod dispatch;
mod error;
mod extract;
pub mod format;
pub mod llm;
mod prompt;
mod response;

pub use agent::Agent;
pub use catalog::{Catalog, InputSpec, ToolSpec};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use extract::extract_json;
pub use format::format_final_answer;
pub use llm::{AnthropicBackend, AnthropicBackendBuilder, LlmBackend, ModelError};
pub use prompt::build_prompt;
pub use response::{Action, ActionResult, AiResponse, AiStatus, QueryResponse};
