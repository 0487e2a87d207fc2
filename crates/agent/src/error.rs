use crate::llm::ModelError;
use thiserror::Error;

/// Errors raised anywhere in the query pipeline.
///
/// All of these are caught at the `price_info` boundary and converted into
/// an error response; none escapes to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("unknown coin symbol: {0}")]
    UnknownSymbol(String),

    #[error("missing required input: {field} for tool {tool}")]
    MissingRequiredInput { tool: String, field: String },

    #[error("could not parse model response: {0}")]
    UnparsableResponse(String),

    #[error("tool execution failed: {0}")]
    ToolExecution(String),

    #[error("model call failed: {0}")]
    ModelCall(#[from] ModelError),
}

impl From<market::Error> for Error {
    fn from(e: market::Error) -> Self {
        Self::ToolExecution(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
