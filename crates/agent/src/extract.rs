//! JSON extraction from model completions.
//!
//! Models inconsistently wrap JSON in explanatory prose or code fences, so
//! a single-strategy parse would reject a large share of otherwise-valid
//! completions. Three tiers, in order: the whole text, the interior of a
//! fenced code block, the first-to-last brace span.

use crate::error::{Error, Result};
use serde_json::Value;

/// Pull a JSON object out of free-form model text.
pub fn extract_json(text: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str(text.trim()) {
        return Ok(value);
    }

    if let Some(inner) = fenced_block(text)
        && let Ok(value) = serde_json::from_str(inner.trim())
    {
        return Ok(value);
    }

    if let Some(span) = brace_span(text)
        && let Ok(value) = serde_json::from_str(span)
    {
        return Ok(value);
    }

    let snippet: String = text.chars().take(120).collect();
    Err(Error::UnparsableResponse(snippet))
}

/// The interior of the first fenced code block, tolerating a `json`
/// language tag after the opening fence.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let mut body = &text[start + 3..];
    body = body.strip_prefix("json").unwrap_or(body);
    body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);
    let end = body.find("```")?;
    Some(&body[..end])
}

/// The span from the first `{` to the last `}`.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_json_round_trips() {
        let object = json!({"status": "success", "actions": []});
        let text = serde_json::to_string(&object).unwrap();
        assert_eq!(extract_json(&text).unwrap(), object);
    }

    #[test]
    fn fenced_json_with_language_tag() {
        let text = "Here is the plan:\n```json\n{\"status\": \"success\"}\n```\nDone.";
        assert_eq!(extract_json(text).unwrap(), json!({"status": "success"}));
    }

    #[test]
    fn fenced_json_without_language_tag() {
        let text = "```\n{\"status\": \"error\"}\n```";
        assert_eq!(extract_json(text).unwrap(), json!({"status": "error"}));
    }

    #[test]
    fn json_embedded_in_prose() {
        let text = "Sure! The answer is {\"status\": \"success\", \"actions\": []} as requested.";
        let value = extract_json(text).unwrap();
        assert_eq!(value["status"], "success");
    }

    #[test]
    fn rejects_text_with_no_json() {
        assert!(extract_json("I cannot help with that.").is_err());
    }

    #[test]
    fn rejects_malformed_braces() {
        assert!(extract_json("{not json at all}").is_err());
    }
}
