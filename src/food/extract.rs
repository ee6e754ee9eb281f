use serde_json::Value;

use crate::food::error::{MalformedReason, SuggestionError};

const FENCE: &str = "```";

/// Removes a surrounding Markdown code fence, with or without a language tag.
/// Text that does not start with a fence is returned trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix(FENCE) else {
        return text;
    };
    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let body = body.trim();
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Returns the span from the first `[` to the last `]`, inclusive.
///
/// Brackets inside string values are not balanced; the reply is expected to
/// hold exactly one top-level array, so the outermost pair is taken.
pub fn extract_json_array(text: &str) -> Result<&str, MalformedReason> {
    let start = text.find('[').ok_or(MalformedReason::NoArrayDelimiters)?;
    let end = text.rfind(']').ok_or(MalformedReason::NoArrayDelimiters)?;
    if end < start {
        return Err(MalformedReason::NoArrayDelimiters);
    }
    Ok(&text[start..=end])
}

/// Turns a raw completion into the JSON elements of its top-level array.
pub fn parse_reply(raw: &str) -> Result<Vec<Value>, SuggestionError> {
    let body = strip_code_fence(raw);
    let span = extract_json_array(body).map_err(|reason| SuggestionError::malformed(reason, raw))?;

    let value: Value = serde_json::from_str(span)
        .map_err(|_| SuggestionError::malformed(MalformedReason::InvalidJson, raw))?;

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(SuggestionError::malformed(MalformedReason::NotAnArray, raw)),
    }
}
