//! JSON Extraction
//!
//! LLM replies often wrap the requested object in prose or code fences.
//! The extractor takes the widest `{ ... }` span (first `{` through last `}`)
//! and falls back to parsing the whole reply. It makes no attempt at brace
//! matching; whatever it returns is revalidated by the normalizer.

use serde_json::{Map, Value};

use crate::error::ExtractionError;

/// Locate and parse the JSON object embedded in `text`
pub fn extract(text: &str) -> Result<Map<String, Value>, ExtractionError> {
    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&text[start..=end]),
        _ => None,
    };

    let span_error = match span.map(parse_object) {
        Some(Ok(object)) => return Ok(object),
        Some(Err(e)) => Some(e),
        None => None,
    };

    match parse_object(text) {
        Ok(object) => Ok(object),
        Err(whole_error) => match span_error {
            Some(e) => Err(ExtractionError::MalformedJson(e)),
            None if text.contains('{') || text.contains('}') => {
                Err(ExtractionError::MalformedJson(whole_error))
            }
            None => Err(ExtractionError::NoJsonFound),
        },
    }
}

fn parse_object(candidate: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(format!("expected a JSON object, found {}", kind_of(&other))),
        Err(e) => Err(e.to_string()),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
