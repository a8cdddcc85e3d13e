//! Pulling a JSON object out of free-form model text.
//!
//! Models are told to answer with bare JSON but still wrap it in prose or
//! code fences often enough that the reply has to be searched.

use serde_json::{Deserializer, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("reply contains no {{...}} span")]
    NotFound,

    #[error("reply has braces but no parseable JSON object: {0}")]
    Malformed(String),
}

/// Greedy span from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses the greedy span; when that is not valid JSON (say the model added
/// a second fragment after the first object) each `{` is tried in turn and
/// the first complete object wins.
pub fn parse_embedded_object(text: &str) -> Result<Value, ExtractError> {
    let span = extract_json_object(text).ok_or(ExtractError::NotFound)?;

    let greedy_err = match serde_json::from_str::<Value>(span) {
        // The span opens with `{`, so anything that parses is an object.
        Ok(value) => return Ok(value),
        Err(e) => e.to_string(),
    };

    for (offset, _) in span.match_indices('{') {
        let mut stream = Deserializer::from_str(&span[offset..]).into_iter::<Value>();
        if let Some(Ok(value @ Value::Object(_))) = stream.next() {
            tracing::debug!(offset, "recovered JSON object by incremental scan");
            return Ok(value);
        }
    }

    Err(ExtractError::Malformed(greedy_err))
}
