//! Tolerant extraction of JSON payloads from raw model output.
//!
//! Models occasionally wrap their answer in markdown fences or surrounding
//! prose even when asked for JSON only; parsing works on the outermost
//! object found in the text.

use serde::de::DeserializeOwned;

use crate::ai::client::AiError;

/// Returns the slice spanning the outermost JSON object in `raw`, if any.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Deserializes the outermost JSON object found in `raw` into `T`.
pub fn parse_json_output<T: DeserializeOwned>(raw: &str) -> Result<T, AiError> {
    let json = extract_json_object(raw)
        .ok_or_else(|| AiError::Malformed("no JSON object in output".to_string()))?;
    serde_json::from_str(json).map_err(|e| AiError::Malformed(e.to_string()))
}
