//! Completion parsing: fence stripping and field aliasing.
//!
//! The model is asked for a bare JSON object but is not contractually bound
//! to one: replies may arrive wrapped in a markdown code fence, and key
//! casing varies. Fences are stripped before parsing; keys are resolved
//! through ordered alias lists, lowercase canonical spelling first.

use serde_json::Value;

use super::error::ExtractionError;
use crate::models::CardFields;

/// Accepted key spellings per canonical field, in preference order.
const NAME_ALIASES: &[&str] = &["name", "Name"];
const IDENTIFIER_ALIASES: &[&str] = &["aadhaar", "Aadhaar Number"];
const ADDRESS_ALIASES: &[&str] = &["address", "Address"];

/// Remove leading/trailing markdown code fences from a completion.
///
/// Handles a leading ``` with an optional language tag (```json) and a
/// trailing ```. Text without fences passes through untouched.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the rest of the fence line if it is just a language tag.
        text = match rest.find('\n') {
            Some(idx)
                if rest[..idx]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == ' ') =>
            {
                &rest[idx + 1..]
            }
            _ => rest.strip_prefix("json").unwrap_or(rest),
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Resolve a field through its alias list.
///
/// Takes the first alias whose value is a non-empty string; empty, null,
/// and non-string values fall through to the next alias. Defaults to the
/// empty string when no alias matches.
fn resolve_field(object: &serde_json::Map<String, Value>, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Parse a completion into card fields.
///
/// Fence stripping precedes JSON parsing. Missing fields default to empty
/// strings; extra keys are ignored. Only text that fails to parse as JSON
/// at all is an `UnparseableResponse`; valid non-object JSON (array,
/// scalar) resolves to all-empty fields like any object missing its keys.
pub fn parse_card_fields(completion: &str) -> Result<CardFields, ExtractionError> {
    let cleaned = strip_code_fences(completion);

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| ExtractionError::UnparseableResponse(e.to_string()))?;

    let empty = serde_json::Map::new();
    let object = value.as_object().unwrap_or(&empty);

    Ok(CardFields {
        name: resolve_field(object, NAME_ALIASES),
        identifier_number: resolve_field(object, IDENTIFIER_ALIASES),
        address: resolve_field(object, ADDRESS_ALIASES),
    })
}
