//! Turning the AI backend's raw reply text into validated [`Business`] records
//!
//! The backend is asked for a bare JSON array but regularly wraps it in a
//! markdown fence anyway, so the reply is cleaned before parsing. Each array
//! element is validated on its own: elements without a usable `name` and
//! `address` are dropped and counted, and anything that lists a website is
//! filtered out.

use crate::error::{FinderError, FinderResult};
use crate::types::Business;
use serde::Deserialize;
use serde_json::Value;

/// Outcome of parsing one reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReply {
    /// Businesses without a website, in backend order
    pub businesses: Vec<Business>,
    /// Elements dropped because they were not valid business records
    pub dropped_invalid: usize,
    /// Valid elements dropped because they list a website
    pub dropped_with_website: usize,
}

/// Loose shape of one array element as the model writes it
#[derive(Debug, Deserialize)]
struct ReplyEntry {
    name: String,
    address: String,
    #[serde(default)]
    phone: Value,
    #[serde(default, rename = "mapsUrl")]
    maps_url: Value,
    /// Spelling the model sometimes uses instead of `mapsUrl`
    #[serde(default, rename = "maps_url")]
    maps_url_snake: Value,
    #[serde(default)]
    website: Value,
}

/// Remove markdown code fences (with or without a `json` tag) and trim
pub fn clean_json_string(text: &str) -> String {
    text.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a raw reply into businesses that lack a website
///
/// An empty reply (after fence removal) is zero results. Text that is not
/// JSON, or JSON whose top level is not an array, is a `MalformedResponse`.
pub fn parse_reply(text: &str) -> FinderResult<ParsedReply> {
    let cleaned = clean_json_string(text);
    if cleaned.is_empty() {
        return Ok(ParsedReply::default());
    }

    let parsed: Value = serde_json::from_str(&cleaned)?;
    let Value::Array(items) = parsed else {
        return Err(FinderError::MalformedResponse(
            "Invalid response format from API. Expected a JSON array.".to_string(),
        ));
    };

    let mut reply = ParsedReply::default();
    for item in items {
        match validate_entry(item) {
            Some((business, true)) => {
                log::debug!("Dropping '{}': website listed", business.name);
                reply.dropped_with_website += 1;
            }
            Some((business, false)) => reply.businesses.push(business),
            None => reply.dropped_invalid += 1,
        }
    }

    if reply.dropped_invalid > 0 {
        log::debug!(
            "Dropped {} invalid entries from AI reply",
            reply.dropped_invalid
        );
    }

    Ok(reply)
}

/// Typed business plus whether it lists a website
fn validate_entry(item: Value) -> Option<(Business, bool)> {
    let entry: ReplyEntry = serde_json::from_value(item).ok()?;
    let name = entry.name.trim();
    let address = entry.address.trim();
    if name.is_empty() || address.is_empty() {
        return None;
    }

    let has_website = is_truthy(&entry.website);
    let business = Business {
        name: name.to_string(),
        address: address.to_string(),
        phone: optional_text(entry.phone),
        maps_url: optional_text(entry.maps_url).or_else(|| optional_text(entry.maps_url_snake)),
        website: None,
    };
    Some((business, has_website))
}

fn optional_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
