//! Response-shape normalization.
//!
//! The backend is inconsistent on two axes: key spelling (snake_case vs
//! camelCase for the same logical field) and envelope nesting
//! (`{data:{trips:..}}` vs `{data:[..]}` vs `{trips:..}`). Everything
//! the services decode goes through this module first, so exactly one
//! canonical shape reaches the typed models.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::models::Pagination;

// =========================================================
// Key folding (camelCase -> snake_case, first-non-null-wins)
// =========================================================

/// Fold a camelCase key into snake_case. Keys already in snake_case
/// pass through unchanged.
fn snake_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Recursively rewrite every object key to its canonical snake_case
/// spelling. When both spellings of a field are present, the first
/// non-null value wins; a null is only kept if no spelling carried a
/// value.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, val) in map {
                let canonical = snake_key(key);
                let folded = canonicalize(val);
                // Precedence regardless of key order: a non-null value
                // under the canonical spelling beats a non-null folded
                // one, which beats null.
                let occupied = out.get(&canonical).is_some_and(|e| !e.is_null());
                let preferred_spelling = *key == canonical;
                if !occupied || (preferred_spelling && !folded.is_null()) {
                    out.insert(canonical, folded);
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

// =========================================================
// Envelope extraction
// =========================================================

/// Locate a listed resource inside any of the tolerated envelopes:
/// `{data:{<key>:[..]}}`, `{data:[..]}`, `{<key>:[..]}`, or a bare
/// top-level array.
pub fn extract_collection<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(data) = value.get("data") {
        if let Some(nested) = data.get(key) {
            if nested.is_array() {
                return Some(nested);
            }
        }
        if data.is_array() {
            return Some(data);
        }
    }
    if let Some(flat) = value.get(key) {
        if flat.is_array() {
            return Some(flat);
        }
    }
    if value.is_array() {
        return Some(value);
    }
    None
}

/// Locate a single resource inside the tolerated envelopes, falling
/// back to the whole body when no envelope matched (flat responses).
pub fn extract_object<'a>(value: &'a Value, key: &str) -> &'a Value {
    if let Some(data) = value.get("data") {
        if let Some(nested) = data.get(key) {
            return nested;
        }
        if data.is_object() {
            return data;
        }
    }
    if let Some(flat) = value.get(key) {
        return flat;
    }
    value
}

/// Canonical pagination, probed beside the payload and under `data`.
/// Accepts `total_count` or `total` for the total. A missing block
/// means the listing was unpaginated: the whole set is one page of
/// `item_count`. Inside a block, a missing `per_page` reports as 0
/// ("size not reported"); `page`/`per_page` beyond `u32` clamp to
/// `u32::MAX`.
pub fn extract_pagination(value: &Value, item_count: usize) -> Pagination {
    let block = value
        .get("pagination")
        .or_else(|| value.get("data").and_then(|d| d.get("pagination")))
        .map(canonicalize);

    let clamp = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);
    let fallback = item_count as u64;
    match block {
        Some(block) => {
            let total = block
                .get("total_count")
                .or_else(|| block.get("total"))
                .and_then(Value::as_u64)
                .unwrap_or(fallback);
            Pagination {
                total_count: total,
                page: block.get("page").and_then(Value::as_u64).map_or(1, clamp),
                per_page: block
                    .get("per_page")
                    .and_then(Value::as_u64)
                    .map_or(0, clamp),
            }
        }
        None => Pagination {
            total_count: fallback,
            page: 1,
            per_page: clamp(fallback),
        },
    }
}

// =========================================================
// Typed decoding
// =========================================================

/// Canonicalize then decode into a typed model.
pub fn decode<T: DeserializeOwned>(value: &Value) -> Result<T> {
    serde_json::from_value(canonicalize(value))
        .map_err(|e| ApiError::decode(format!("unexpected response shape: {e}")))
}

/// Decode every element of a listed resource.
pub fn decode_collection<T: DeserializeOwned>(value: &Value, key: &str) -> Result<Vec<T>> {
    let Some(items) = extract_collection(value, key) else {
        return Err(ApiError::decode(format!("no `{key}` collection in response")));
    };
    items
        .as_array()
        .map(|arr| arr.as_slice())
        .unwrap_or_default()
        .iter()
        .map(decode)
        .collect()
}
