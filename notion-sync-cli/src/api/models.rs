//! Response-shape helpers for the Notion API
//!
//! Paginated endpoints answer with a list object carrying `results`,
//! `has_more` and `next_cursor`. The executor detects that shape the same
//! way the API does: by the presence of `has_more`.

use serde_json::Value;

/// Whether a response body is a paginated list object
pub fn is_paginated(response: &Value) -> bool {
    response.get("has_more").is_some()
}

/// Whether a paginated response has further pages
pub fn has_more(response: &Value) -> bool {
    response
        .get("has_more")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Cursor for the next page, if the response carries one
pub fn next_cursor(response: &Value) -> Option<&str> {
    response.get("next_cursor").and_then(Value::as_str)
}

/// The `results` array of a paginated response
pub fn results(response: &Value) -> &[Value] {
    response
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
