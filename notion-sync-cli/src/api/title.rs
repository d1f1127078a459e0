//! Title resolution for pages and databases
//!
//! Search results mix page and database objects; databases carry their
//! title directly, pages bury it in whichever property has type "title".

use log::warn;
use serde_json::Value;

/// Extract the plain-text title of a page or database object, optionally
/// prefixed with its emoji icon.
///
/// Returns `None` when the object has no title text or its shape is not
/// recognised; malformed objects log a warning rather than failing the
/// caller.
pub fn resolve_title(object: &Value, icon: bool) -> Option<String> {
    let empty = Vec::new();
    let fragments = match object.get("object").and_then(Value::as_str) {
        Some("page") => object
            .get("properties")
            .and_then(Value::as_object)
            .and_then(|properties| {
                properties
                    .values()
                    .find(|property| property.get("type").and_then(Value::as_str) == Some("title"))
            })
            .and_then(|property| property.get("title"))
            .and_then(Value::as_array)
            .unwrap_or(&empty),
        Some("database") => object
            .get("title")
            .and_then(Value::as_array)
            .unwrap_or(&empty),
        _ => {
            warn!("failed to resolve title of unrecognised object: {}", object);
            return None;
        }
    };

    let title: String = fragments
        .iter()
        .filter_map(|fragment| fragment.get("plain_text").and_then(Value::as_str))
        .collect();

    if title.is_empty() {
        return None;
    }

    if !icon {
        return Some(title);
    }

    let emoji = object
        .get("icon")
        .filter(|icon| icon.get("type").and_then(Value::as_str) == Some("emoji"))
        .and_then(|icon| icon.get("emoji"))
        .and_then(Value::as_str);

    match emoji {
        Some(emoji) => Some(format!("{} {}", emoji, title)),
        None => Some(title),
    }
}
