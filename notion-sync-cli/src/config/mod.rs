//! Stored settings and their defaults
//!
//! Every setting lives in the key-value storage layer under the same keys
//! the browser extension used, so an exported extension profile can be
//! dropped in as-is. A property name stored as an empty string means "do not
//! write this property"; defaults apply only when a key is missing entirely.

use std::collections::HashMap;

use anyhow::Result;
use chrono_tz::Tz;
use log::warn;
use serde_json::Value;

use crate::storage::Storage;

pub const KEY_NOTION_KEY: &str = "notion.notionKey";
pub const KEY_DATABASE_ID: &str = "notion.databaseId";
pub const KEY_BASE_URL: &str = "notion.baseUrl";
pub const KEY_TIMEZONE: &str = "timezone";
pub const KEY_PROPERTY_NAME: &str = "notion.propertyNames.name";
pub const KEY_PROPERTY_CATEGORY: &str = "notion.propertyNames.category";
pub const KEY_PROPERTY_COURSE: &str = "notion.propertyNames.course";
pub const KEY_PROPERTY_URL: &str = "notion.propertyNames.url";
pub const KEY_PROPERTY_STATUS: &str = "notion.propertyNames.status";
pub const KEY_PROPERTY_AVAILABLE: &str = "notion.propertyNames.available";
pub const KEY_PROPERTY_DUE: &str = "notion.propertyNames.due";
pub const KEY_PROPERTY_SPAN: &str = "notion.propertyNames.span";
pub const KEY_VALUE_CATEGORY_CANVAS: &str = "notion.propertyValues.categoryCanvas";
pub const KEY_VALUE_STATUS_TO_DO: &str = "notion.propertyValues.statusToDo";

/// Every key the CLI knows how to store
pub const ALL_KEYS: &[&str] = &[
    KEY_NOTION_KEY,
    KEY_DATABASE_ID,
    KEY_BASE_URL,
    KEY_TIMEZONE,
    KEY_PROPERTY_NAME,
    KEY_PROPERTY_CATEGORY,
    KEY_PROPERTY_COURSE,
    KEY_PROPERTY_URL,
    KEY_PROPERTY_STATUS,
    KEY_PROPERTY_AVAILABLE,
    KEY_PROPERTY_DUE,
    KEY_PROPERTY_SPAN,
    KEY_VALUE_CATEGORY_CANVAS,
    KEY_VALUE_STATUS_TO_DO,
];

const DEFAULT_TIMEZONE: &str = "Pacific/Auckland";

/// Configured Notion property names. `None` means the property is omitted
/// from created pages entirely.
#[derive(Debug, Clone)]
pub struct PropertyNames {
    pub name: Option<String>,
    pub category: Option<String>,
    pub course: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub available: Option<String>,
    pub due: Option<String>,
    pub span: Option<String>,
}

/// Configured select values written into created pages
#[derive(Debug, Clone)]
pub struct PropertyValues {
    pub category_canvas: Option<String>,
    pub status_to_do: Option<String>,
}

/// Everything the reconciler needs to shape queries and page payloads
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub timezone: Option<Tz>,
    pub property_names: PropertyNames,
    pub property_values: PropertyValues,
}

/// Connection settings for the Notion API
#[derive(Debug, Clone)]
pub struct Connection {
    pub key: Option<String>,
    pub database_id: Option<String>,
    pub base_url: Option<String>,
}

/// Stored value for `key`, with the extension's semantics: a missing key
/// falls back to `default`, an empty string disables the setting.
fn configured(values: &HashMap<String, Value>, key: &str, default: &str) -> Option<String> {
    let value = values
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default);
    (!value.is_empty()).then(|| value.to_string())
}

/// Load the sync options, applying extension defaults
pub async fn load_options(storage: &dyn Storage) -> Result<SyncOptions> {
    let values = storage
        .get(&[
            KEY_TIMEZONE,
            KEY_PROPERTY_NAME,
            KEY_PROPERTY_CATEGORY,
            KEY_PROPERTY_COURSE,
            KEY_PROPERTY_URL,
            KEY_PROPERTY_STATUS,
            KEY_PROPERTY_AVAILABLE,
            KEY_PROPERTY_DUE,
            KEY_PROPERTY_SPAN,
            KEY_VALUE_CATEGORY_CANVAS,
            KEY_VALUE_STATUS_TO_DO,
        ])
        .await?;

    let timezone = configured(&values, KEY_TIMEZONE, DEFAULT_TIMEZONE).and_then(|name| {
        match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                warn!("ignoring unknown time zone {:?}", name);
                None
            }
        }
    });

    Ok(SyncOptions {
        timezone,
        property_names: PropertyNames {
            name: configured(&values, KEY_PROPERTY_NAME, "Name"),
            category: configured(&values, KEY_PROPERTY_CATEGORY, "Category"),
            course: configured(&values, KEY_PROPERTY_COURSE, "Course"),
            url: configured(&values, KEY_PROPERTY_URL, "URL"),
            status: configured(&values, KEY_PROPERTY_STATUS, "Status"),
            available: configured(&values, KEY_PROPERTY_AVAILABLE, "Reminder"),
            due: configured(&values, KEY_PROPERTY_DUE, "Due"),
            span: configured(&values, KEY_PROPERTY_SPAN, "Date Span"),
        },
        property_values: PropertyValues {
            category_canvas: configured(&values, KEY_VALUE_CATEGORY_CANVAS, "Canvas"),
            status_to_do: configured(&values, KEY_VALUE_STATUS_TO_DO, "To Do"),
        },
    })
}

/// Load connection settings, falling back to NOTION_KEY / NOTION_DATABASE_ID
/// environment variables when the store has no value
pub async fn load_connection(storage: &dyn Storage) -> Result<Connection> {
    let values = storage
        .get(&[KEY_NOTION_KEY, KEY_DATABASE_ID, KEY_BASE_URL])
        .await?;

    let key = configured(&values, KEY_NOTION_KEY, "")
        .or_else(|| std::env::var("NOTION_KEY").ok().filter(|v| !v.is_empty()));
    let database_id = configured(&values, KEY_DATABASE_ID, "").or_else(|| {
        std::env::var("NOTION_DATABASE_ID")
            .ok()
            .filter(|v| !v.is_empty())
    });
    let base_url = configured(&values, KEY_BASE_URL, "");

    Ok(Connection {
        key,
        database_id,
        base_url,
    })
}
