//! Config command handlers

use std::collections::HashMap;

use anyhow::{Result, bail};
use colored::*;
use serde_json::{Value, json};

use crate::api::client::redact;
use crate::config::{ALL_KEYS, KEY_NOTION_KEY};
use crate::storage::Storage;

pub async fn handle_show(storage: &dyn Storage) -> Result<()> {
    let values = storage.get(ALL_KEYS).await?;

    for &key in ALL_KEYS {
        let value = match values.get(key) {
            // Never echo the credential in full
            Some(Value::String(secret)) if key == KEY_NOTION_KEY => redact(secret),
            Some(Value::String(value)) => value.clone(),
            Some(value) => value.to_string(),
            None => "(default)".dimmed().to_string(),
        };
        println!("{} = {}", key.cyan(), value);
    }
    Ok(())
}

pub async fn handle_set(storage: &dyn Storage, key: &str, value: &str) -> Result<()> {
    if !ALL_KEYS.contains(&key) {
        bail!(
            "unknown setting {:?}; known settings are:\n  {}",
            key,
            ALL_KEYS.join("\n  ")
        );
    }

    storage
        .set(HashMap::from([(key.to_string(), json!(value))]))
        .await?;
    println!("{} {}", "set".green(), key);
    Ok(())
}
