//! Database listing and inspection handlers

use anyhow::{Context, Result};
use colored::*;
use serde_json::{Value, json};

use crate::api::{ClientManager, resolve_title};
use crate::storage::Storage;

use super::connected_client;

/// List every database shared with the integration
pub async fn handle_databases(manager: &ClientManager, storage: &dyn Storage) -> Result<()> {
    let (client, selected) = connected_client(manager, storage).await?;

    let filter = json!({"property": "object", "value": "database"});
    let response = client
        .search(None, None, Some(filter))
        .await
        .context("search failed; see the log for details")?;

    let results = response
        .get("results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if results.is_empty() {
        println!("No databases are shared with this integration");
        return Ok(());
    }

    for database in &results {
        let id = database.get("id").and_then(Value::as_str).unwrap_or("");
        let title = resolve_title(database, true).unwrap_or_else(|| "Untitled".to_string());
        let marker = if selected.as_deref() == Some(id) {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!("{} {}  {}", marker, id.dimmed(), title);
    }
    Ok(())
}

/// Show one database by id
pub async fn handle_database(
    manager: &ClientManager,
    storage: &dyn Storage,
    id: &str,
) -> Result<()> {
    let (client, _) = connected_client(manager, storage).await?;

    let database = client
        .retrieve_database(id)
        .await
        .context("database could not be retrieved; see the log for details")?;

    let title = resolve_title(&database, true).unwrap_or_else(|| "Untitled".to_string());
    println!("{}  {}", id.dimmed(), title.bold());

    if let Some(properties) = database.get("properties").and_then(Value::as_object) {
        for (name, property) in properties {
            let kind = property.get("type").and_then(Value::as_str).unwrap_or("?");
            println!("  {}  {}", kind.dimmed(), name);
        }
    }
    Ok(())
}
