//! Command handlers

pub mod config;
pub mod databases;
pub mod sync;
pub mod verify;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ClientConfig, ClientManager, NotionClient};
use crate::config::load_connection;
use crate::storage::Storage;

/// Build a client from the stored connection settings.
///
/// Returns the client and the configured database id, if any; a missing
/// integration key is a hard error since no command can proceed without one.
pub(crate) async fn connected_client(
    manager: &ClientManager,
    storage: &dyn Storage,
) -> Result<(Arc<NotionClient>, Option<String>)> {
    let connection = load_connection(storage).await?;
    let key = connection.key.context(
        "no Notion integration key configured; set it with \
         `notion-sync-cli config set notion.notionKey <secret>` or NOTION_KEY",
    )?;

    let mut config = ClientConfig::new(key);
    if let Some(base_url) = connection.base_url {
        config = config.with_base_url(base_url);
    }

    Ok((manager.get_instance(config), connection.database_id))
}
