//! Verify command handler

use anyhow::Result;
use colored::*;

use crate::api::ClientManager;
use crate::storage::Storage;

use super::connected_client;

pub async fn handle_verify(manager: &ClientManager, storage: &dyn Storage) -> Result<()> {
    let (client, _) = connected_client(manager, storage).await?;

    if manager.validate_credential(&client).await {
        println!("{}", "Integration key is valid".green());
    } else {
        println!(
            "{}",
            "Integration key failed to authenticate; see the log for details".red()
        );
    }
    Ok(())
}
