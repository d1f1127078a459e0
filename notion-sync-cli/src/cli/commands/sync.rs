//! Sync command handler

use anyhow::Result;
use colored::*;

use crate::api::ClientManager;
use crate::services::sync::export_assignments;
use crate::storage::Storage;

pub async fn handle_sync(manager: &ClientManager, storage: &dyn Storage) -> Result<()> {
    let report = export_assignments(manager, storage).await?;

    for assignment in &report.created {
        println!(
            "{} {} {}",
            "created".green(),
            assignment.course.cyan(),
            assignment.name
        );
    }

    if report.failed > 0 {
        println!(
            "{}",
            format!("{} assignments could not be created", report.failed).red()
        );
    }

    println!(
        "{} assignments created",
        report.created.len().to_string().bold()
    );
    Ok(())
}
