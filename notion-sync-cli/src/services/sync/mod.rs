//! Assignment reconciliation
//!
//! Loads the cached assignment list, queries the configured Notion database
//! for pages that already exist, diffs the two by URL, and creates pages for
//! the difference. All Notion traffic goes through the resilient client;
//! request failures degrade the diff instead of aborting the run.

pub mod models;
pub mod payload;

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use futures::future::join_all;
use log::{error, info};
use serde_json::{Value, json};

use crate::api::{ClientConfig, ClientManager, NotionClient};
use crate::config::{self, SyncOptions};
use crate::storage::Storage;

pub use models::{RemotePage, SavedAssignment};

/// Storage key the scraper persists parsed assignments under, keyed by
/// course name
const SAVED_ASSIGNMENTS_KEY: &str = "savedAssignments";

/// Outcome of one reconciliation run
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Assignments whose pages were created, in the order they were queued
    pub created: Vec<SavedAssignment>,
    /// Number of create-page calls that failed; none are retried
    pub failed: usize,
}

/// Push cached assignments that are not yet present in the configured Notion
/// database.
///
/// Fails only on missing credential or database id. Everything request-level
/// resolves to skipped work: a failed query means every cached assignment is
/// treated as new, a failed creation is counted and reported in aggregate.
pub async fn export_assignments(
    manager: &ClientManager,
    storage: &dyn Storage,
) -> Result<SyncReport> {
    let connection = config::load_connection(storage).await?;
    let (auth, database_id) = match (connection.key, connection.database_id) {
        (Some(key), Some(id)) => (key, id),
        _ => bail!(
            "missing Notion integration key or database id; set them with \
             `notion-sync-cli config set` or the NOTION_KEY / NOTION_DATABASE_ID variables"
        ),
    };

    let options = config::load_options(storage).await?;
    let mut client_config = ClientConfig::new(auth);
    if let Some(base_url) = connection.base_url {
        client_config = client_config.with_base_url(base_url);
    }
    let client = manager.get_instance(client_config);

    let assignments = new_assignments(&client, storage, &database_id, &options).await?;
    info!("{} new assignments to create", assignments.len());

    let creations = assignments.iter().map(|assignment| {
        let client = client.clone();
        let params = payload::page_parameters(assignment, &database_id, &options);
        async move {
            match client.create_page(params).await {
                Some(_) => {
                    info!("created assignment {} {}", assignment.course, assignment.name);
                    Some(assignment.clone())
                }
                None => {
                    error!(
                        "error creating assignment {} {}",
                        assignment.course, assignment.name
                    );
                    None
                }
            }
        }
    });

    let mut report = SyncReport::default();
    for outcome in join_all(creations).await {
        match outcome {
            Some(created) => report.created.push(created),
            None => report.failed += 1,
        }
    }

    if report.failed > 0 {
        error!(
            "encountered errors creating {} assignments",
            report.failed
        );
    }

    Ok(report)
}

/// Cached assignments that have no page in the database yet.
///
/// When the query produces no usable results the diff degrades to "all
/// cached assignments are new" rather than blocking the run.
async fn new_assignments(
    client: &NotionClient,
    storage: &dyn Storage,
    database_id: &str,
    options: &SyncOptions,
) -> Result<Vec<SavedAssignment>> {
    let saved = saved_assignments(storage).await?;
    let remote = remote_pages(client, database_id, options).await;

    Ok(match remote {
        Some(pages) if !pages.is_empty() => saved
            .into_iter()
            .filter(|assignment| {
                !pages
                    .iter()
                    .any(|page| page.url.as_deref() == Some(assignment.url.as_str()))
            })
            .collect(),
        _ => saved,
    })
}

/// Cached assignments flattened across courses, keeping only those still due
/// in the future
async fn saved_assignments(storage: &dyn Storage) -> Result<Vec<SavedAssignment>> {
    let stored = storage.get(&[SAVED_ASSIGNMENTS_KEY]).await?;
    let by_course: BTreeMap<String, Vec<SavedAssignment>> = stored
        .get(SAVED_ASSIGNMENTS_KEY)
        .map(|value| serde_json::from_value(value.clone()))
        .transpose()
        .context("malformed saved assignments cache")?
        .unwrap_or_default();

    let now = Utc::now();
    Ok(by_course
        .into_values()
        .flatten()
        .filter(|assignment| assignment.due_in_future(now))
        .collect())
}

/// Query the database for existing assignment pages
async fn remote_pages(
    client: &NotionClient,
    database_id: &str,
    options: &SyncOptions,
) -> Option<Vec<RemotePage>> {
    let response = client
        .query_database(database_id, canvas_filter(options))
        .await?;

    let pages = response
        .get("results")?
        .as_array()?
        .iter()
        .map(|page| RemotePage::from_page(page, &options.property_names))
        .collect();
    Some(pages)
}

/// Filter that restricts the query to pages this tool manages: category
/// equals the configured Canvas value, or category empty when no value is
/// configured. No category property name means no filter at all.
fn canvas_filter(options: &SyncOptions) -> Option<Value> {
    let property = options.property_names.category.as_ref()?;
    let select = match &options.property_values.category_canvas {
        Some(value) => json!({"equals": value}),
        None => json!({"is_empty": true}),
    };

    Some(json!({"property": property, "select": select}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PropertyNames, PropertyValues};

    fn options(category: Option<&str>, canvas: Option<&str>) -> SyncOptions {
        SyncOptions {
            timezone: None,
            property_names: PropertyNames {
                name: Some("Name".to_string()),
                category: category.map(str::to_string),
                course: Some("Course".to_string()),
                url: Some("URL".to_string()),
                status: Some("Status".to_string()),
                available: Some("Reminder".to_string()),
                due: Some("Due".to_string()),
                span: Some("Date Span".to_string()),
            },
            property_values: PropertyValues {
                category_canvas: canvas.map(str::to_string),
                status_to_do: Some("To Do".to_string()),
            },
        }
    }

    #[test]
    fn test_canvas_filter_with_configured_value() {
        let filter = canvas_filter(&options(Some("Category"), Some("Canvas")));
        assert_eq!(
            filter,
            Some(json!({"property": "Category", "select": {"equals": "Canvas"}}))
        );
    }

    #[test]
    fn test_canvas_filter_without_value_matches_empty() {
        let filter = canvas_filter(&options(Some("Category"), None));
        assert_eq!(
            filter,
            Some(json!({"property": "Category", "select": {"is_empty": true}}))
        );
    }

    #[test]
    fn test_canvas_filter_without_property_name() {
        assert_eq!(canvas_filter(&options(None, Some("Canvas"))), None);
    }
}
