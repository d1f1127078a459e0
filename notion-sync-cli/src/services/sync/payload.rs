//! Create-page payload construction
//!
//! Property names come from configuration; an unset name drops that
//! property from the payload entirely, which lets users opt out of columns
//! their database does not have.

use serde_json::{Map, Value, json};

use crate::config::SyncOptions;

use super::models::SavedAssignment;

/// Assemble the create-page body for one assignment
pub fn page_parameters(
    assignment: &SavedAssignment,
    database_id: &str,
    options: &SyncOptions,
) -> Value {
    let names = &options.property_names;
    let values = &options.property_values;
    let timezone = options.timezone.map(|tz| tz.name());

    let mut properties = Map::new();

    if let Some(key) = &names.name {
        properties.insert(
            key.clone(),
            json!({"title": [{"text": {"content": assignment.name}}]}),
        );
    }
    if let Some(key) = &names.category {
        properties.insert(
            key.clone(),
            json!({"select": select_value(values.category_canvas.as_deref())}),
        );
    }
    if let Some(key) = &names.course {
        properties.insert(key.clone(), json!({"select": {"name": assignment.course}}));
    }
    if let Some(key) = &names.url {
        properties.insert(key.clone(), json!({"url": assignment.url}));
    }
    if let Some(key) = &names.status {
        properties.insert(
            key.clone(),
            json!({"select": select_value(values.status_to_do.as_deref())}),
        );
    }
    if let Some(key) = &names.available {
        properties.insert(
            key.clone(),
            json!({"date": {"start": assignment.available, "time_zone": timezone}}),
        );
    }
    if let Some(key) = &names.due {
        properties.insert(
            key.clone(),
            json!({"date": {"start": assignment.due, "time_zone": timezone}}),
        );
    }
    if let Some(key) = &names.span {
        properties.insert(
            key.clone(),
            json!({"date": {"start": assignment.available, "end": assignment.due, "time_zone": timezone}}),
        );
    }

    json!({
        "parent": {"type": "database_id", "database_id": database_id},
        "properties": properties,
        "icon": assignment.icon.as_deref().map(|emoji| json!({"emoji": emoji})),
    })
}

/// Notion rejects empty select names; unconfigured values map to null
fn select_value(value: Option<&str>) -> Value {
    match value {
        Some(name) => json!({"name": name}),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PropertyNames, PropertyValues};

    fn options() -> SyncOptions {
        SyncOptions {
            timezone: Some(chrono_tz::Pacific::Auckland),
            property_names: PropertyNames {
                name: Some("Name".to_string()),
                category: Some("Category".to_string()),
                course: Some("Course".to_string()),
                url: Some("URL".to_string()),
                status: Some("Status".to_string()),
                available: Some("Reminder".to_string()),
                due: Some("Due".to_string()),
                span: Some("Date Span".to_string()),
            },
            property_values: PropertyValues {
                category_canvas: Some("Canvas".to_string()),
                status_to_do: Some("To Do".to_string()),
            },
        }
    }

    fn assignment() -> SavedAssignment {
        SavedAssignment {
            name: "Essay".to_string(),
            course: "ENGL101".to_string(),
            icon: Some("📘".to_string()),
            url: "https://canvas.test/1".to_string(),
            available: "2026-05-01T00:00:00Z".to_string(),
            due: "2026-06-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_full_payload() {
        let params = page_parameters(&assignment(), "db-1", &options());

        assert_eq!(params["parent"]["database_id"], "db-1");
        assert_eq!(params["icon"]["emoji"], "📘");
        assert_eq!(
            params["properties"]["Name"]["title"][0]["text"]["content"],
            "Essay"
        );
        assert_eq!(params["properties"]["Category"]["select"]["name"], "Canvas");
        assert_eq!(params["properties"]["Course"]["select"]["name"], "ENGL101");
        assert_eq!(params["properties"]["URL"]["url"], "https://canvas.test/1");
        assert_eq!(params["properties"]["Status"]["select"]["name"], "To Do");
        assert_eq!(
            params["properties"]["Date Span"]["date"],
            serde_json::json!({
                "start": "2026-05-01T00:00:00Z",
                "end": "2026-06-01T00:00:00Z",
                "time_zone": "Pacific/Auckland",
            })
        );
    }

    #[test]
    fn test_unset_property_names_are_omitted() {
        let mut options = options();
        options.property_names.span = None;
        options.property_names.status = None;

        let params = page_parameters(&assignment(), "db-1", &options);
        let properties = params["properties"].as_object().unwrap();

        assert!(!properties.contains_key("Date Span"));
        assert!(!properties.contains_key("Status"));
        assert!(properties.contains_key("Name"));
    }

    #[test]
    fn test_unconfigured_select_values_are_null() {
        let mut options = options();
        options.property_values.category_canvas = None;

        let params = page_parameters(&assignment(), "db-1", &options);
        assert_eq!(params["properties"]["Category"]["select"], Value::Null);
    }

    #[test]
    fn test_missing_icon_is_null() {
        let mut assignment = assignment();
        assignment.icon = None;

        let params = page_parameters(&assignment, "db-1", &options());
        assert_eq!(params["icon"], Value::Null);
    }

    #[test]
    fn test_missing_timezone_is_null() {
        let mut options = options();
        options.timezone = None;

        let params = page_parameters(&assignment(), "db-1", &options);
        assert_eq!(params["properties"]["Due"]["date"]["time_zone"], Value::Null);
    }
}
