//! Assignment views used by the reconciler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PropertyNames;

/// One cached coursework assignment, as parsed from Canvas and persisted by
/// the scraper. Immutable; new values come from re-parsing, never mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAssignment {
    pub name: String,
    pub course: String,
    /// Emoji shown as the page icon, when the course has one configured
    #[serde(default)]
    pub icon: Option<String>,
    pub url: String,
    /// RFC 3339 date the assignment opens
    pub available: String,
    /// RFC 3339 date the assignment is due
    pub due: String,
}

impl SavedAssignment {
    /// Whether the assignment is still due after `now`. Unparseable due
    /// dates count as past.
    pub fn due_in_future(&self, now: DateTime<Utc>) -> bool {
        DateTime::parse_from_rfc3339(&self.due)
            .map(|due| due > now)
            .unwrap_or(false)
    }
}

/// Minimal projection of a page fetched from the Notion database, used only
/// for URL-based deduplication against cached assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePage {
    pub name: String,
    pub course: Option<String>,
    pub url: Option<String>,
}

impl RemotePage {
    /// Project a query result using the configured property names
    pub fn from_page(page: &Value, names: &PropertyNames) -> Self {
        let properties = page.get("properties").and_then(Value::as_object);

        let name = names
            .name
            .as_deref()
            .and_then(|key| properties.and_then(|p| p.get(key)))
            .and_then(|property| property.get("title"))
            .and_then(Value::as_array)
            .map(|fragments| {
                fragments
                    .iter()
                    .filter_map(|fragment| fragment.get("plain_text").and_then(Value::as_str))
                    .collect::<String>()
            })
            .unwrap_or_default();

        let course = names
            .course
            .as_deref()
            .and_then(|key| properties.and_then(|p| p.get(key)))
            .and_then(|property| property.get("select"))
            .and_then(|select| select.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let url = names
            .url
            .as_deref()
            .and_then(|key| properties.and_then(|p| p.get(key)))
            .and_then(|property| property.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self { name, course, url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names() -> PropertyNames {
        PropertyNames {
            name: Some("Name".to_string()),
            category: Some("Category".to_string()),
            course: Some("Course".to_string()),
            url: Some("URL".to_string()),
            status: Some("Status".to_string()),
            available: Some("Reminder".to_string()),
            due: Some("Due".to_string()),
            span: Some("Date Span".to_string()),
        }
    }

    fn assignment(due: &str) -> SavedAssignment {
        SavedAssignment {
            name: "Essay".to_string(),
            course: "ENGL101".to_string(),
            icon: None,
            url: "https://canvas.test/1".to_string(),
            available: "2026-01-01T00:00:00Z".to_string(),
            due: due.to_string(),
        }
    }

    #[test]
    fn test_due_date_filtering() {
        let now = "2026-06-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();

        assert!(assignment("2026-06-02T00:00:00Z").due_in_future(now));
        assert!(!assignment("2026-05-31T00:00:00Z").due_in_future(now));
        assert!(!assignment("2026-06-01T12:00:00Z").due_in_future(now));
        assert!(!assignment("not a date").due_in_future(now));
    }

    #[test]
    fn test_remote_page_projection() {
        let page = json!({
            "object": "page",
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": "Essay"}]},
                "Course": {"type": "select", "select": {"name": "ENGL101"}},
                "URL": {"type": "url", "url": "https://canvas.test/1"},
            },
        });

        let remote = RemotePage::from_page(&page, &names());
        assert_eq!(remote.name, "Essay");
        assert_eq!(remote.course.as_deref(), Some("ENGL101"));
        assert_eq!(remote.url.as_deref(), Some("https://canvas.test/1"));
    }

    #[test]
    fn test_remote_page_with_missing_properties() {
        let page = json!({"object": "page", "properties": {}});

        let remote = RemotePage::from_page(&page, &names());
        assert_eq!(remote.name, "");
        assert_eq!(remote.course, None);
        assert_eq!(remote.url, None);
    }

    #[test]
    fn test_remote_page_with_unset_property_names() {
        let page = json!({
            "object": "page",
            "properties": {
                "URL": {"type": "url", "url": "https://canvas.test/1"},
            },
        });
        let names = PropertyNames {
            url: None,
            ..names()
        };

        let remote = RemotePage::from_page(&page, &names);
        assert_eq!(remote.url, None);
    }
}
