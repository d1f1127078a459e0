//! Notion API operations
//!
//! Each variant describes one endpoint the client knows how to call: its
//! HTTP method, path, and JSON body. Paginated operations accept a cursor
//! injected by the executor while it walks the result pages.

use reqwest::Method;
use serde_json::{Map, Value, json};

/// A single Notion API call that can be executed by the client
#[derive(Debug, Clone)]
pub enum Operation {
    /// Retrieve the bot user behind the credential (GET /users/me)
    RetrieveSelf,
    /// Query a database's pages (POST /databases/{id}/query, paginated)
    QueryDatabase {
        database_id: String,
        filter: Option<Value>,
    },
    /// Retrieve a database's schema (GET /databases/{id})
    RetrieveDatabase { database_id: String },
    /// Create a page (POST /pages)
    CreatePage { params: Value },
    /// Search objects shared with the integration (POST /search, paginated)
    Search {
        query: Option<String>,
        sort: Option<Value>,
        filter: Option<Value>,
    },
}

impl Operation {
    /// Get the HTTP method for this operation
    pub fn http_method(&self) -> Method {
        match self {
            Self::RetrieveSelf | Self::RetrieveDatabase { .. } => Method::GET,
            Self::QueryDatabase { .. } | Self::CreatePage { .. } | Self::Search { .. } => {
                Method::POST
            }
        }
    }

    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Self::RetrieveSelf => "users/me".to_string(),
            Self::QueryDatabase { database_id, .. } => format!("databases/{}/query", database_id),
            Self::RetrieveDatabase { database_id } => format!("databases/{}", database_id),
            Self::CreatePage { .. } => "pages".to_string(),
            Self::Search { .. } => "search".to_string(),
        }
    }

    /// JSON body for the request, with `start_cursor` injected when the
    /// executor is continuing a paginated result
    pub fn body(&self, start_cursor: Option<&str>) -> Option<Value> {
        let mut body = match self {
            Self::RetrieveSelf | Self::RetrieveDatabase { .. } => return None,
            Self::CreatePage { params } => return Some(params.clone()),
            Self::QueryDatabase { filter, .. } => {
                let mut body = Map::new();
                if let Some(filter) = filter {
                    body.insert("filter".to_string(), filter.clone());
                }
                body
            }
            Self::Search {
                query,
                sort,
                filter,
            } => {
                let mut body = Map::new();
                if let Some(query) = query {
                    body.insert("query".to_string(), json!(query));
                }
                if let Some(sort) = sort {
                    body.insert("sort".to_string(), sort.clone());
                }
                if let Some(filter) = filter {
                    body.insert("filter".to_string(), filter.clone());
                }
                body
            }
        };

        if let Some(cursor) = start_cursor {
            body.insert("start_cursor".to_string(), json!(cursor));
        }

        Some(Value::Object(body))
    }

    /// Whether the endpoint returns a cursor-paginated list
    pub fn is_paginated(&self) -> bool {
        matches!(self, Self::QueryDatabase { .. } | Self::Search { .. })
    }

    /// Get the operation type as a string (used in logs)
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::RetrieveSelf => "retrieve_self",
            Self::QueryDatabase { .. } => "query_database",
            Self::RetrieveDatabase { .. } => "retrieve_database",
            Self::CreatePage { .. } => "create_page",
            Self::Search { .. } => "search",
        }
    }
}
