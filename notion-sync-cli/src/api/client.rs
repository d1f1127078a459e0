//! Notion API client with rate-limit-aware request execution
//!
//! Every outbound call funnels through [`NotionClient::execute`], which waits
//! out shared cooldowns, retries once per rate-limit signal, and resolves all
//! other failures to an absent result. Paginated endpoints additionally walk
//! the cursor chain and hand back one aggregated response.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ApiError, RequestError};
use super::models::{has_more, is_paginated, next_cursor, results};
use super::operations::Operation;
use super::resilience::RateLimitRegistry;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Fallback cooldown when a 429 arrives without a usable Retry-After header
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(30);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_notion_version() -> String {
    DEFAULT_NOTION_VERSION.to_string()
}

/// Connection options for one Notion integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Integration secret; also the key for shared rate-limit state
    pub auth: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_notion_version")]
    pub notion_version: String,
}

impl ClientConfig {
    pub fn new(auth: impl Into<String>) -> Self {
        Self {
            auth: auth.into(),
            base_url: default_base_url(),
            notion_version: default_notion_version(),
        }
    }

    /// Point the client at a different API host (self-hosted proxy, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Deterministic serialization used to deduplicate client instances
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).expect("client config serializes")
    }
}

/// Truncated form of a credential that is safe to log
pub(crate) fn redact(credential: &str) -> String {
    let prefix: String = credential.chars().take(8).collect();
    format!("{}…", prefix)
}

/// One configured connection to the Notion API.
///
/// Instances are handed out by [`super::ClientManager`] so that all clients
/// sharing a credential also share rate-limit state.
pub struct NotionClient {
    config: ClientConfig,
    http: reqwest::Client,
    rate_limits: Arc<RateLimitRegistry>,
}

impl NotionClient {
    pub(crate) fn new(config: ClientConfig, rate_limits: Arc<RateLimitRegistry>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("http client construction");

        Self {
            config,
            http,
            rate_limits,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn credential(&self) -> &str {
        &self.config.auth
    }

    /// Perform one HTTP round trip and classify the outcome
    async fn send(
        &self,
        operation: &Operation,
        start_cursor: Option<&str>,
    ) -> Result<Value, RequestError> {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            operation.path()
        );

        let mut request = self
            .http
            .request(operation.http_method(), &url)
            .bearer_auth(&self.config.auth)
            .header("Notion-Version", &self.config.notion_version);

        if let Some(body) = operation.body(start_cursor) {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<f64>().ok());

        let body: Value = response.json().await?;

        if status.is_success() {
            return Ok(body);
        }

        Err(RequestError::Api(ApiError {
            status: status.as_u16(),
            code: body
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            message: body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            retry_after,
        }))
    }

    /// Execute one operation, resolving every failure to `None`.
    ///
    /// A pending cooldown for this credential is awaited before sending,
    /// even when another caller triggered it. A rate-limit response installs
    /// a new shared cooldown, waits it out, and retries; each retry may be
    /// limited again, so the loop has no retry cap.
    pub(crate) async fn execute(&self, operation: &Operation) -> Option<Value> {
        self.execute_with_cursor(operation, None).await
    }

    async fn execute_with_cursor(
        &self,
        operation: &Operation,
        start_cursor: Option<&str>,
    ) -> Option<Value> {
        loop {
            // Another request may have tripped the limit already; wait on its
            // cooldown instead of sending a probe of our own.
            if let Some(cooldown) = self.rate_limits.pending_cooldown(self.credential()) {
                self.alert_rate_limited();
                cooldown.await;
            }

            match self.send(operation, start_cursor).await {
                Ok(response) => {
                    debug!("{} succeeded", operation.operation_type());
                    return Some(response);
                }
                Err(RequestError::Api(api_error)) if api_error.is_rate_limited() => {
                    let retry_after = api_error
                        .retry_after
                        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER);
                    debug!(
                        "{} rate-limited, retry-after {:?}",
                        operation.operation_type(),
                        retry_after
                    );

                    let cooldown = self
                        .rate_limits
                        .begin_cooldown(self.credential(), retry_after);
                    self.alert_rate_limited();
                    cooldown.clone().await;
                    self.rate_limits
                        .clear_cooldown(self.credential(), &cooldown);
                }
                Err(request_error) => {
                    error!("{} failed: {}", operation.operation_type(), request_error);
                    return None;
                }
            }
        }
    }

    /// Execute an operation and, when the response is a paginated list,
    /// follow `next_cursor` until exhausted.
    ///
    /// The returned response is the last page with `results` replaced by the
    /// concatenation of every page's results in server order. Callers must
    /// not rely on `has_more`/`next_cursor` afterwards. Non-paginated
    /// responses pass through unchanged; a failed page fails the whole call.
    pub(crate) async fn execute_paginated(&self, operation: &Operation) -> Option<Value> {
        let mut response = self.execute(operation).await?;

        if !is_paginated(&response) {
            return Some(response);
        }

        let mut all_results: Vec<Value> = results(&response).to_vec();

        while is_paginated(&response) && has_more(&response) {
            let cursor = next_cursor(&response).map(str::to_string);
            response = self
                .execute_with_cursor(operation, cursor.as_deref())
                .await?;
            all_results.extend_from_slice(results(&response));
        }

        if is_paginated(&response) {
            response["results"] = Value::Array(all_results);
        }

        Some(response)
    }

    fn alert_rate_limited(&self) {
        warn!(
            "Notion is rate-limiting credential {}; requests resume automatically once the cooldown elapses",
            redact(self.credential())
        );
    }

    // === Endpoint wrappers ===

    /// Retrieve the bot user behind the credential
    pub async fn retrieve_self(&self) -> Option<Value> {
        self.execute(&Operation::RetrieveSelf).await
    }

    /// Query a database, aggregating all result pages
    pub async fn query_database(&self, database_id: &str, filter: Option<Value>) -> Option<Value> {
        self.execute_paginated(&Operation::QueryDatabase {
            database_id: database_id.to_string(),
            filter,
        })
        .await
    }

    /// Retrieve a database's schema
    pub async fn retrieve_database(&self, database_id: &str) -> Option<Value> {
        self.execute(&Operation::RetrieveDatabase {
            database_id: database_id.to_string(),
        })
        .await
    }

    /// Create a page
    pub async fn create_page(&self, params: Value) -> Option<Value> {
        self.execute(&Operation::CreatePage { params }).await
    }

    /// Search objects shared with the integration, aggregating all pages
    pub async fn search(
        &self,
        query: Option<String>,
        sort: Option<Value>,
        filter: Option<Value>,
    ) -> Option<Value> {
        self.execute_paginated(&Operation::Search {
            query,
            sort,
            filter,
        })
        .await
    }
}
