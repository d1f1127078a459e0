//! Notion Web API Module
//!
//! Client layer for the handful of Notion endpoints the sync needs:
//! retrieve-self, query-database, retrieve-database, create-page and search.
//! Requests are executed through a resilience wrapper that coordinates
//! per-credential rate limiting and aggregates cursor-paginated results.

pub mod client;
pub mod error;
pub mod manager;
pub mod models;
pub mod operations;
pub mod resilience;
pub mod title;

pub use client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_NOTION_VERSION, NotionClient};
pub use error::{ApiError, RequestError};
pub use manager::ClientManager;
pub use operations::Operation;
pub use resilience::{Cooldown, RateLimitRegistry};
pub use title::resolve_title;
