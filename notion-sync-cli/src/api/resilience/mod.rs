//! Rate-limit coordination for Notion API calls
//!
//! Notion penalises integrations per credential, so the cooldown state is
//! shared by every client instance that authenticates with the same secret.

pub mod rate_limit;

pub use rate_limit::{Cooldown, RateLimitRegistry};
