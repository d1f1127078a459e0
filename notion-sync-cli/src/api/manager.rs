//! Client instance registry with shared per-credential state
//!
//! Holds the three process-wide maps: client instances keyed by config
//! fingerprint, rate-limit state keyed by credential, and the
//! validated-credential cache. Constructed once in `main` and passed down;
//! there is no global state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::debug;

use super::client::{ClientConfig, NotionClient, redact};
use super::resilience::RateLimitRegistry;

pub struct ClientManager {
    instances: Mutex<HashMap<String, Arc<NotionClient>>>,
    rate_limits: Arc<RateLimitRegistry>,
    validated: Mutex<HashMap<String, bool>>,
}

impl ClientManager {
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
            rate_limits: Arc::new(RateLimitRegistry::new()),
            validated: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch or lazily construct the client for a configuration.
    ///
    /// Instances are keyed by the config fingerprint, so repeated lookups
    /// with the same configuration return the same client. A credential seen
    /// for the first time gets an idle rate-limit entry.
    pub fn get_instance(&self, config: ClientConfig) -> Arc<NotionClient> {
        let fingerprint = config.fingerprint();
        let mut instances = self.instances.lock().unwrap();

        if let Some(client) = instances.get(&fingerprint) {
            return client.clone();
        }

        debug!("registering client for credential {}", redact(&config.auth));
        self.rate_limits.register(&config.auth);
        let client = Arc::new(NotionClient::new(config, self.rate_limits.clone()));
        instances.insert(fingerprint, client.clone());
        client
    }

    /// Whether the client's credential authenticates against the API.
    ///
    /// The first check issues one retrieve-self request through the executor
    /// (subject to the usual rate-limit handling); the outcome is memoized
    /// per credential for the lifetime of the process.
    pub async fn validate_credential(&self, client: &NotionClient) -> bool {
        if let Some(&valid) = self.validated.lock().unwrap().get(client.credential()) {
            return valid;
        }

        let valid = client.retrieve_self().await.is_some();
        debug!(
            "credential {} validated: {}",
            redact(client.credential()),
            valid
        );
        self.validated
            .lock()
            .unwrap()
            .insert(client.credential().to_string(), valid);
        valid
    }
}

impl Default for ClientManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_config_reuses_instance() {
        let manager = ClientManager::new();

        let first = manager.get_instance(ClientConfig::new("secret-a"));
        let second = manager.get_instance(ClientConfig::new("secret-a"));

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_distinct_configs_get_distinct_instances() {
        let manager = ClientManager::new();

        let by_auth = manager.get_instance(ClientConfig::new("secret-a"));
        let by_other_auth = manager.get_instance(ClientConfig::new("secret-b"));
        let by_host = manager
            .get_instance(ClientConfig::new("secret-a").with_base_url("http://localhost:3000"));

        assert!(!Arc::ptr_eq(&by_auth, &by_other_auth));
        assert!(!Arc::ptr_eq(&by_auth, &by_host));
    }
}
