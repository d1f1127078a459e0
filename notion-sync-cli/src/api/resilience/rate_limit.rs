//! Per-credential rate-limit state with single-flight cooldowns
//!
//! The first request to receive a 429 installs a shared cooldown future;
//! every other request for the same credential awaits that future instead of
//! probing the API while it is limited.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::debug;

/// A shared, awaitable timer that resolves when a rate-limit period elapses.
/// Cloning hands out another waiter on the same underlying sleep.
pub type Cooldown = Shared<BoxFuture<'static, ()>>;

#[derive(Default)]
struct RateLimitState {
    limited: bool,
    cooldown: Option<Cooldown>,
}

/// Rate-limit bookkeeping keyed by credential.
///
/// Mutation happens only between await points; the mutex is never held
/// across one.
#[derive(Default)]
pub struct RateLimitRegistry {
    states: Mutex<HashMap<String, RateLimitState>>,
}

impl RateLimitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a state entry exists for the credential, starting idle.
    pub fn register(&self, credential: &str) {
        self.states
            .lock()
            .unwrap()
            .entry(credential.to_string())
            .or_default();
    }

    /// The pending cooldown for a credential, if it is currently limited.
    pub fn pending_cooldown(&self, credential: &str) -> Option<Cooldown> {
        let states = self.states.lock().unwrap();
        states
            .get(credential)
            .filter(|state| state.limited)
            .and_then(|state| state.cooldown.clone())
    }

    /// Install a cooldown that resolves after `retry_after`.
    ///
    /// If another caller already installed one, that future is returned
    /// instead so all waiters share a single timer.
    pub fn begin_cooldown(&self, credential: &str, retry_after: Duration) -> Cooldown {
        let mut states = self.states.lock().unwrap();
        let state = states.entry(credential.to_string()).or_default();

        if state.limited {
            if let Some(cooldown) = &state.cooldown {
                return cooldown.clone();
            }
        }

        debug!("starting {:?} rate-limit cooldown", retry_after);
        let cooldown: Cooldown = tokio::time::sleep(retry_after).boxed().shared();
        state.limited = true;
        state.cooldown = Some(cooldown.clone());
        cooldown
    }

    /// Reset the credential to idle once `cooldown` has elapsed.
    ///
    /// A newer cooldown installed by a later rate-limit signal is left
    /// untouched.
    pub fn clear_cooldown(&self, credential: &str, cooldown: &Cooldown) {
        let mut states = self.states.lock().unwrap();
        if let Some(state) = states.get_mut(credential) {
            let matches = state
                .cooldown
                .as_ref()
                .is_some_and(|current| current.ptr_eq(cooldown));
            if matches {
                state.limited = false;
                state.cooldown = None;
            }
        }
    }

    /// Whether the credential is currently limited
    pub fn is_limited(&self, credential: &str) -> bool {
        self.states
            .lock()
            .unwrap()
            .get(credential)
            .is_some_and(|state| state.limited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_starts_idle() {
        let registry = RateLimitRegistry::new();
        registry.register("secret-a");

        assert!(!registry.is_limited("secret-a"));
        assert!(registry.pending_cooldown("secret-a").is_none());
    }

    #[tokio::test]
    async fn test_begin_cooldown_is_single_flight() {
        let registry = RateLimitRegistry::new();
        registry.register("secret-a");

        let first = registry.begin_cooldown("secret-a", Duration::from_secs(5));
        let second = registry.begin_cooldown("secret-a", Duration::from_secs(30));

        // The second signal joins the existing cooldown instead of restarting it
        assert!(first.ptr_eq(&second));
        assert!(registry.is_limited("secret-a"));
        assert!(
            registry
                .pending_cooldown("secret-a")
                .is_some_and(|pending| pending.ptr_eq(&first))
        );
    }

    #[tokio::test]
    async fn test_credentials_are_isolated() {
        let registry = RateLimitRegistry::new();
        registry.register("secret-a");
        registry.register("secret-b");

        registry.begin_cooldown("secret-a", Duration::from_secs(5));

        assert!(registry.is_limited("secret-a"));
        assert!(!registry.is_limited("secret-b"));
        assert!(registry.pending_cooldown("secret-b").is_none());
    }

    #[tokio::test]
    async fn test_clear_cooldown_resets_state() {
        let registry = RateLimitRegistry::new();
        let cooldown = registry.begin_cooldown("secret-a", Duration::from_millis(1));

        cooldown.clone().await;
        registry.clear_cooldown("secret-a", &cooldown);

        assert!(!registry.is_limited("secret-a"));
        assert!(registry.pending_cooldown("secret-a").is_none());
    }

    #[tokio::test]
    async fn test_clear_cooldown_ignores_stale_handle() {
        let registry = RateLimitRegistry::new();

        let first = registry.begin_cooldown("secret-a", Duration::from_millis(1));
        first.clone().await;
        registry.clear_cooldown("secret-a", &first);

        // A new limit arrives before the stale handle is cleared again
        let second = registry.begin_cooldown("secret-a", Duration::from_secs(60));
        registry.clear_cooldown("secret-a", &first);

        assert!(registry.is_limited("secret-a"));
        assert!(
            registry
                .pending_cooldown("secret-a")
                .is_some_and(|pending| pending.ptr_eq(&second))
        );
    }
}
