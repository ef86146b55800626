//! Persistent key/value storage seam.
//!
//! The store only persists one value today (the sign-in notification
//! opt-out), but the seam is deliberately generic so the host can back it
//! with whatever durable storage it already owns.

/// Key under which the "prompt for sign-in" flag is persisted.
pub const PROMPT_FOR_SIGN_IN_KEY: &str = "auth.promptForSignIn";

/// Durable key/value storage provided by the host.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Fetches a previously stored value.
    fn fetch(&self, key: &str) -> Option<String>;

    /// Stores a value durably.
    fn store(&self, key: &str, value: &str);
}

/// In-memory key/value store for tests and embedding without a host.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(any(test, feature = "test-support"))]
impl KeyValueStore for InMemoryKeyValueStore {
    fn fetch(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn store(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }
}
