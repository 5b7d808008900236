//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key; a missing or empty key makes the request a no-op
/// - `value`: The value to store; `null` or missing removes the key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetRequest {
    /// The cache key
    #[serde(default)]
    pub key: Option<String>,
    /// The value to store
    #[serde(default)]
    pub value: Option<String>,
}

impl SetRequest {
    /// Returns the key if it is present and non-empty.
    pub fn defined_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|key| !key.is_empty())
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.defined_key() {
            Some(key) if key.len() > MAX_KEY_LENGTH => Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )),
            _ => None,
        }
    }
}
