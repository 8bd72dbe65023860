use crate::errors::CoreError;

/// String key/value persistence, the browser `localStorage` analogue.
///
/// Implementations must be safe to share: many components read the same
/// keys independently, with no coordination beyond last-writer-wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}
