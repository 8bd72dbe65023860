use std::sync::Arc;

use tracing::debug;

use crate::errors::CoreError;
use crate::models::user::Identity;
use super::memory::MemoryStore;
use super::traits::KeyValueStore;

/// Storage key holding the logged-in username.
pub const USERNAME_KEY: &str = "username";

/// Storage key holding the numeric user id, as a decimal string.
pub const USER_ID_KEY: &str = "user_id";

/// Explicit session handle injected into whatever needs the current identity.
///
/// A session exists purely by the presence of a persisted user id: there is
/// no token and no expiry. Clones share the same underlying store.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// A session kept only in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Read the persisted identity.
    ///
    /// The user id alone establishes the session: `None` when it is absent,
    /// `InvalidSession` when it is not a number. A missing username reads
    /// as empty.
    pub fn load(&self) -> Result<Option<Identity>, CoreError> {
        let Some(raw_id) = self.store.get(USER_ID_KEY)? else {
            return Ok(None);
        };
        let id = raw_id.trim().parse::<i64>().map_err(|_| {
            CoreError::InvalidSession(format!("stored user id '{raw_id}' is not a number"))
        })?;
        let username = self.store.get(USERNAME_KEY)?.unwrap_or_default();
        Ok(Some(Identity::new(id, username)))
    }

    /// The persisted username alone, if any.
    pub fn username(&self) -> Result<Option<String>, CoreError> {
        Ok(self
            .store
            .get(USERNAME_KEY)?
            .filter(|name| !name.is_empty()))
    }

    /// Whether [`load`](Self::load) yields an identity, i.e. a numeric
    /// user id is persisted. Every session check in the crate uses this.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }

    pub fn save(&self, identity: &Identity) -> Result<(), CoreError> {
        debug!(user_id = identity.id, "Persisting session");
        self.store.set(USERNAME_KEY, &identity.username)?;
        self.store.set(USER_ID_KEY, &identity.id.to_string())
    }

    /// Remove both session fields.
    pub fn clear(&self) -> Result<(), CoreError> {
        debug!("Clearing session");
        self.store.remove(USERNAME_KEY)?;
        self.store.remove(USER_ID_KEY)
    }
}
