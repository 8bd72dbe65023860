use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::traits::PortfolioApi;
use crate::errors::CoreError;
use crate::models::user::{Identity, User};
use crate::storage::session::SessionStore;

/// Outcome of resolving the logged-in user.
///
/// "No user" is a normal state, not an error: `error` is only set when the
/// profile lookup itself failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentUser {
    pub user: Option<User>,
    pub error: Option<String>,
}

impl CurrentUser {
    fn anonymous() -> Self {
        Self::default()
    }

    fn failed(message: String) -> Self {
        Self {
            user: None,
            error: Some(message),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Authentication and profile resolution on top of the session store.
#[derive(Clone)]
pub struct UserService {
    api: Arc<dyn PortfolioApi>,
    session: SessionStore,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(api: Arc<dyn PortfolioApi>, session: SessionStore) -> Self {
        Self { api, session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The persisted identity, if any.
    pub fn identity(&self) -> Result<Option<Identity>, CoreError> {
        self.session.load()
    }

    /// Look up the full profile of the persisted user.
    ///
    /// Issues exactly one request when a username is stored and none
    /// otherwise. A profile missing its id, username, budget or holdings is
    /// treated as "no user". Never fails: lookup errors land in `error`.
    pub async fn resolve(&self) -> CurrentUser {
        let username = match self.session.username() {
            Ok(Some(username)) => username,
            Ok(None) => {
                debug!("No username in session");
                return CurrentUser::anonymous();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read session");
                return CurrentUser::failed(e.user_message());
            }
        };

        match self.api.current_user(&username).await {
            Ok(user) if user.is_valid() => CurrentUser {
                user: Some(user),
                error: None,
            },
            Ok(_) => {
                warn!("Incomplete user profile; treating as logged out");
                CurrentUser::anonymous()
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch user");
                CurrentUser::failed(e.user_message())
            }
        }
    }

    /// Create an account and persist the new session.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        budget: f64,
    ) -> Result<Identity, CoreError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() || !budget.is_finite() {
            return Err(CoreError::Validation("All fields are required.".into()));
        }
        if budget < 0.0 {
            return Err(CoreError::Validation("Please enter a valid budget.".into()));
        }

        let response = self.api.register(username, password, budget).await?;
        let identity = Identity::new(response.user_id, username);
        self.session.save(&identity)?;
        info!(user_id = identity.id, "Registered");
        Ok(identity)
    }

    /// Log in and persist the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, CoreError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(CoreError::Validation(
                "Username and password are required.".into(),
            ));
        }

        let response = self.api.login(username, password).await?;
        let name = if response.username.is_empty() {
            username.to_string()
        } else {
            response.username
        };
        let identity = Identity::new(response.user_id, name);
        self.session.save(&identity)?;
        info!(user_id = identity.id, "Logged in");
        Ok(identity)
    }

    /// Log out. The local session is cleared whatever the server answers;
    /// a server failure is still reported afterwards.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let remote = self.api.logout().await;
        self.session.clear()?;
        if let Err(e) = &remote {
            warn!(error = %e, "Logout request failed; session cleared anyway");
        }
        remote
    }
}
