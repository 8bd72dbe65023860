use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// The authenticated user's identity, as persisted in the session store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
}

impl Identity {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Full user profile from `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Absent in malformed responses; a valid profile always has one.
    #[serde(default)]
    pub budget: Option<f64>,

    #[serde(default, rename = "portfolioValue", skip_serializing_if = "Option::is_none")]
    pub portfolio_value: Option<f64>,

    /// Holdings; must be present (even if empty) for the profile to be accepted.
    #[serde(default)]
    pub portfolio: Option<Vec<Holding>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    /// Whether the profile carries everything a protected view relies on:
    /// a numeric id, a username, a budget and a holdings collection.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id > 0
            && !self.username.is_empty()
            && self.budget.is_some()
            && self.portfolio.is_some()
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.username.clone())
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        self.portfolio.as_deref().unwrap_or(&[])
    }
}

/// Response of `POST /users/login` and `POST /users/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: i64,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub budget: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of the budget endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResponse {
    #[serde(default)]
    pub budget: f64,

    /// Present after an update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_budget: Option<f64>,
}

impl BudgetResponse {
    /// The budget after the call: `new_budget` when reported, else `budget`.
    #[must_use]
    pub fn effective_budget(&self) -> f64 {
        self.new_budget.unwrap_or(self.budget)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetUpdateRequest {
    pub new_budget: f64,
}
