use std::sync::Arc;

use tracing::{info, warn};

use crate::api::traits::PortfolioApi;
use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::transaction::{TransactionResponse, TransactionType};
use crate::models::user::Identity;
use crate::state::refresh::RefreshBroadcaster;
use crate::storage::session::SessionStore;

pub const INVALID_TICKER: &str = "Please enter a valid ticker symbol.";
pub const INVALID_QUANTITY: &str = "Quantity must be at least 1.";
pub const INVALID_PURCHASE_PRICE: &str = "Please enter a valid purchase price.";
pub const INVALID_SELLING_PRICE: &str = "Please enter a valid selling price.";
pub const INSUFFICIENT_QUANTITY: &str = "Insufficient stock quantity to remove.";
pub const INVALID_BUDGET: &str = "Please enter a valid budget.";

/// Portfolio mutations: validate locally, call the API, then tell every
/// listener to re-fetch.
///
/// Validation failures never reach the network. The refresh broadcaster
/// fires exactly once per successful mutation and never on failure.
#[derive(Clone)]
pub struct TradeService {
    api: Arc<dyn PortfolioApi>,
    session: SessionStore,
    refresh: RefreshBroadcaster,
}

impl std::fmt::Debug for TradeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeService")
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

impl TradeService {
    pub fn new(
        api: Arc<dyn PortfolioApi>,
        session: SessionStore,
        refresh: RefreshBroadcaster,
    ) -> Self {
        Self {
            api,
            session,
            refresh,
        }
    }

    // ── Validation ──────────────────────────────────────────────────

    /// Trimmed, upper-cased ticker; rejects blanks.
    pub fn validate_ticker(ticker: &str) -> Result<String, CoreError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(CoreError::Validation(INVALID_TICKER.into()));
        }
        Ok(ticker.to_uppercase())
    }

    pub fn validate_quantity(quantity: f64) -> Result<(), CoreError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(CoreError::Validation(INVALID_QUANTITY.into()));
        }
        Ok(())
    }

    /// A user-entered price must be a positive number. `message` is shown
    /// on failure, as buy and sell forms word it differently.
    pub fn validate_price(price: Option<f64>, message: &str) -> Result<f64, CoreError> {
        match price {
            Some(p) if p.is_finite() && p > 0.0 => Ok(p),
            _ => Err(CoreError::Validation(message.into())),
        }
    }

    /// Selling more than is held (or a ticker not held at all) is refused.
    pub fn validate_owned(
        holdings: &[Holding],
        ticker: &str,
        quantity: f64,
    ) -> Result<(), CoreError> {
        match holdings.iter().find(|h| h.is_ticker(ticker)) {
            Some(holding) if quantity <= holding.quantity => Ok(()),
            _ => Err(CoreError::Validation(INSUFFICIENT_QUANTITY.into())),
        }
    }

    pub fn validate_budget(budget: f64) -> Result<(), CoreError> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(CoreError::Validation(INVALID_BUDGET.into()));
        }
        Ok(())
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Buy at market price.
    pub async fn buy(&self, ticker: &str, quantity: f64) -> Result<TransactionResponse, CoreError> {
        let user = self.require_user()?;
        let ticker = Self::validate_ticker(ticker)?;
        Self::validate_quantity(quantity)?;

        let result = self.api.buy_stock(user.id, &ticker, quantity).await;
        self.finish(TransactionType::Buy, &ticker, quantity, result)
    }

    /// Sell at market price. `holdings` is the portfolio the form was
    /// filled against.
    pub async fn sell(
        &self,
        ticker: &str,
        quantity: f64,
        holdings: &[Holding],
    ) -> Result<TransactionResponse, CoreError> {
        let user = self.require_user()?;
        let ticker = Self::validate_ticker(ticker)?;
        Self::validate_quantity(quantity)?;
        Self::validate_owned(holdings, &ticker, quantity)?;

        let result = self.api.sell_stock(user.id, &ticker, quantity).await;
        self.finish(TransactionType::Sell, &ticker, quantity, result)
    }

    /// Record a purchase at a user-entered price.
    pub async fn add_stock(
        &self,
        ticker: &str,
        quantity: f64,
        price: Option<f64>,
    ) -> Result<TransactionResponse, CoreError> {
        let user = self.require_user()?;
        let ticker = Self::validate_ticker(ticker)?;
        Self::validate_quantity(quantity)?;
        let price = Self::validate_price(price, INVALID_PURCHASE_PRICE)?;

        let result = self.api.add_stock(user.id, &ticker, quantity, price).await;
        self.finish(TransactionType::Buy, &ticker, quantity, result)
    }

    /// Record a sale at a user-entered price.
    pub async fn remove_stock(
        &self,
        ticker: &str,
        quantity: f64,
        price: Option<f64>,
        holdings: &[Holding],
    ) -> Result<TransactionResponse, CoreError> {
        let user = self.require_user()?;
        let ticker = Self::validate_ticker(ticker)?;
        Self::validate_quantity(quantity)?;
        Self::validate_owned(holdings, &ticker, quantity)?;
        let price = Self::validate_price(price, INVALID_SELLING_PRICE)?;

        let result = self
            .api
            .remove_stock(user.id, &ticker, quantity, price)
            .await;
        self.finish(TransactionType::Sell, &ticker, quantity, result)
    }

    /// Replace the budget. Returns the budget the server reports afterwards.
    pub async fn update_budget(&self, new_budget: f64) -> Result<f64, CoreError> {
        let user = self.require_user()?;
        Self::validate_budget(new_budget)?;

        match self.api.update_budget(user.id, new_budget).await {
            Ok(response) => {
                info!(user_id = user.id, "Budget updated");
                self.refresh.trigger_refresh();
                Ok(response.effective_budget())
            }
            Err(e) => {
                warn!(error = %e, "Budget update failed");
                Err(e)
            }
        }
    }

    fn require_user(&self) -> Result<Identity, CoreError> {
        self.session.load()?.ok_or(CoreError::NoSession)
    }

    fn finish(
        &self,
        kind: TransactionType,
        ticker: &str,
        quantity: f64,
        result: Result<TransactionResponse, CoreError>,
    ) -> Result<TransactionResponse, CoreError> {
        match &result {
            Ok(response) => {
                info!(%kind, ticker, quantity, transaction_id = response.transaction_id, "Transaction recorded");
                self.refresh.trigger_refresh();
            }
            Err(e) => warn!(%kind, ticker, error = %e, "Transaction failed"),
        }
        result
    }
}
