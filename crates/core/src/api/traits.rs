use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::analysis::{PortfolioAnalysisResponse, PortfolioTrendResponse};
use crate::models::chat::ChatMessage;
use crate::models::market::{
    CompanyInfo, FearGreedIndex, FearGreedPoint, HistoricalRange, StockPriceData,
};
use crate::models::performance::{PerformanceRequestItem, PerformanceResponse};
use crate::models::portfolio::PortfolioData;
use crate::models::trade::{TradeSummary, TradesResponse};
use crate::models::transaction::{Transaction, TransactionResponse};
use crate::models::user::{BudgetResponse, User, UserResponse};

/// The remote dashboard API, one method per endpoint.
///
/// The HTTP implementation talks to the real backend; tests and offline
/// consumers substitute their own. Every call reports failure through
/// `CoreError`; wrap with `ApiResponse::from` where the flat envelope is wanted.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PortfolioApi: Send + Sync {
    // ── Users ───────────────────────────────────────────────────────

    async fn register(
        &self,
        username: &str,
        password: &str,
        budget: f64,
    ) -> Result<UserResponse, CoreError>;

    async fn login(&self, username: &str, password: &str) -> Result<UserResponse, CoreError>;

    async fn logout(&self) -> Result<(), CoreError>;

    /// Full profile looked up by username.
    async fn current_user(&self, username: &str) -> Result<User, CoreError>;

    async fn view_budget(&self, user_id: i64) -> Result<BudgetResponse, CoreError>;

    async fn update_budget(&self, user_id: i64, new_budget: f64)
        -> Result<BudgetResponse, CoreError>;

    // ── Portfolio ───────────────────────────────────────────────────

    async fn view_portfolio(&self, user_id: i64) -> Result<PortfolioData, CoreError>;

    async fn portfolio_performance(
        &self,
        items: &[PerformanceRequestItem],
    ) -> Result<PerformanceResponse, CoreError>;

    async fn portfolio_analysis(&self, user_id: i64)
        -> Result<PortfolioAnalysisResponse, CoreError>;

    async fn portfolio_trend(&self, user_id: i64) -> Result<PortfolioTrendResponse, CoreError>;

    // ── Transactions ────────────────────────────────────────────────

    /// Buy at the server's market price.
    async fn buy_stock(
        &self,
        user_id: i64,
        ticker: &str,
        quantity: f64,
    ) -> Result<TransactionResponse, CoreError>;

    /// Sell at the server's market price.
    async fn sell_stock(
        &self,
        user_id: i64,
        ticker: &str,
        quantity: f64,
    ) -> Result<TransactionResponse, CoreError>;

    /// Record a purchase at a user-entered price.
    async fn add_stock(
        &self,
        user_id: i64,
        ticker: &str,
        quantity: f64,
        price: f64,
    ) -> Result<TransactionResponse, CoreError>;

    /// Record a sale at a user-entered price.
    async fn remove_stock(
        &self,
        user_id: i64,
        ticker: &str,
        quantity: f64,
        price: f64,
    ) -> Result<TransactionResponse, CoreError>;

    async fn transactions(&self, user_id: i64) -> Result<Vec<Transaction>, CoreError>;

    // ── Market data ─────────────────────────────────────────────────

    async fn company_info(&self, query: &str) -> Result<CompanyInfo, CoreError>;

    async fn historical_prices(
        &self,
        ticker: &str,
        range: HistoricalRange,
    ) -> Result<Vec<StockPriceData>, CoreError>;

    async fn fear_greed(&self) -> Result<FearGreedIndex, CoreError>;

    async fn fear_greed_history(&self) -> Result<Vec<FearGreedPoint>, CoreError>;

    // ── Trading bot ─────────────────────────────────────────────────

    async fn trades(&self, limit: u32, offset: u32) -> Result<TradesResponse, CoreError>;

    async fn trade_summary(&self) -> Result<TradeSummary, CoreError>;

    // ── Assistant ───────────────────────────────────────────────────

    /// Send a chat prompt; returns the bot's reply.
    async fn chat(&self, message: &str) -> Result<ChatMessage, CoreError>;
}
