#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use stock_dashboard_core::api::traits::PortfolioApi;
use stock_dashboard_core::errors::CoreError;
use stock_dashboard_core::models::analysis::{
    PortfolioAnalysisResponse, PortfolioTrendEntry, PortfolioTrendResponse, Sp500Comparison,
};
use stock_dashboard_core::models::chat::ChatMessage;
use stock_dashboard_core::models::holding::Holding;
use stock_dashboard_core::models::market::{
    CompanyInfo, FearGreedIndex, FearGreedPoint, HistoricalRange, StockPriceData,
};
use stock_dashboard_core::models::performance::{PerformanceRequestItem, PerformanceResponse};
use stock_dashboard_core::models::portfolio::PortfolioData;
use stock_dashboard_core::models::trade::{TradeSummary, TradesResponse};
use stock_dashboard_core::models::transaction::{Transaction, TransactionResponse};
use stock_dashboard_core::models::user::{BudgetResponse, User, UserResponse};
use stock_dashboard_core::storage::memory::MemoryStore;
use stock_dashboard_core::storage::session::SessionStore;
use stock_dashboard_core::storage::traits::KeyValueStore;

/// In-process stand-in for the REST API.
///
/// Records every call by name. When `fail_with` is set, every call fails
/// with that error after being recorded.
pub struct MockApi {
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<CoreError>>,
    user: Mutex<User>,
    portfolio: Mutex<PortfolioData>,
    budget: Mutex<f64>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            user: Mutex::new(valid_user(7, "alice")),
            portfolio: Mutex::new(PortfolioData::default()),
            budget: Mutex::new(1000.0),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn fail_with(&self, err: CoreError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn set_user(&self, user: User) {
        *self.user.lock().unwrap() = user;
    }

    pub fn set_holdings(&self, holdings: Vec<Holding>) {
        self.portfolio.lock().unwrap().portfolio = holdings;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    fn record(&self, name: &str) -> Result<(), CoreError> {
        self.calls.lock().unwrap().push(name.to_string());
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn tx(&self, name: &str) -> Result<TransactionResponse, CoreError> {
        self.record(name)?;
        Ok(TransactionResponse {
            transaction_id: self.calls.lock().unwrap().len() as i64,
            status: "completed".into(),
        })
    }
}

pub fn valid_user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.into(),
        email: None,
        budget: Some(1000.0),
        portfolio_value: None,
        portfolio: Some(Vec::new()),
        created_at: None,
        updated_at: None,
    }
}

pub fn memory_session() -> (Arc<MemoryStore>, SessionStore) {
    let store = Arc::new(MemoryStore::new());
    let session = SessionStore::new(store.clone() as Arc<dyn KeyValueStore>);
    (store, session)
}

#[async_trait]
impl PortfolioApi for MockApi {
    async fn register(
        &self,
        username: &str,
        _password: &str,
        _budget: f64,
    ) -> Result<UserResponse, CoreError> {
        self.record("register")?;
        Ok(UserResponse {
            user_id: 21,
            username: username.into(),
        })
    }

    async fn login(&self, username: &str, _password: &str) -> Result<UserResponse, CoreError> {
        self.record("login")?;
        let user = self.user.lock().unwrap().clone();
        Ok(UserResponse {
            user_id: user.id,
            username: username.into(),
        })
    }

    async fn logout(&self) -> Result<(), CoreError> {
        self.record("logout")
    }

    async fn current_user(&self, _username: &str) -> Result<User, CoreError> {
        self.record("current_user")?;
        Ok(self.user.lock().unwrap().clone())
    }

    async fn view_budget(&self, _user_id: i64) -> Result<BudgetResponse, CoreError> {
        self.record("view_budget")?;
        Ok(BudgetResponse {
            budget: *self.budget.lock().unwrap(),
            new_budget: None,
        })
    }

    async fn update_budget(
        &self,
        _user_id: i64,
        new_budget: f64,
    ) -> Result<BudgetResponse, CoreError> {
        self.record("update_budget")?;
        let old = std::mem::replace(&mut *self.budget.lock().unwrap(), new_budget);
        Ok(BudgetResponse {
            budget: old,
            new_budget: Some(new_budget),
        })
    }

    async fn view_portfolio(&self, _user_id: i64) -> Result<PortfolioData, CoreError> {
        self.record("view_portfolio")?;
        Ok(self.portfolio.lock().unwrap().clone())
    }

    async fn portfolio_performance(
        &self,
        items: &[PerformanceRequestItem],
    ) -> Result<PerformanceResponse, CoreError> {
        self.record("portfolio_performance")?;
        let invested: f64 = items.iter().map(|i| i.quantity * i.purchase_price).sum();
        Ok(PerformanceResponse {
            total_investment: invested,
            total_current_value: invested * 1.1,
            roi: 10.0,
            details: Vec::new(),
        })
    }

    async fn portfolio_analysis(
        &self,
        _user_id: i64,
    ) -> Result<PortfolioAnalysisResponse, CoreError> {
        self.record("portfolio_analysis")?;
        Ok(PortfolioAnalysisResponse {
            weights: Vec::new(),
            sectors: Vec::new(),
            sp500_comparison: Sp500Comparison {
                portfolio_return: 12.0,
                sp500_return: 8.0,
            },
            suggestions: vec!["Diversify".into()],
        })
    }

    async fn portfolio_trend(&self, user_id: i64) -> Result<PortfolioTrendResponse, CoreError> {
        self.record("portfolio_trend")?;
        Ok(PortfolioTrendResponse {
            message: "ok".into(),
            user_id,
            trend: vec![PortfolioTrendEntry {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                portfolio_value: 1000.0,
                daily_return: None,
            }],
        })
    }

    async fn buy_stock(
        &self,
        _user_id: i64,
        _ticker: &str,
        _quantity: f64,
    ) -> Result<TransactionResponse, CoreError> {
        self.tx("buy_stock")
    }

    async fn sell_stock(
        &self,
        _user_id: i64,
        _ticker: &str,
        _quantity: f64,
    ) -> Result<TransactionResponse, CoreError> {
        self.tx("sell_stock")
    }

    async fn add_stock(
        &self,
        _user_id: i64,
        _ticker: &str,
        _quantity: f64,
        _price: f64,
    ) -> Result<TransactionResponse, CoreError> {
        self.tx("add_stock")
    }

    async fn remove_stock(
        &self,
        _user_id: i64,
        _ticker: &str,
        _quantity: f64,
        _price: f64,
    ) -> Result<TransactionResponse, CoreError> {
        self.tx("remove_stock")
    }

    async fn transactions(&self, _user_id: i64) -> Result<Vec<Transaction>, CoreError> {
        self.record("transactions")?;
        Ok(Vec::new())
    }

    async fn company_info(&self, query: &str) -> Result<CompanyInfo, CoreError> {
        self.record("company_info")?;
        Ok(CompanyInfo {
            name: format!("{query} Inc."),
            ticker: query.to_uppercase(),
            industry: String::new(),
            description: String::new(),
            current_price: None,
            market_cap: None,
            pe_ratio: None,
            eps: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            dividend_yield: None,
            price_to_book: None,
        })
    }

    async fn historical_prices(
        &self,
        _ticker: &str,
        _range: HistoricalRange,
    ) -> Result<Vec<StockPriceData>, CoreError> {
        self.record("historical_prices")?;
        Ok(Vec::new())
    }

    async fn fear_greed(&self) -> Result<FearGreedIndex, CoreError> {
        self.record("fear_greed")?;
        Ok(FearGreedIndex {
            score: 50.0,
            rating: Some("neutral".into()),
            timestamp: None,
            previous_close: 49.0,
            previous_1_week: 45.0,
            previous_1_month: 40.0,
            previous_1_year: 60.0,
        })
    }

    async fn fear_greed_history(&self) -> Result<Vec<FearGreedPoint>, CoreError> {
        self.record("fear_greed_history")?;
        Ok(Vec::new())
    }

    async fn trades(&self, _limit: u32, _offset: u32) -> Result<TradesResponse, CoreError> {
        self.record("trades")?;
        Ok(TradesResponse {
            total: 0,
            trades: Vec::new(),
        })
    }

    async fn trade_summary(&self) -> Result<TradeSummary, CoreError> {
        self.record("trade_summary")?;
        Ok(TradeSummary {
            total_trades: 0,
            total_realized_profit: 0.0,
            budget_used: 0.0,
            last_24h_profit: 0.0,
        })
    }

    async fn chat(&self, message: &str) -> Result<ChatMessage, CoreError> {
        self.record("chat")?;
        Ok(ChatMessage::bot(format!("echo: {message}")))
    }
}
