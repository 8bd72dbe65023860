pub mod api;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

use std::sync::Arc;

use api::http::HttpPortfolioApi;
use api::traits::PortfolioApi;
use models::{
    analysis::{PortfolioAnalysisResponse, PortfolioTrendResponse},
    chat::ChatMessage,
    holding::Holding,
    market::{CompanyInfo, FearGreedIndex, FearGreedPoint, HistoricalRange, StockPriceData},
    performance::PerformanceSummary,
    portfolio::PortfolioData,
    settings::ClientSettings,
    trade::{TradePage, TradeSummary, TradesResponse},
    transaction::{Transaction, TransactionResponse},
    user::Identity,
};
use services::{
    chart_service::ChartService,
    navigation_service::{NavigationService, Route, RouteDecision},
    performance_service::PerformanceService,
    trade_service::TradeService,
    user_service::{CurrentUser, UserService},
};
use state::{fetch::FetchOrchestrator, refresh::RefreshBroadcaster};
use storage::{memory::MemoryStore, session::SessionStore, traits::KeyValueStore};
use tracing::info;

use errors::CoreError;

/// Main entry point for the stock dashboard core library.
///
/// Owns the API client, the session and the process-wide refresh
/// broadcaster, and wires the services together. Every mutation made
/// through it triggers one refresh on success.
#[must_use]
pub struct StockDashboard {
    api: Arc<dyn PortfolioApi>,
    session: SessionStore,
    refresh: RefreshBroadcaster,
    user_service: UserService,
    trade_service: TradeService,
    performance_service: PerformanceService,
    chart_service: ChartService,
    navigation_service: NavigationService,
    site_url: String,
}

impl std::fmt::Debug for StockDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockDashboard")
            .field("authenticated", &self.session.is_authenticated())
            .field("refresh", &self.refresh.current())
            .field("site_url", &self.site_url)
            .finish()
    }
}

impl StockDashboard {
    /// Build around any API implementation and key/value store.
    pub fn new(api: Arc<dyn PortfolioApi>, store: Arc<dyn KeyValueStore>) -> Self {
        let session = SessionStore::new(store);
        let refresh = RefreshBroadcaster::new();
        Self {
            user_service: UserService::new(Arc::clone(&api), session.clone()),
            trade_service: TradeService::new(Arc::clone(&api), session.clone(), refresh.clone()),
            performance_service: PerformanceService::new(),
            chart_service: ChartService::new(),
            navigation_service: NavigationService::new(),
            site_url: models::settings::DEFAULT_SITE_URL.to_string(),
            api,
            session,
            refresh,
        }
    }

    /// HTTP client plus a file-backed session when `session_path` is set,
    /// an in-memory one otherwise.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, CoreError> {
        let settings = settings.clone().validated()?;
        let api: Arc<dyn PortfolioApi> = Arc::new(HttpPortfolioApi::from_settings(&settings));
        let store = Self::session_backend(&settings);
        info!(api = %settings.api_base_url, "Stock dashboard initialized");
        let mut dashboard = Self::new(api, store);
        dashboard.site_url = settings.site_url;
        Ok(dashboard)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn session_backend(settings: &ClientSettings) -> Arc<dyn KeyValueStore> {
        match &settings.session_path {
            Some(path) => Arc::new(storage::file::JsonFileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn session_backend(_settings: &ClientSettings) -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn api(&self) -> &Arc<dyn PortfolioApi> {
        &self.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The broadcaster every mutation fires.
    pub fn refresh_broadcaster(&self) -> &RefreshBroadcaster {
        &self.refresh
    }

    pub fn users(&self) -> &UserService {
        &self.user_service
    }

    pub fn trading(&self) -> &TradeService {
        &self.trade_service
    }

    pub fn performance(&self) -> &PerformanceService {
        &self.performance_service
    }

    pub fn charts(&self) -> &ChartService {
        &self.chart_service
    }

    pub fn navigation(&self) -> &NavigationService {
        &self.navigation_service
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Resolve the logged-in user's profile. Never fails; see [`CurrentUser`].
    pub async fn current_user(&self) -> CurrentUser {
        self.user_service.resolve().await
    }

    /// Log in and persist the session. Fires the refresh broadcaster so
    /// watched views pick up the new user.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, CoreError> {
        let identity = self.user_service.login(username, password).await?;
        self.refresh.trigger_refresh();
        Ok(identity)
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        budget: f64,
    ) -> Result<Identity, CoreError> {
        let identity = self.user_service.register(username, password, budget).await?;
        self.refresh.trigger_refresh();
        Ok(identity)
    }

    /// The session is cleared even when the server call fails, so the
    /// broadcaster fires either way.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let result = self.user_service.logout().await;
        self.refresh.trigger_refresh();
        result
    }

    /// Route decision from the persisted session, as
    /// [`SessionStore::is_authenticated`] defines it. The store is read
    /// synchronously, so the decision is never `ShowLoading`.
    #[must_use]
    pub fn guard_route(&self, route: &Route) -> RouteDecision {
        self.navigation_service
            .guard(route, false, self.session.is_authenticated())
    }

    /// sitemap.xml for the configured site URL.
    pub fn sitemap(&self) -> Result<String, CoreError> {
        self.navigation_service.generate_sitemap(&self.site_url)
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// The user's holdings, each annotated with its performance.
    pub async fn portfolio(&self) -> Result<PortfolioData, CoreError> {
        let user = self.require_user()?;
        fetch_portfolio(self.api.as_ref(), user.id).await
    }

    /// Portfolio totals and per-holding breakdown, derived locally.
    pub async fn performance_summary(&self) -> Result<PerformanceSummary, CoreError> {
        let data = self.portfolio().await?;
        Ok(self.performance_service.summarize(&data.portfolio))
    }

    /// Totals as computed by the server's performance endpoint.
    pub async fn server_performance(&self) -> Result<PerformanceSummary, CoreError> {
        let data = self.portfolio().await?;
        let request = self.performance_service.performance_request(&data.portfolio);
        let response = self.api.portfolio_performance(&request).await?;
        Ok(response.into())
    }

    /// Best-performing holding, `None` when no holding has price data.
    pub async fn top_performer(&self) -> Result<Option<Holding>, CoreError> {
        let data = self.portfolio().await?;
        Ok(self
            .performance_service
            .pick_top_performer(&data.portfolio)
            .cloned())
    }

    pub async fn budget(&self) -> Result<f64, CoreError> {
        let user = self.require_user()?;
        Ok(self.api.view_budget(user.id).await?.effective_budget())
    }

    pub async fn transactions(&self) -> Result<Vec<Transaction>, CoreError> {
        let user = self.require_user()?;
        self.api.transactions(user.id).await
    }

    pub async fn portfolio_analysis(&self) -> Result<PortfolioAnalysisResponse, CoreError> {
        let user = self.require_user()?;
        self.api.portfolio_analysis(user.id).await
    }

    pub async fn portfolio_trend(&self) -> Result<PortfolioTrendResponse, CoreError> {
        let user = self.require_user()?;
        self.api.portfolio_trend(user.id).await
    }

    /// Portfolio state that re-fetches whenever the logged-in user changes
    /// or any mutation fires the refresh broadcaster.
    ///
    /// The session is re-read on every broadcaster tick, and login, register
    /// and logout fire the broadcaster, so the watch follows the session.
    /// Each run also loads the identity itself, so a run never fetches for
    /// a user who has since logged out.
    ///
    /// Must be called inside a tokio runtime. Call
    /// [`FetchOrchestrator::unmount`] when the view goes away.
    pub fn watch_portfolio(&self) -> FetchOrchestrator<PortfolioData, Option<i64>> {
        let api = Arc::clone(&self.api);
        let session = self.session.clone();
        let orchestrator = FetchOrchestrator::new(move |_user_id: Option<i64>| {
            let api = Arc::clone(&api);
            let session = session.clone();
            async move {
                let user = session.load()?.ok_or(CoreError::NoSession)?;
                fetch_portfolio(api.as_ref(), user.id).await
            }
        });
        orchestrator.set_dependencies(session_user_id(&self.session));
        let session = self.session.clone();
        // The follower stops on its own once the orchestrator is unmounted or dropped.
        drop(orchestrator.follow_with(&self.refresh, move || session_user_id(&session)));
        orchestrator
    }

    // ── Mutations ───────────────────────────────────────────────────

    pub async fn buy(&self, ticker: &str, quantity: f64) -> Result<TransactionResponse, CoreError> {
        self.trade_service.buy(ticker, quantity).await
    }

    /// Sell against the freshly fetched portfolio.
    pub async fn sell(&self, ticker: &str, quantity: f64) -> Result<TransactionResponse, CoreError> {
        TradeService::validate_ticker(ticker)?;
        TradeService::validate_quantity(quantity)?;
        let data = self.portfolio().await?;
        self.trade_service.sell(ticker, quantity, &data.portfolio).await
    }

    pub async fn add_stock(
        &self,
        ticker: &str,
        quantity: f64,
        price: Option<f64>,
    ) -> Result<TransactionResponse, CoreError> {
        self.trade_service.add_stock(ticker, quantity, price).await
    }

    /// Remove shares against the freshly fetched portfolio.
    pub async fn remove_stock(
        &self,
        ticker: &str,
        quantity: f64,
        price: Option<f64>,
    ) -> Result<TransactionResponse, CoreError> {
        TradeService::validate_ticker(ticker)?;
        TradeService::validate_quantity(quantity)?;
        let data = self.portfolio().await?;
        self.trade_service
            .remove_stock(ticker, quantity, price, &data.portfolio)
            .await
    }

    pub async fn update_budget(&self, new_budget: f64) -> Result<f64, CoreError> {
        self.trade_service.update_budget(new_budget).await
    }

    // ── Market data ─────────────────────────────────────────────────

    pub async fn search_company(&self, query: &str) -> Result<CompanyInfo, CoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::Validation(
                "Please enter a company name or ticker.".into(),
            ));
        }
        self.api.company_info(query).await
    }

    pub async fn historical_prices(
        &self,
        ticker: &str,
        range: HistoricalRange,
    ) -> Result<Vec<StockPriceData>, CoreError> {
        let ticker = TradeService::validate_ticker(ticker)?;
        self.api.historical_prices(&ticker, range).await
    }

    pub async fn fear_greed(&self) -> Result<FearGreedIndex, CoreError> {
        self.api.fear_greed().await
    }

    pub async fn fear_greed_history(&self) -> Result<Vec<FearGreedPoint>, CoreError> {
        self.api.fear_greed_history().await
    }

    // ── Trading bot ─────────────────────────────────────────────────

    pub async fn trades(&self, page: TradePage) -> Result<TradesResponse, CoreError> {
        self.api.trades(page.limit(), page.offset()).await
    }

    pub async fn trade_summary(&self) -> Result<TradeSummary, CoreError> {
        self.api.trade_summary().await
    }

    // ── Assistant ───────────────────────────────────────────────────

    pub async fn chat(&self, message: &str) -> Result<ChatMessage, CoreError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(CoreError::Validation("Message cannot be empty.".into()));
        }
        self.api.chat(message).await
    }

    fn require_user(&self) -> Result<Identity, CoreError> {
        self.session.load()?.ok_or(CoreError::NoSession)
    }
}

/// Persisted user id, `None` when there is no usable session.
fn session_user_id(session: &SessionStore) -> Option<i64> {
    session.load().ok().flatten().map(|identity| identity.id)
}

/// Fetch a portfolio and fill in each holding's performance.
async fn fetch_portfolio(api: &dyn PortfolioApi, user_id: i64) -> Result<PortfolioData, CoreError> {
    let mut data = api.view_portfolio(user_id).await?;
    data.portfolio = PerformanceService::new().annotate_performance(data.portfolio);
    Ok(data)
}

