use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::{CoreError, GENERIC_ERROR_MESSAGE};
use crate::models::analysis::{PortfolioAnalysisResponse, PortfolioTrendResponse};
use crate::models::chat::ChatMessage;
use crate::models::market::{
    CompanyInfo, FearGreedIndex, FearGreedPoint, HistoricalRange, StockPriceData,
};
use crate::models::performance::{PerformanceRequestItem, PerformanceResponse};
use crate::models::portfolio::PortfolioData;
use crate::models::settings::{ClientSettings, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::models::trade::{TradeSummary, TradesResponse};
use crate::models::transaction::{
    Transaction, TransactionRequest, TransactionResponse, TransactionType,
};
use crate::models::user::{
    BudgetResponse, BudgetUpdateRequest, LoginRequest, RegisterRequest, User, UserResponse,
};
use super::traits::PortfolioApi;

/// reqwest-backed client for the dashboard REST API.
///
/// - Stateless: session persistence is handled by `UserService`.
/// - No retries and no request de-duplication.
/// - Non-2xx responses become `CoreError::Api` carrying the server's
///   `detail` message when one is present.
pub struct HttpPortfolioApi {
    client: Client,
    base_url: String,
}

impl HttpPortfolioApi {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS)
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::with_timeout(&settings.api_base_url, settings.timeout_secs)
    }

    /// Point the client at another server (used by tests with a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    fn with_timeout(base_url: &str, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "API request");
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    /// Base URL extended with `segments`, each percent-encoded as a single
    /// path segment so user input cannot add path components or a query.
    fn segment_url(&self, segments: &[&str]) -> Result<Url, CoreError> {
        let invalid = || CoreError::Config(format!("Invalid API base URL '{}'", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CoreError> {
        let resp = self.request(Method::GET, path).query(query).send().await;
        Self::decode(path, resp).await
    }

    /// GET a URL whose trailing segments carry user input. `route` names
    /// the endpoint in logs without the user's value.
    async fn get_json_segments<T: DeserializeOwned>(
        &self,
        route: &str,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, CoreError> {
        let url = self.segment_url(segments)?;
        debug!(method = %Method::GET, path = route, "API request");
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .await;
        Self::decode(route, resp).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        query: &[(&str, String)],
    ) -> Result<T, CoreError> {
        let resp = self
            .request(method, path)
            .query(query)
            .json(body)
            .send()
            .await;
        Self::decode(path, resp).await
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        resp: Result<Response, reqwest::Error>,
    ) -> Result<T, CoreError> {
        let resp = resp.map_err(|e| {
            let err = CoreError::from(e);
            warn!(path, error = %err, "API request failed");
            err
        })?;
        let resp = Self::check_status(path, resp).await?;
        resp.json::<T>().await.map_err(|e| {
            warn!(path, error = %e, "Failed to parse API response");
            CoreError::Deserialization(format!("Failed to parse response from {path}: {e}"))
        })
    }

    async fn check_status(path: &str, resp: Response) -> Result<Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = extract_error_message(&body);
        warn!(path, status = status.as_u16(), %message, "API returned an error status");
        Err(CoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn submit_transaction(
        &self,
        path: &str,
        request: TransactionRequest,
    ) -> Result<TransactionResponse, CoreError> {
        self.send_json(Method::POST, path, &request, &[]).await
    }
}

impl Default for HttpPortfolioApi {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"detail": "..."}` (FastAPI), `{"error": "..."}`,
/// `{"message": "..."}`, a bare JSON string, or plain text.
fn extract_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return GENERIC_ERROR_MESSAGE.to_string();
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(s)) if !s.is_empty() => s,
        Ok(serde_json::Value::Object(map)) => ["detail", "error", "message"]
            .iter()
            .find_map(|key| match map.get(*key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_))) => {
                    Some(other.to_string())
                }
                _ => None,
            })
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        Ok(_) => GENERIC_ERROR_MESSAGE.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

// ── Wire-only response types ────────────────────────────────────────

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PortfolioApi for HttpPortfolioApi {
    async fn register(
        &self,
        username: &str,
        password: &str,
        budget: f64,
    ) -> Result<UserResponse, CoreError> {
        let body = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            budget,
        };
        self.send_json(Method::POST, "/users/register", &body, &[]).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<UserResponse, CoreError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send_json(Method::POST, "/users/login", &body, &[]).await
    }

    async fn logout(&self) -> Result<(), CoreError> {
        let path = "/users/logout";
        let resp = self.request(Method::POST, path).send().await?;
        Self::check_status(path, resp).await?;
        Ok(())
    }

    async fn current_user(&self, username: &str) -> Result<User, CoreError> {
        self.get_json("/users/me", &[("username", username.to_string())])
            .await
    }

    async fn view_budget(&self, user_id: i64) -> Result<BudgetResponse, CoreError> {
        self.get_json("/users/budget", &[("user_id", user_id.to_string())])
            .await
    }

    async fn update_budget(
        &self,
        user_id: i64,
        new_budget: f64,
    ) -> Result<BudgetResponse, CoreError> {
        let body = BudgetUpdateRequest { new_budget };
        self.send_json(
            Method::PUT,
            "/users/budget",
            &body,
            &[("user_id", user_id.to_string())],
        )
        .await
    }

    async fn view_portfolio(&self, user_id: i64) -> Result<PortfolioData, CoreError> {
        self.get_json(&format!("/portfolio/{user_id}"), &[]).await
    }

    async fn portfolio_performance(
        &self,
        items: &[PerformanceRequestItem],
    ) -> Result<PerformanceResponse, CoreError> {
        // The endpoint takes the bare array, not a wrapping object.
        self.send_json(Method::POST, "/performance", items, &[]).await
    }

    async fn portfolio_analysis(
        &self,
        user_id: i64,
    ) -> Result<PortfolioAnalysisResponse, CoreError> {
        self.get_json(&format!("/portfolio/analyze/{user_id}"), &[])
            .await
    }

    async fn portfolio_trend(&self, user_id: i64) -> Result<PortfolioTrendResponse, CoreError> {
        self.get_json(&format!("/portfolio/trend/{user_id}"), &[])
            .await
    }

    async fn buy_stock(
        &self,
        user_id: i64,
        ticker: &str,
        quantity: f64,
    ) -> Result<TransactionResponse, CoreError> {
        // Price is set by the server at execution time.
        let request = TransactionRequest {
            user_id,
            ticker: ticker.to_string(),
            quantity,
            transaction_type: TransactionType::Buy,
            price: Some(0.0),
        };
        self.submit_transaction("/transactions/buy", request).await
    }

    async fn sell_stock(
        &self,
        user_id: i64,
        ticker: &str,
        quantity: f64,
    ) -> Result<TransactionResponse, CoreError> {
        let request = TransactionRequest {
            user_id,
            ticker: ticker.to_string(),
            quantity,
            transaction_type: TransactionType::Sell,
            price: None,
        };
        self.submit_transaction("/transactions/sell", request).await
    }

    async fn add_stock(
        &self,
        user_id: i64,
        ticker: &str,
        quantity: f64,
        price: f64,
    ) -> Result<TransactionResponse, CoreError> {
        let request = TransactionRequest {
            user_id,
            ticker: ticker.to_string(),
            quantity,
            transaction_type: TransactionType::Buy,
            price: Some(price),
        };
        self.submit_transaction("/transactions/add", request).await
    }

    async fn remove_stock(
        &self,
        user_id: i64,
        ticker: &str,
        quantity: f64,
        price: f64,
    ) -> Result<TransactionResponse, CoreError> {
        let request = TransactionRequest {
            user_id,
            ticker: ticker.to_string(),
            quantity,
            transaction_type: TransactionType::Sell,
            price: Some(price),
        };
        self.submit_transaction("/transactions/remove", request).await
    }

    async fn transactions(&self, user_id: i64) -> Result<Vec<Transaction>, CoreError> {
        self.get_json(&format!("/transactions/{user_id}"), &[]).await
    }

    async fn company_info(&self, query: &str) -> Result<CompanyInfo, CoreError> {
        self.get_json_segments(
            "/market/company",
            &["market", "company", query.trim()],
            &[],
        )
        .await
    }

    async fn historical_prices(
        &self,
        ticker: &str,
        range: HistoricalRange,
    ) -> Result<Vec<StockPriceData>, CoreError> {
        let ticker = ticker.trim().to_uppercase();
        self.get_json_segments(
            "/market/historical",
            &["market", "historical", ticker.as_str()],
            &[("range", range.as_str().to_string())],
        )
        .await
    }

    async fn fear_greed(&self) -> Result<FearGreedIndex, CoreError> {
        self.get_json("/market/fear-greed", &[]).await
    }

    async fn fear_greed_history(&self) -> Result<Vec<FearGreedPoint>, CoreError> {
        self.get_json("/market/fear-greed/history", &[]).await
    }

    async fn trades(&self, limit: u32, offset: u32) -> Result<TradesResponse, CoreError> {
        self.get_json(
            "/trades",
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    async fn trade_summary(&self) -> Result<TradeSummary, CoreError> {
        self.get_json("/trades/summary", &[]).await
    }

    async fn chat(&self, message: &str) -> Result<ChatMessage, CoreError> {
        let reply: ChatReply = self
            .send_json(Method::POST, "/ai/generate-answer", &ChatRequest { message }, &[])
            .await?;
        Ok(ChatMessage::bot(reply.content))
    }
}
