// ═══════════════════════════════════════════════════════════════════
// HTTP Client Tests — HttpPortfolioApi against a wiremock server
// ═══════════════════════════════════════════════════════════════════

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stock_dashboard_core::api::http::HttpPortfolioApi;
use stock_dashboard_core::api::traits::PortfolioApi;
use stock_dashboard_core::errors::{CoreError, GENERIC_ERROR_MESSAGE};
use stock_dashboard_core::models::chat::ChatSender;
use stock_dashboard_core::models::market::HistoricalRange;
use stock_dashboard_core::models::performance::PerformanceRequestItem;

async fn setup() -> (MockServer, HttpPortfolioApi) {
    let server = MockServer::start().await;
    let api = HttpPortfolioApi::new().with_base_url(server.uri());
    (server, api)
}

fn json_response(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

// ── Users ───────────────────────────────────────────────────────────

mod users {
    use super::*;

    #[tokio::test]
    async fn login_posts_credentials() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .and(body_json(json!({"username": "alice", "password": "pw"})))
            .respond_with(json_response(json!({"user_id": 7, "username": "alice"})))
            .expect(1)
            .mount(&server)
            .await;

        let resp = api.login("alice", "pw").await.unwrap();
        assert_eq!(resp.user_id, 7);
        assert_eq!(resp.username, "alice");
    }

    #[tokio::test]
    async fn register_sends_budget() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/users/register"))
            .and(body_json(json!({"username": "bob", "password": "pw", "budget": 1000.0})))
            .respond_with(json_response(json!({"user_id": 9, "username": "bob"})))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(api.register("bob", "pw", 1000.0).await.unwrap().user_id, 9);
    }

    #[tokio::test]
    async fn current_user_queries_by_username() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(query_param("username", "alice"))
            .respond_with(json_response(json!({
                "id": 7, "username": "alice", "budget": 250.0, "portfolio": []
            })))
            .mount(&server)
            .await;

        let user = api.current_user("alice").await.unwrap();
        assert!(user.is_valid());
        assert_eq!(user.budget, Some(250.0));
    }

    #[tokio::test]
    async fn budget_uses_user_id_query() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/users/budget"))
            .and(query_param("user_id", "7"))
            .respond_with(json_response(json!({"budget": 300.0})))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/users/budget"))
            .and(query_param("user_id", "7"))
            .and(body_json(json!({"new_budget": 500.0})))
            .respond_with(json_response(json!({"budget": 300.0, "new_budget": 500.0})))
            .mount(&server)
            .await;

        assert_eq!(api.view_budget(7).await.unwrap().effective_budget(), 300.0);
        assert_eq!(api.update_budget(7, 500.0).await.unwrap().effective_budget(), 500.0);
    }

    #[tokio::test]
    async fn logout_accepts_empty_body() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/users/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        api.logout().await.unwrap();
    }
}

// ── Error mapping ───────────────────────────────────────────────────

mod errors {
    use super::*;

    #[tokio::test]
    async fn detail_field_becomes_message() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let err = api.login("alice", "wrong").await.unwrap_err();
        assert_eq!(
            err,
            CoreError::Api {
                status: 401,
                message: "Invalid credentials".into()
            }
        );
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn plain_text_body_becomes_message() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/portfolio/1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let err = api.view_portfolio(1).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Api { status: 503, ref message } if message == "Service Unavailable"
        ));
    }

    #[tokio::test]
    async fn empty_error_body_uses_generic_message() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/portfolio/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = api.view_portfolio(1).await.unwrap_err();
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn malformed_success_body_is_deserialization_error() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/portfolio/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = api.view_portfolio(1).await.unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Port 9 (discard) is closed on test machines.
        let api = HttpPortfolioApi::new().with_base_url("http://127.0.0.1:9");
        let err = api.fear_greed().await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
    }
}

// ── Portfolio & transactions ────────────────────────────────────────

mod portfolio {
    use super::*;

    #[tokio::test]
    async fn view_portfolio_by_id() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/portfolio/42"))
            .respond_with(json_response(json!({
                "portfolio": [
                    {"ticker": "AAPL", "quantity": 10, "purchase_price": 100, "current_price": 150},
                    {"ticker": "XYZ", "quantity": 1, "purchase_price": 5, "current_price": null}
                ],
                "total_portfolio_value": 1500
            })))
            .mount(&server)
            .await;

        let data = api.view_portfolio(42).await.unwrap();
        assert_eq!(data.portfolio.len(), 2);
        assert!(data.portfolio[1].current_price.is_none());
        assert!(data.historical_values.is_none());
    }

    #[tokio::test]
    async fn performance_posts_bare_array() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/performance"))
            .and(body_json(json!([
                {"ticker": "AAPL", "quantity": 10.0, "purchase_price": 100.0}
            ])))
            .respond_with(json_response(json!({
                "total_investment": 1000, "total_current_value": 1500, "roi": 50, "details": []
            })))
            .mount(&server)
            .await;

        let items = [PerformanceRequestItem {
            ticker: "AAPL".into(),
            quantity: 10.0,
            purchase_price: 100.0,
        }];
        assert_eq!(api.portfolio_performance(&items).await.unwrap().roi, 50.0);
    }

    #[tokio::test]
    async fn buy_sends_zero_price() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/transactions/buy"))
            .and(body_json(json!({
                "user_id": 3, "ticker": "AAPL", "quantity": 2.0,
                "transaction_type": "buy", "price": 0.0
            })))
            .respond_with(json_response(json!({"transaction_id": 11, "status": "completed"})))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(api.buy_stock(3, "AAPL", 2.0).await.unwrap().transaction_id, 11);
    }

    #[tokio::test]
    async fn sell_omits_price() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/transactions/sell"))
            .and(body_json(json!({
                "user_id": 3, "ticker": "AAPL", "quantity": 1.0, "transaction_type": "sell"
            })))
            .respond_with(json_response(json!({"transaction_id": 12, "status": "completed"})))
            .expect(1)
            .mount(&server)
            .await;

        api.sell_stock(3, "AAPL", 1.0).await.unwrap();
    }

    #[tokio::test]
    async fn add_and_remove_send_entered_price() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/transactions/add"))
            .and(body_json(json!({
                "user_id": 3, "ticker": "MSFT", "quantity": 4.0,
                "transaction_type": "buy", "price": 310.5
            })))
            .respond_with(json_response(json!({"transaction_id": 1, "status": "ok"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transactions/remove"))
            .and(body_json(json!({
                "user_id": 3, "ticker": "MSFT", "quantity": 1.0,
                "transaction_type": "sell", "price": 320.0
            })))
            .respond_with(json_response(json!({"transaction_id": 2, "status": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        api.add_stock(3, "MSFT", 4.0, 310.5).await.unwrap();
        api.remove_stock(3, "MSFT", 1.0, 320.0).await.unwrap();
    }

    #[tokio::test]
    async fn transactions_list() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/transactions/3"))
            .respond_with(json_response(json!([
                {"id": 1, "user_id": 3, "ticker": "AAPL", "transaction_type": "buy",
                 "quantity": 2, "price": 100, "total_cost": 200, "timestamp": "2024-01-02T10:00:00"}
            ])))
            .mount(&server)
            .await;

        let list = api.transactions(3).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].total_cost, 200.0);
    }
}

// ── Market data, bot and assistant ──────────────────────────────────

mod market {
    use super::*;

    #[tokio::test]
    async fn historical_uses_range_query_and_uppercase_ticker() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/market/historical/AAPL"))
            .and(query_param("range", "6mo"))
            .respond_with(json_response(json!([
                {"date": "2024-01-02", "open": 1, "high": 2, "low": 0.5, "close": 1.5, "volume": 100}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let bars = api
            .historical_prices("aapl", HistoricalRange::SixMonths)
            .await
            .unwrap();
        assert_eq!(bars[0].close, 1.5);
    }

    #[tokio::test]
    async fn company_query_is_one_encoded_segment() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/market/company/a%3Fb%23c%2Fd"))
            .respond_with(json_response(json!({"name": "Odd Co", "ticker": "ODD"})))
            .expect(1)
            .mount(&server)
            .await;

        let info = api.company_info(" a?b#c/d ").await.unwrap();
        assert_eq!(info.ticker, "ODD");
    }

    #[tokio::test]
    async fn segments_keep_base_path() {
        let server = MockServer::start().await;
        let api = HttpPortfolioApi::new().with_base_url(format!("{}/api/", server.uri()));
        assert_eq!(api.base_url(), format!("{}/api", server.uri()));

        Mock::given(method("GET"))
            .and(path("/api/market/company/BRK%2FB"))
            .respond_with(json_response(json!({"name": "Berkshire", "ticker": "BRK.B"})))
            .expect(1)
            .mount(&server)
            .await;

        let info = api.company_info("BRK/B").await.unwrap();
        assert_eq!(info.name, "Berkshire");
    }

    #[tokio::test]
    async fn fear_greed_and_history() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/market/fear-greed"))
            .respond_with(json_response(json!({
                "score": 62.5, "rating": "greed", "previous_close": 60.0
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/market/fear-greed/history"))
            .respond_with(json_response(json!([
                {"date": "2024-01-01", "score": 40.0, "rating": "fear"}
            ])))
            .mount(&server)
            .await;

        let index = api.fear_greed().await.unwrap();
        assert_eq!(index.rating.as_deref(), Some("greed"));
        assert_eq!(index.previous_1_year, 0.0);
        assert_eq!(api.fear_greed_history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn trades_paginate_with_limit_and_offset() {
        let (server, api) = setup().await;
        Mock::given(method("GET"))
            .and(path("/trades"))
            .and(query_param("limit", "10"))
            .and(query_param("offset", "20"))
            .respond_with(json_response(json!({"total": 25, "trades": []})))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(api.trades(10, 20).await.unwrap().total, 25);
    }

    #[tokio::test]
    async fn chat_returns_bot_message() {
        let (server, api) = setup().await;
        Mock::given(method("POST"))
            .and(path("/ai/generate-answer"))
            .and(body_json(json!({"message": "What is an ETF?"})))
            .respond_with(json_response(json!({"content": "A basket of securities."})))
            .mount(&server)
            .await;

        let reply = api.chat("What is an ETF?").await.unwrap();
        assert_eq!(reply.sender, ChatSender::Bot);
        assert_eq!(reply.content, "A basket of securities.");
    }
}
