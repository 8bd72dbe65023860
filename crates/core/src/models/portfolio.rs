use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// A user's portfolio as returned by `GET /portfolio/{user_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioData {
    /// One entry per ticker
    #[serde(default)]
    pub portfolio: Vec<Holding>,

    /// Sum of current values, computed by the server
    #[serde(default)]
    pub total_portfolio_value: f64,

    /// Optional history of the total value (for the line chart)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_values: Option<Vec<HistoricalValue>>,
}

impl PortfolioData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.portfolio.is_empty()
    }

    /// Find a holding by ticker (case-insensitive).
    #[must_use]
    pub fn holding(&self, ticker: &str) -> Option<&Holding> {
        self.portfolio.iter().find(|h| h.is_ticker(ticker))
    }

    /// Quantity owned for a ticker, 0 when not held.
    #[must_use]
    pub fn owned_quantity(&self, ticker: &str) -> f64 {
        self.holding(ticker).map(|h| h.quantity).unwrap_or(0.0)
    }
}

impl Default for PortfolioData {
    fn default() -> Self {
        Self {
            portfolio: Vec::new(),
            total_portfolio_value: 0.0,
            historical_values: None,
        }
    }
}

/// A single point of the portfolio value history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalValue {
    pub date: String,
    pub value: f64,
}
