use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::transaction::parse_timestamp;

/// A trade executed by the automated trading bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub timestamp: String,
    pub action: String,
    pub ticker: String,
    pub price: f64,
    pub quantity: f64,
    #[serde(default)]
    pub profit_loss: f64,
    /// Bot budget remaining after this trade
    #[serde(default)]
    pub budget: f64,
}

impl Trade {
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

/// One page of `GET /trades`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradesResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub trades: Vec<Trade>,
}

/// Aggregate statistics from `GET /trades/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub total_trades: u64,
    pub total_realized_profit: f64,
    pub budget_used: f64,
    pub last_24h_profit: f64,
}

/// Zero-based page request for the trade table.
///
/// Built through [`TradePage::new`], which keeps the page size at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradePage {
    page: u32,
    page_size: u32,
}

impl TradePage {
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn offset(&self) -> u32 {
        self.page.saturating_mul(self.page_size)
    }

    /// Number of pages needed to show `total` trades.
    #[must_use]
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size))
    }
}

impl Default for TradePage {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_PAGE_SIZE)
    }
}
