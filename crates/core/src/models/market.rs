use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Company profile and key ratios from `GET /market/company/{query}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub fifty_two_week_high: Option<f64>,
    #[serde(default)]
    pub fifty_two_week_low: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub price_to_book: Option<f64>,
}

/// One OHLCV bar of `GET /market/historical/{ticker}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPriceData {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Look-back window for historical prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoricalRange {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1wk")]
    OneWeek,
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl HistoricalRange {
    pub const ALL: [HistoricalRange; 9] = [
        HistoricalRange::OneDay,
        HistoricalRange::FiveDays,
        HistoricalRange::OneWeek,
        HistoricalRange::OneMonth,
        HistoricalRange::ThreeMonths,
        HistoricalRange::SixMonths,
        HistoricalRange::OneYear,
        HistoricalRange::FiveYears,
        HistoricalRange::Max,
    ];

    /// Value of the `range` query parameter.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoricalRange::OneDay => "1d",
            HistoricalRange::FiveDays => "5d",
            HistoricalRange::OneWeek => "1wk",
            HistoricalRange::OneMonth => "1mo",
            HistoricalRange::ThreeMonths => "3mo",
            HistoricalRange::SixMonths => "6mo",
            HistoricalRange::OneYear => "1y",
            HistoricalRange::FiveYears => "5y",
            HistoricalRange::Max => "max",
        }
    }

    /// Short button label (e.g., "1M").
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            HistoricalRange::OneDay => "1D",
            HistoricalRange::FiveDays => "5D",
            HistoricalRange::OneWeek => "1W",
            HistoricalRange::OneMonth => "1M",
            HistoricalRange::ThreeMonths => "3M",
            HistoricalRange::SixMonths => "6M",
            HistoricalRange::OneYear => "1Y",
            HistoricalRange::FiveYears => "5Y",
            HistoricalRange::Max => "Max",
        }
    }
}

impl std::fmt::Display for HistoricalRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoricalRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        HistoricalRange::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| CoreError::Validation(format!("Unknown historical range '{s}'")))
    }
}

/// Current CNN Fear & Greed reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearGreedIndex {
    pub score: f64,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub previous_close: f64,
    #[serde(default)]
    pub previous_1_week: f64,
    #[serde(default)]
    pub previous_1_month: f64,
    #[serde(default)]
    pub previous_1_year: f64,
}

/// One point of the Fear & Greed history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearGreedPoint {
    pub date: String,
    pub score: f64,
    #[serde(default)]
    pub rating: Option<String>,
}
