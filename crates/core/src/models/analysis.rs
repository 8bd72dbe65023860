use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Response of `GET /portfolio/analyze/{user_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysisResponse {
    #[serde(default)]
    pub weights: Vec<PortfolioWeight>,
    #[serde(default)]
    pub sectors: Vec<SectorDistribution>,
    pub sp500_comparison: Sp500Comparison,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWeight {
    pub ticker: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorDistribution {
    pub sector: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sp500Comparison {
    pub portfolio_return: f64,
    pub sp500_return: f64,
}

impl Sp500Comparison {
    /// Percentage points by which the portfolio beat (or trailed) the S&P 500.
    #[must_use]
    pub fn excess_return(&self) -> f64 {
        self.portfolio_return - self.sp500_return
    }
}

/// One day of the portfolio value trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTrendEntry {
    pub date: NaiveDate,
    pub portfolio_value: f64,
    #[serde(default)]
    pub daily_return: Option<f64>,
}

/// Response of `GET /portfolio/trend/{user_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTrendResponse {
    #[serde(default)]
    pub message: String,
    pub user_id: i64,
    #[serde(default)]
    pub trend: Vec<PortfolioTrendEntry>,
}
