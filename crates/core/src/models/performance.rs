use serde::{Deserialize, Serialize};

/// One entry of the `POST /performance` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRequestItem {
    pub ticker: String,
    pub quantity: f64,
    pub purchase_price: f64,
}

/// Server-computed performance of a single stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPerformance {
    pub ticker: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub current_price: f64,
    pub investment: f64,
    pub current_value: f64,
    pub individual_roi: f64,
}

/// Response of `POST /performance`. Trusted verbatim; never reconciled
/// against the client-side derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResponse {
    pub total_investment: f64,
    pub total_current_value: f64,
    pub roi: f64,
    #[serde(default)]
    pub details: Vec<StockPerformance>,
}

/// Client-derived figures for a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingPerformance {
    pub ticker: String,

    /// quantity × purchase_price
    pub investment: f64,

    /// quantity × current_price; `None` without market data
    pub current_value: Option<f64>,

    /// (current − purchase) × quantity; 0 without market data
    pub profit_loss: f64,

    /// Percentage gain over purchase price; `None` means "no data", never 0%
    pub performance: Option<f64>,
}

/// Client-derived aggregate over a list of holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Sum of quantity × purchase_price
    pub total_investment: f64,

    /// Sum of current values, missing prices counted as 0
    pub total_current_value: f64,

    /// Sum of profit/loss, missing prices counted as 0
    pub total_profit_loss: f64,

    /// (current − invested) / invested × 100; 0 when nothing is invested
    pub roi: f64,

    /// Per-holding breakdown, in input order
    pub holdings: Vec<HoldingPerformance>,
}

impl From<PerformanceResponse> for PerformanceSummary {
    /// Adopt the server's numbers as-is.
    fn from(resp: PerformanceResponse) -> Self {
        let holdings = resp
            .details
            .into_iter()
            .map(|d| HoldingPerformance {
                profit_loss: d.current_value - d.investment,
                performance: Some(d.individual_roi),
                current_value: Some(d.current_value),
                investment: d.investment,
                ticker: d.ticker,
            })
            .collect();
        Self {
            total_profit_loss: resp.total_current_value - resp.total_investment,
            total_investment: resp.total_investment,
            total_current_value: resp.total_current_value,
            roi: resp.roi,
            holdings,
        }
    }
}
