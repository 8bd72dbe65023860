use crate::models::analysis::{PortfolioAnalysisResponse, PortfolioTrendEntry};
use crate::models::chart::{LineSeries, PieSlice};
use crate::models::holding::Holding;
use crate::models::market::StockPriceData;
use crate::models::performance::PerformanceSummary;
use crate::models::portfolio::PortfolioData;
use crate::models::trade::Trade;

/// Turns API data into chart-ready series.
///
/// The core computes all the numbers; the frontend only renders.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Total portfolio value over time. `None` when the server sent no history.
    #[must_use]
    pub fn portfolio_value_line(&self, data: &PortfolioData) -> Option<LineSeries> {
        let history = data.historical_values.as_ref()?;
        let mut series = LineSeries::new("Portfolio Value");
        for point in history {
            series.push(point.date.clone(), point.value);
        }
        Some(series)
    }

    /// One slice per holding, sized by its current value (0 when unknown).
    #[must_use]
    pub fn composition_pie(&self, holdings: &[Holding]) -> Vec<PieSlice> {
        holdings
            .iter()
            .map(|h| PieSlice {
                label: h.ticker.clone(),
                value: h.effective_current_value().unwrap_or(0.0),
            })
            .collect()
    }

    /// Invested capital next to current value.
    #[must_use]
    pub fn investment_vs_current(&self, summary: &PerformanceSummary) -> LineSeries {
        let mut series = LineSeries::new("Portfolio ($)");
        series.push("Total Investment", summary.total_investment);
        series.push("Current Value", summary.total_current_value);
        series
    }

    /// Daily portfolio value from the trend endpoint.
    #[must_use]
    pub fn trend_line(&self, trend: &[PortfolioTrendEntry]) -> LineSeries {
        let mut series = LineSeries::new("Portfolio Value ($)");
        for entry in trend {
            series.push(entry.date.format("%Y-%m-%d").to_string(), entry.portfolio_value);
        }
        series
    }

    /// Closing prices for a ticker.
    #[must_use]
    pub fn price_history_line(&self, ticker: &str, prices: &[StockPriceData]) -> LineSeries {
        let mut series = LineSeries::new(format!("{} Close", ticker.trim().to_uppercase()));
        for day in prices {
            series.push(day.date.clone(), day.close);
        }
        series
    }

    /// Running total of realized profit/loss over the bot's trades,
    /// ordered by timestamp. Trades with unparseable timestamps keep their
    /// relative order after the dated ones.
    #[must_use]
    pub fn trade_profit_line(&self, trades: &[Trade]) -> LineSeries {
        let mut ordered: Vec<&Trade> = trades.iter().collect();
        ordered.sort_by_key(|t| (t.parsed_timestamp().is_none(), t.parsed_timestamp()));

        let mut series = LineSeries::new("Cumulative Profit/Loss ($)");
        let mut cumulative = 0.0;
        for trade in ordered {
            cumulative += trade.profit_loss;
            series.push(trade.timestamp.clone(), cumulative);
        }
        series
    }

    /// Sector distribution as pie slices.
    #[must_use]
    pub fn sector_pie(&self, analysis: &PortfolioAnalysisResponse) -> Vec<PieSlice> {
        analysis
            .sectors
            .iter()
            .map(|s| PieSlice {
                label: s.sector.clone(),
                value: s.percentage,
            })
            .collect()
    }

    /// Portfolio return next to the S&P 500 return, in percent.
    #[must_use]
    pub fn sp500_comparison(&self, analysis: &PortfolioAnalysisResponse) -> LineSeries {
        let cmp = &analysis.sp500_comparison;
        let mut series = LineSeries::new("Performance (%)");
        series.push("Your Portfolio", cmp.portfolio_return);
        series.push("S&P 500", cmp.sp500_return);
        series
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
