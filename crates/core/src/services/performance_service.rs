use crate::models::holding::Holding;
use crate::models::performance::{HoldingPerformance, PerformanceRequestItem, PerformanceSummary};

/// Derives display-ready figures from a list of holdings.
///
/// Pure business logic: no I/O, no API calls.
///
/// Missing market prices are handled by two different rules, each tied to
/// the aggregate that uses it:
/// - current value of a holding is `None`, and counts as 0 in totals;
/// - profit/loss of a holding is 0.
///
/// Performance of a holding without a price is `None` ("no data"), never 0%.
pub struct PerformanceService;

impl PerformanceService {
    pub fn new() -> Self {
        Self
    }

    // ── Per holding ─────────────────────────────────────────────────

    /// Percentage gain of the current price over the purchase price.
    ///
    /// `None` when there is no current price, or when the purchase price
    /// is 0 (the ratio is undefined).
    #[must_use]
    pub fn compute_holding_performance(&self, holding: &Holding) -> Option<f64> {
        let current = holding.current_price?;
        if holding.purchase_price == 0.0 {
            return None;
        }
        let pct = (current - holding.purchase_price) / holding.purchase_price * 100.0;
        pct.is_finite().then_some(pct)
    }

    /// current price × quantity, `None` without a current price.
    #[must_use]
    pub fn compute_current_value(&self, holding: &Holding) -> Option<f64> {
        holding.current_price.map(|price| price * holding.quantity)
    }

    /// (current − purchase) × quantity, 0 without a current price.
    #[must_use]
    pub fn compute_profit_loss(&self, holding: &Holding) -> f64 {
        holding
            .current_price
            .map(|price| (price - holding.purchase_price) * holding.quantity)
            .unwrap_or(0.0)
    }

    /// Full breakdown for one holding.
    #[must_use]
    pub fn holding_performance(&self, holding: &Holding) -> HoldingPerformance {
        HoldingPerformance {
            ticker: holding.ticker.clone(),
            investment: holding.quantity * holding.purchase_price,
            current_value: self.compute_current_value(holding),
            profit_loss: self.compute_profit_loss(holding),
            performance: self.compute_holding_performance(holding),
        }
    }

    // ── Aggregates ──────────────────────────────────────────────────

    /// (current − invested) / invested × 100.
    ///
    /// Returns 0.0 when nothing is invested, so the result is always finite.
    #[must_use]
    pub fn compute_roi(&self, total_investment: f64, total_current_value: f64) -> f64 {
        if total_investment == 0.0 {
            return 0.0;
        }
        let roi = (total_current_value - total_investment) / total_investment * 100.0;
        if roi.is_finite() {
            roi
        } else {
            0.0
        }
    }

    /// The holding with the greatest performance. Ties go to the first one
    /// encountered; holdings without performance data are never picked.
    #[must_use]
    pub fn pick_top_performer<'a>(&self, holdings: &'a [Holding]) -> Option<&'a Holding> {
        let mut best: Option<(&Holding, f64)> = None;
        for holding in holdings {
            let Some(perf) = self.performance_of(holding) else {
                continue;
            };
            match best {
                Some((_, best_perf)) if perf <= best_perf => {}
                _ => best = Some((holding, perf)),
            }
        }
        best.map(|(holding, _)| holding)
    }

    /// Sum of quantity × purchase price.
    #[must_use]
    pub fn total_investment(&self, holdings: &[Holding]) -> f64 {
        holdings.iter().map(|h| h.quantity * h.purchase_price).sum()
    }

    /// Portfolio value: server-reported current values where present,
    /// recomputed otherwise, missing ones counted as 0.
    #[must_use]
    pub fn total_portfolio_value(&self, holdings: &[Holding]) -> f64 {
        holdings
            .iter()
            .map(|h| h.effective_current_value().unwrap_or(0.0))
            .sum()
    }

    /// Sum of per-holding profit/loss (missing prices contribute 0).
    #[must_use]
    pub fn total_gain_loss(&self, holdings: &[Holding]) -> f64 {
        holdings.iter().map(|h| self.compute_profit_loss(h)).sum()
    }

    /// Aggregate summary plus per-holding breakdown, in input order.
    #[must_use]
    pub fn summarize(&self, holdings: &[Holding]) -> PerformanceSummary {
        let breakdown: Vec<HoldingPerformance> = holdings
            .iter()
            .map(|h| self.holding_performance(h))
            .collect();

        let total_investment: f64 = breakdown.iter().map(|h| h.investment).sum();
        let total_current_value: f64 = breakdown
            .iter()
            .map(|h| h.current_value.unwrap_or(0.0))
            .sum();
        let total_profit_loss: f64 = breakdown.iter().map(|h| h.profit_loss).sum();

        PerformanceSummary {
            roi: self.compute_roi(total_investment, total_current_value),
            total_investment,
            total_current_value,
            total_profit_loss,
            holdings: breakdown,
        }
    }

    /// Fill in `performance` on every holding.
    #[must_use]
    pub fn annotate_performance(&self, holdings: Vec<Holding>) -> Vec<Holding> {
        holdings
            .into_iter()
            .map(|mut h| {
                h.performance = self.compute_holding_performance(&h);
                h
            })
            .collect()
    }

    /// Request body for the server-side performance endpoint.
    #[must_use]
    pub fn performance_request(&self, holdings: &[Holding]) -> Vec<PerformanceRequestItem> {
        holdings
            .iter()
            .map(|h| PerformanceRequestItem {
                ticker: h.ticker.clone(),
                quantity: h.quantity,
                purchase_price: h.purchase_price,
            })
            .collect()
    }

    fn performance_of(&self, holding: &Holding) -> Option<f64> {
        holding
            .performance
            .filter(|p| p.is_finite())
            .or_else(|| self.compute_holding_performance(holding))
    }
}

impl Default for PerformanceService {
    fn default() -> Self {
        Self::new()
    }
}
