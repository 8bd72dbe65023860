use serde::{Deserialize, Serialize};

/// A single ticker position in a user's portfolio.
///
/// `total_cost` and `current_value` are only present when the server
/// supplied them; the client trusts those numbers verbatim and otherwise
/// recomputes from quantity and prices. One holding per ticker: the
/// portfolio does not model multiple lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Server-side row id, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Exchange symbol, uppercased (e.g., "AAPL")
    pub ticker: String,

    /// Number of shares held (numeric, not validated as integral)
    pub quantity: f64,

    /// Price per share paid at buy time
    pub purchase_price: f64,

    /// quantity × purchase_price, as reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,

    /// Latest market price, absent when market data is unavailable
    #[serde(default)]
    pub current_price: Option<f64>,

    /// quantity × current_price, as reported by the server
    #[serde(default)]
    pub current_value: Option<f64>,

    /// Percentage gain over the purchase price, filled in client-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, quantity: f64, purchase_price: f64) -> Self {
        Self {
            id: None,
            ticker: ticker.into().trim().to_uppercase(),
            quantity,
            purchase_price,
            total_cost: None,
            current_price: None,
            current_value: None,
            performance: None,
            last_updated: None,
        }
    }

    /// Attach a market price.
    #[must_use]
    pub fn with_current_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    /// Server-reported total cost, or quantity × purchase price.
    #[must_use]
    pub fn effective_total_cost(&self) -> f64 {
        self.total_cost
            .unwrap_or(self.quantity * self.purchase_price)
    }

    /// Server-reported current value, or quantity × current price.
    /// `None` when neither is known.
    #[must_use]
    pub fn effective_current_value(&self) -> Option<f64> {
        self.current_value
            .or_else(|| self.current_price.map(|p| p * self.quantity))
    }

    /// Case-insensitive ticker comparison.
    #[must_use]
    pub fn is_ticker(&self, ticker: &str) -> bool {
        self.ticker.eq_ignore_ascii_case(ticker.trim())
    }
}
