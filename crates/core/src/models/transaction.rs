use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Direction of a stock transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Buy => write!(f, "buy"),
            TransactionType::Sell => write!(f, "sell"),
        }
    }
}

/// Body of `POST /transactions/{buy,sell,add,remove}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRequest {
    pub user_id: i64,
    pub ticker: String,
    pub quantity: f64,
    pub transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    #[serde(default)]
    pub transaction_id: i64,
    #[serde(default)]
    pub status: String,
}

/// An immutable record of a past buy or sell, created by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    pub ticker: String,
    pub transaction_type: TransactionType,
    pub quantity: f64,
    pub price: f64,
    pub total_cost: f64,
    /// ISO-8601 timestamp, kept as sent by the server
    pub timestamp: String,
}

impl Transaction {
    /// Parse `timestamp` as RFC 3339 or as a naive ISO-8601 date-time.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

/// Parse a server timestamp, accepting both offset and naive ISO-8601 forms.
pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
