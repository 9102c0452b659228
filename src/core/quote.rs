//! Quote and history models, plus the backend abstraction

use crate::core::feed::FetchError;
use crate::core::usage::UsageCounters;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Snapshot of one tracked instrument from the backend's index list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Display-form symbol, e.g. `"BTC/USD"`.
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    /// 24h change in percent, signed.
    pub percent_change: f64,
    pub exchange: String,
    /// Last trade time in epoch milliseconds.
    pub timestamp: i64,
}

impl Quote {
    pub fn traded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// One daily bar in a historical series.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// ISO date, e.g. `"2026-08-05"`.
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<String>,
}

/// Historical series for one instrument with summary statistics computed
/// upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub symbol: String,
    pub name: String,
    pub history: Vec<HistoryPoint>,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
}

/// Read-only view of the tracker backend's three resources.
///
/// Errors are the tagged [`FetchError`] so callers (the feed synchronizer in
/// particular) never depend on the transport's error representation.
#[async_trait]
pub trait PricingBackend: Send + Sync {
    /// All tracked instruments with current prices.
    async fn quotes(&self) -> Result<Vec<Quote>, FetchError>;

    /// 30-day history for one instrument. `route_symbol` is the dash-form
    /// identifier, e.g. `"BTC-USD"`.
    async fn history(&self, route_symbol: &str) -> Result<History, FetchError>;

    /// Raw usage counters for the upstream API budget.
    async fn limits(&self) -> Result<UsageCounters, FetchError>;
}
