use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::feed::{FetchError, FetchErrorKind};
use crate::core::quote::{History, PricingBackend, Quote};
use crate::core::usage::UsageCounters;

/// Upstream requests time out after this long.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-backed client for the tracker backend.
///
/// Endpoints:
/// - `GET /indices` - list of tracked instruments
/// - `GET /indices/{symbol}/history` - 30-day history (route-form symbol)
/// - `GET /meta/limits` - API usage counters
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cryptick/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(HttpBackend {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Requesting {}", url);

        let response = self.client.get(&url).send().await.map_err(FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FetchErrorKind::Status(status.as_u16()),
                format!("HTTP error: {status} for {url}"),
            ));
        }

        let text = response.text().await.map_err(FetchError::from)?;
        serde_json::from_str(&text).map_err(|e| {
            FetchError::new(
                FetchErrorKind::Decode,
                format!("Failed to parse response from {url}: {e}"),
            )
        })
    }

    /// True when the backend answers the limits probe. Useful for a
    /// connection indicator before any feed has published.
    pub async fn health(&self) -> bool {
        self.get_json::<UsageCounters>("/meta/limits").await.is_ok()
    }
}

#[async_trait]
impl PricingBackend for HttpBackend {
    #[instrument(name = "QuotesFetch", skip(self))]
    async fn quotes(&self) -> Result<Vec<Quote>, FetchError> {
        self.get_json("/indices").await
    }

    #[instrument(name = "HistoryFetch", skip(self), fields(symbol = %route_symbol))]
    async fn history(&self, route_symbol: &str) -> Result<History, FetchError> {
        self.get_json(&format!("/indices/{route_symbol}/history")).await
    }

    #[instrument(name = "LimitsFetch", skip(self))]
    async fn limits(&self) -> Result<UsageCounters, FetchError> {
        self.get_json("/meta/limits").await
    }
}
