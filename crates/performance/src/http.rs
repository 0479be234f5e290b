//! HTTP client for a remote metrics service
//!
//! Endpoints (JSON bodies are the port types as serialized by serde):
//!
//! | Method | Path | Body / response |
//! |--------|------|-----------------|
//! | GET | `v1/realtime/{bidder}?key=..` | `RealTimeMetrics` |
//! | GET | `v1/historical/{bidder}?key=..` | `HistoricalPerformance` |
//! | POST | `v1/outcomes/requests` | `RequestOutcome` |
//! | POST | `v1/outcomes/wins` | `WinOutcome` |
//! | GET | `v1/publishers/{id}/top-bidders?limit=n` | `{"bidders": [..]}` |
//!
//! The `key` query parameter is the `LookupKey` display form and is omitted
//! for bidder-wide reads.

use async_trait::async_trait;
use bidroute_core::{BidderCode, HistoricalPerformance, LookupKey, RealTimeMetrics};
use bidroute_ports::{
    AnchorProvider, HistoricalSource, OutcomeRecorder, PortError, PortResult, RealTimeSource,
    RequestOutcome, WinOutcome,
};
use log::warn;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    pub base_url: String,
    /// Whole-request timeout
    pub timeout_ms: u64,
    pub api_key: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090/".to_string(),
            timeout_ms: 20,
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopBiddersResponse {
    bidders: Vec<BidderCode>,
}

/// Networked implementation of the performance and anchor ports
pub struct HttpPerformanceClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl HttpPerformanceClient {
    pub fn new(config: HttpClientConfig) -> PortResult<Self> {
        let mut base_url =
            Url::parse(&config.base_url).map_err(|e| PortError::Request(e.to_string()))?;
        // Url::join replaces the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PortError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            timeout_ms: config.timeout_ms,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> PortResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PortError::Request(format!("base url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn map_send_error(&self, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout(self.timeout_ms)
        } else if error.is_connect() {
            PortError::Unavailable(error.to_string())
        } else {
            PortError::Request(error.to_string())
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> PortResult<T> {
        let mut request = self.client.get(url.clone());
        if let Some(api_key) = &self.api_key {
            request = request.header("X-Api-Key", api_key);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(PortError::NotFound(url.to_string())),
            status if !status.is_success() => {
                warn!("[PERF] {} returned {}", url, status);
                Err(PortError::Request(format!("{} returned {}", url, status)))
            }
            _ => response
                .json::<T>()
                .await
                .map_err(|e| PortError::Decode(e.to_string())),
        }
    }

    async fn post_json<T: Serialize + Sync>(&self, url: Url, body: &T) -> PortResult<()> {
        let mut request = self.client.post(url.clone()).json(body);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-Api-Key", api_key);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(PortError::Request(format!(
                "{} returned {}",
                url,
                response.status()
            )))
        }
    }

    fn metrics_url(&self, window: &str, bidder_code: &str, key: Option<&LookupKey>) -> PortResult<Url> {
        let mut url = self.endpoint(&["v1", window, bidder_code])?;
        if let Some(key) = key {
            url.query_pairs_mut().append_pair("key", &key.to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl RealTimeSource for HttpPerformanceClient {
    async fn realtime_metrics(
        &self,
        bidder_code: &str,
        key: Option<&LookupKey>,
    ) -> PortResult<RealTimeMetrics> {
        let url = self.metrics_url("realtime", bidder_code, key)?;
        self.get_json(url).await
    }
}

#[async_trait]
impl HistoricalSource for HttpPerformanceClient {
    async fn historical_performance(
        &self,
        bidder_code: &str,
        key: Option<&LookupKey>,
    ) -> PortResult<HistoricalPerformance> {
        let url = self.metrics_url("historical", bidder_code, key)?;
        self.get_json(url).await
    }
}

#[async_trait]
impl OutcomeRecorder for HttpPerformanceClient {
    async fn record_request(&self, outcome: &RequestOutcome) -> PortResult<()> {
        let url = self.endpoint(&["v1", "outcomes", "requests"])?;
        self.post_json(url, outcome).await
    }

    async fn record_win(&self, outcome: &WinOutcome) -> PortResult<()> {
        let url = self.endpoint(&["v1", "outcomes", "wins"])?;
        self.post_json(url, outcome).await
    }
}

#[async_trait]
impl AnchorProvider for HttpPerformanceClient {
    async fn top_bidders_by_revenue(
        &self,
        publisher_id: &str,
        limit: usize,
    ) -> PortResult<Vec<BidderCode>> {
        let mut url = self.endpoint(&["v1", "publishers", publisher_id, "top-bidders"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let response: TopBiddersResponse = self.get_json(url).await?;
        Ok(response.bidders.into_iter().take(limit).collect())
    }
}
