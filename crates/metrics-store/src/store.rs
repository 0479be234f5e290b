//! Metrics Store
//!
//! Read-only view over the two performance sources. Writes go through the
//! ingestion pipeline's `OutcomeRecorder`, never through here.

use crate::blend::blend;
use crate::config::MetricsStoreConfig;
use crate::error::MetricsConfigError;
use bidroute_core::{
    BidderCode, BidderMetricsSnapshot, ClassifiedRequest, HistoricalPerformance, LookupKey,
    RealTimeMetrics,
};
use bidroute_ports::{HistoricalSource, PortError, PortResult, RealTimeSource};
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;

pub struct MetricsStore {
    realtime: Arc<dyn RealTimeSource>,
    historical: Arc<dyn HistoricalSource>,
    config: MetricsStoreConfig,
}

impl MetricsStore {
    pub fn new(
        realtime: Arc<dyn RealTimeSource>,
        historical: Arc<dyn HistoricalSource>,
        config: MetricsStoreConfig,
    ) -> Result<Self, MetricsConfigError> {
        config.validate()?;
        info!(
            "[METRICS] Store ready: weights {}/{}, min samples {}, timeout {} ms",
            config.realtime_weight,
            config.historical_weight,
            config.min_sample_size,
            config.fetch_timeout_ms
        );

        Ok(Self {
            realtime,
            historical,
            config,
        })
    }

    pub fn config(&self) -> &MetricsStoreConfig {
        &self.config
    }

    /// Blended snapshot for one bidder
    ///
    /// With a request, every level of the request's fallback chain is read
    /// concurrently and the first level whose combined sample size reaches
    /// `min_sample_size` wins; if none does, the broadest level is used.
    /// Without a request the bidder-wide aggregate is read.
    pub async fn get_metrics(
        &self,
        bidder_code: &str,
        request: Option<&ClassifiedRequest>,
    ) -> BidderMetricsSnapshot {
        let levels: Vec<Option<LookupKey>> = match request {
            Some(request) => LookupKey::from_request(request)
                .fallback_keys()
                .into_iter()
                .map(Some)
                .collect(),
            None => vec![None],
        };

        let reads = join_all(
            levels
                .iter()
                .map(|key| self.read_level(bidder_code, key.as_ref())),
        )
        .await;

        let last = reads.len().saturating_sub(1);
        let chosen = reads
            .iter()
            .position(|(rt, hist)| {
                rt.sample_size() + hist.sample_size() >= self.config.min_sample_size
            })
            .unwrap_or(last);

        let (rt, hist) = &reads[chosen];
        let snapshot = blend(
            bidder_code,
            rt,
            hist,
            &self.config,
            levels[chosen].clone(),
            chosen,
        );

        debug!(
            "[METRICS] {} level {} samples {} confidence {:.2}",
            bidder_code, chosen, snapshot.total_requests, snapshot.confidence
        );
        snapshot
    }

    /// Snapshots for many bidders, fetched concurrently, in input order
    pub async fn get_metrics_batch(
        &self,
        bidders: &[BidderCode],
        request: Option<&ClassifiedRequest>,
    ) -> Vec<BidderMetricsSnapshot> {
        self.get_metrics_batch_until(bidders, request, std::future::pending())
            .await
    }

    /// Like [`get_metrics_batch`](Self::get_metrics_batch), but stops when
    /// `cancel` resolves
    ///
    /// Outstanding fetches are dropped (cancelled) and bidders that had not
    /// finished get a zero-sample snapshot with confidence 0.
    pub async fn get_metrics_batch_until<F>(
        &self,
        bidders: &[BidderCode],
        request: Option<&ClassifiedRequest>,
        cancel: F,
    ) -> Vec<BidderMetricsSnapshot>
    where
        F: Future<Output = ()>,
    {
        let mut results: Vec<Option<BidderMetricsSnapshot>> = vec![None; bidders.len()];

        {
            let mut pending: FuturesUnordered<_> = bidders
                .iter()
                .enumerate()
                .map(|(index, bidder)| async move {
                    (index, self.get_metrics(bidder, request).await)
                })
                .collect();

            tokio::pin!(cancel);
            loop {
                tokio::select! {
                    biased;
                    next = pending.next() => match next {
                        Some((index, snapshot)) => results[index] = Some(snapshot),
                        None => break,
                    },
                    _ = &mut cancel => {
                        warn!(
                            "[METRICS] Cancelled with {} of {} bidders outstanding",
                            pending.len(),
                            bidders.len()
                        );
                        break;
                    }
                }
            }
        }

        let exact_key = request.map(LookupKey::from_request);
        results
            .into_iter()
            .zip(bidders)
            .map(|(snapshot, bidder)| {
                snapshot.unwrap_or_else(|| BidderMetricsSnapshot::empty(bidder, exact_key.clone()))
            })
            .collect()
    }

    async fn read_level(
        &self,
        bidder_code: &str,
        key: Option<&LookupKey>,
    ) -> (RealTimeMetrics, HistoricalPerformance) {
        let timeout = self.config.fetch_timeout();
        let (rt, hist) = tokio::join!(
            tokio::time::timeout(timeout, self.realtime.realtime_metrics(bidder_code, key)),
            tokio::time::timeout(timeout, self.historical.historical_performance(bidder_code, key)),
        );

        let ms = self.config.fetch_timeout_ms;
        let rt = degrade(rt.unwrap_or(Err(PortError::Timeout(ms))), "realtime", bidder_code);
        let hist = degrade(hist.unwrap_or(Err(PortError::Timeout(ms))), "historical", bidder_code);
        (rt, hist)
    }
}

fn degrade<T: Default>(result: PortResult<T>, source: &str, bidder_code: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!(
            "[METRICS] {} read for {} failed, treating as no data: {}",
            source, bidder_code, e
        );
        T::default()
    })
}
