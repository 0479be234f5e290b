//! TTL cache in front of a performance source
//!
//! Successful reads are cached per (bidder, key) for a fixed TTL. Errors are
//! never cached so a flapping backend is retried on the next request.

use async_trait::async_trait;
use bidroute_core::{HistoricalPerformance, LookupKey, RealTimeMetrics};
use bidroute_ports::{HistoricalSource, PortResult, RealTimeSource};
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

type CacheKey = (String, Option<LookupKey>);

struct Cached<T> {
    value: T,
    stored_at: Instant,
}

pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    realtime: DashMap<CacheKey, Cached<RealTimeMetrics>>,
    historical: DashMap<CacheKey, Cached<HistoricalPerformance>>,
}

impl<S> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            realtime: DashMap::new(),
            historical: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.realtime.clear();
        self.historical.clear();
    }

    fn lookup<T: Clone>(&self, map: &DashMap<CacheKey, Cached<T>>, key: &CacheKey) -> Option<T> {
        let entry = map.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }
}

#[async_trait]
impl<S: RealTimeSource> RealTimeSource for CachedSource<S> {
    async fn realtime_metrics(
        &self,
        bidder_code: &str,
        key: Option<&LookupKey>,
    ) -> PortResult<RealTimeMetrics> {
        let cache_key = (bidder_code.to_string(), key.cloned());
        if let Some(hit) = self.lookup(&self.realtime, &cache_key) {
            return Ok(hit);
        }

        let value = self.inner.realtime_metrics(bidder_code, key).await?;
        self.realtime.insert(
            cache_key,
            Cached {
                value: value.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(value)
    }
}

#[async_trait]
impl<S: HistoricalSource> HistoricalSource for CachedSource<S> {
    async fn historical_performance(
        &self,
        bidder_code: &str,
        key: Option<&LookupKey>,
    ) -> PortResult<HistoricalPerformance> {
        let cache_key = (bidder_code.to_string(), key.cloned());
        if let Some(hit) = self.lookup(&self.historical, &cache_key) {
            return Ok(hit);
        }

        let value = self.inner.historical_performance(bidder_code, key).await?;
        self.historical.insert(
            cache_key,
            Cached {
                value: value.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(value)
    }
}
