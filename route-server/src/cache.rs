//! Caching layer for road provider responses.
//!
//! Road paths for a given origin/destination pair change slowly, so repeated
//! plans for the same trip are served from memory. Coordinates are quantized
//! to 1e-6 degrees for the key, which is well below what a user can click or
//! type.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::geo::Coordinate;
use crate::providers::{ProviderError, RawPath, RoadProvider, RoadRequest};

/// Cache key: quantized origin, quantized destination, path count, tolls flag.
type PathKey = ((i64, i64), (i64, i64), usize, bool);

/// Cached provider answer.
type PathEntry = Arc<Vec<RawPath>>;

const QUANTUM: f64 = 1e6;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

fn quantize(point: Coordinate) -> (i64, i64) {
    (
        (point.lat * QUANTUM).round() as i64,
        (point.lon * QUANTUM).round() as i64,
    )
}

fn key_for(request: &RoadRequest) -> PathKey {
    (
        quantize(request.origin),
        quantize(request.destination),
        request.alt_count,
        request.avoid_tollways,
    )
}

/// Road provider with caching.
///
/// Wraps any [`RoadProvider`] and remembers only answers that fill the
/// requested path count. Errors, empty answers and short answers (as left by
/// a failed fallback in a chain) are passed through uncached so a transient
/// outage is not pinned for the TTL.
pub struct CachedRoadProvider<P> {
    inner: P,
    paths: MokaCache<PathKey, PathEntry>,
}

impl<P: RoadProvider> CachedRoadProvider<P> {
    /// Create a new cached provider.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let paths = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, paths }
    }

    /// Fetch paths, using the cache if available.
    pub async fn get_paths(&self, request: &RoadRequest) -> Result<Vec<RawPath>, ProviderError> {
        let key = key_for(request);

        if let Some(cached) = self.paths.get(&key).await {
            debug!(provider = self.inner.name(), "Road paths served from cache");
            return Ok(cached.as_ref().clone());
        }

        let fetched = self.inner.fetch(request).await?;

        if !fetched.is_empty() && fetched.len() >= request.alt_count {
            self.paths.insert(key, Arc::new(fetched.clone())).await;
        }

        Ok(fetched)
    }

    /// Access the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.paths.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.paths.invalidate_all();
    }
}

impl<P: RoadProvider> RoadProvider for CachedRoadProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch<'a>(
        &'a self,
        request: &'a RoadRequest,
    ) -> BoxFuture<'a, Result<Vec<RawPath>, ProviderError>> {
        self.get_paths(request).boxed()
    }
}
