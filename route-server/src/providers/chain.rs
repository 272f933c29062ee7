//! Sequential provider fallback.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use super::error::ProviderError;
use super::types::{RawPath, RoadProvider, RoadRequest};

/// Consults providers in order until enough paths have been collected.
///
/// A failing provider is logged and skipped. The chain itself never fails: if
/// every provider errors the result is simply empty.
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn RoadProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn RoadProvider>>) -> Self {
        Self { providers }
    }

    /// Append a provider to the end of the chain.
    pub fn with(mut self, provider: Arc<dyn RoadProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn push(&mut self, provider: Arc<dyn RoadProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Collect up to `request.alt_count` paths, asking each provider only
    /// for the shortfall left by the ones before it.
    pub async fn collect(&self, request: &RoadRequest) -> Vec<RawPath> {
        let target = request.alt_count;
        let mut collected: Vec<RawPath> = Vec::with_capacity(target);

        for provider in &self.providers {
            if collected.len() >= target {
                break;
            }

            let missing = target - collected.len();
            let sub_request = RoadRequest {
                alt_count: missing,
                ..*request
            };

            match provider.fetch(&sub_request).await {
                Ok(paths) => {
                    debug!(
                        provider = provider.name(),
                        returned = paths.len(),
                        missing,
                        "Provider answered"
                    );
                    collected.extend(paths.into_iter().take(missing));
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Road provider failed, trying next");
                }
            }
        }

        collected
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.names())
            .finish()
    }
}

impl RoadProvider for ProviderChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn fetch<'a>(
        &'a self,
        request: &'a RoadRequest,
    ) -> BoxFuture<'a, Result<Vec<RawPath>, ProviderError>> {
        self.collect(request).map(Ok).boxed()
    }
}
