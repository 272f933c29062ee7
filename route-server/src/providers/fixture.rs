//! Offline road provider backed by canned paths.

use std::path::Path;

use futures::future::BoxFuture;
use tracing::info;

use super::error::ProviderError;
use super::types::{RawPath, RoadProvider, RoadRequest};

/// Serves the same paths for every request, capped at the requested count.
///
/// Used for offline runs (`ROUTE_FIXTURE_FILE`) and in tests.
#[derive(Debug, Clone)]
pub struct FixtureRoadProvider {
    name: String,
    paths: Vec<RawPath>,
}

impl FixtureRoadProvider {
    pub fn new(name: impl Into<String>, paths: Vec<RawPath>) -> Self {
        Self {
            name: name.into(),
            paths,
        }
    }

    /// Load paths from a JSON array of [`RawPath`] objects.
    pub fn from_file(path: &Path) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Fixture(format!("{}: {e}", path.display())))?;
        let mut paths: Vec<RawPath> = serde_json::from_str(&content)
            .map_err(|e| ProviderError::Fixture(format!("{}: {e}", path.display())))?;

        for p in &mut paths {
            if p.provider.is_empty() {
                p.provider = "fixture".to_string();
            }
        }

        info!(path = %path.display(), paths = paths.len(), "Loaded road fixture");
        Ok(Self::new("fixture", paths))
    }

    pub fn paths(&self) -> &[RawPath] {
        &self.paths
    }
}

impl RoadProvider for FixtureRoadProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch<'a>(
        &'a self,
        request: &'a RoadRequest,
    ) -> BoxFuture<'a, Result<Vec<RawPath>, ProviderError>> {
        let paths = self.paths.iter().take(request.alt_count).cloned().collect();
        Box::pin(async move { Ok(paths) })
    }
}
