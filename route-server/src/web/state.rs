//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::places::Places;
use crate::planner::{Planner, QueryDefaults, QueryOutcome};

/// The most recent successful plan, kept so it can be shown again.
///
/// Every successful query overwrites it; failed queries leave it alone.
#[derive(Debug, Default)]
pub struct LastResult {
    slot: RwLock<Option<Arc<QueryOutcome>>>,
}

impl LastResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Arc<QueryOutcome>> {
        self.slot.read().await.clone()
    }

    pub async fn store(&self, outcome: Arc<QueryOutcome>) {
        *self.slot.write().await = Some(outcome);
    }

    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Route planner with its road provider and hub catalogs
    pub planner: Arc<Planner>,

    /// Defaults for fields a request leaves unset
    pub defaults: Arc<QueryDefaults>,

    /// Named places usable instead of coordinates
    pub places: Places,

    /// Last successful result
    pub last: Arc<LastResult>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(planner: Planner, defaults: QueryDefaults, places: Places) -> Self {
        Self {
            planner: Arc::new(planner),
            defaults: Arc::new(defaults),
            places,
            last: Arc::new(LastResult::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::planner::ScoredBatch;
    use chrono::Utc;

    fn outcome(lat: f64) -> Arc<QueryOutcome> {
        Arc::new(QueryOutcome {
            origin: Coordinate::new(lat, 0.0),
            destination: Coordinate::new(0.0, 0.0),
            batch: ScoredBatch::default(),
            computed_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn last_result_overwrites() {
        let last = LastResult::new();
        assert!(last.get().await.is_none());

        last.store(outcome(1.0)).await;
        last.store(outcome(2.0)).await;
        assert_eq!(last.get().await.unwrap().origin.lat, 2.0);

        last.clear().await;
        assert!(last.get().await.is_none());
    }
}
