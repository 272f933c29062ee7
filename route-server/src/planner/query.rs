//! The query pipeline: validate, build per mode, score.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Mode, RouteCandidate, ScoringWeights, normalize_modes};
use crate::geo::Coordinate;
use crate::hubs::HubCatalog;
use crate::kpi::{ModeModels, RoadKpiParams};
use crate::providers::{RoadProvider, RoadRequest};

use super::config::{MAX_ALT_TARGET, QueryDefaults};
use super::hub_routes::build_hub_routes;
use super::road::build_road_routes;
use super::score::{ScoredBatch, ScoredRoute, Tag, score_candidates};

/// Error from route planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Origin and destination are the same point.
    #[error("origin and destination are identical; choose different points")]
    IdenticalEndpoints,

    /// A latitude or longitude is NaN or infinite.
    #[error("coordinates must be finite numbers")]
    InvalidCoordinate,

    /// No mode produced a candidate.
    #[error("no routes found; try different points or modes")]
    NoRoutes,
}

/// One planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub origin: Coordinate,
    pub destination: Coordinate,
    /// Modes to plan for, deduplicated in [`Mode::ALL`] order.
    pub modes: Vec<Mode>,
    /// Alternatives per mode, at most [`MAX_ALT_TARGET`].
    pub alt_target: usize,
    pub avoid_tollways: bool,
    pub road: RoadKpiParams,
    pub weights: ScoringWeights,
}

impl RouteQuery {
    /// A query between two points using `defaults` for everything else.
    pub fn new(origin: Coordinate, destination: Coordinate, defaults: &QueryDefaults) -> Self {
        Self {
            origin,
            destination,
            modes: normalize_modes(defaults.modes.iter().copied()),
            alt_target: defaults.alt_target.min(MAX_ALT_TARGET),
            avoid_tollways: defaults.avoid_tollways,
            road: defaults.road,
            weights: defaults.weights,
        }
    }

    pub fn with_modes(mut self, modes: impl IntoIterator<Item = Mode>) -> Self {
        self.modes = normalize_modes(modes);
        self
    }

    /// Set alternatives per mode, clamped to [`MAX_ALT_TARGET`].
    pub fn with_alt_target(mut self, alt_target: usize) -> Self {
        self.alt_target = alt_target.min(MAX_ALT_TARGET);
        self
    }

    pub fn with_avoid_tollways(mut self, avoid: bool) -> Self {
        self.avoid_tollways = avoid;
        self
    }

    pub fn with_road_params(mut self, road: RoadKpiParams) -> Self {
        self.road = road;
        self
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Validate the query.
    pub fn validate(&self) -> Result<(), QueryError> {
        if !self.origin.is_finite() || !self.destination.is_finite() {
            return Err(QueryError::InvalidCoordinate);
        }
        if self.origin == self.destination {
            return Err(QueryError::IdenticalEndpoints);
        }
        Ok(())
    }

    fn road_request(&self) -> RoadRequest {
        RoadRequest::new(self.origin, self.destination, self.alt_target)
            .with_avoid_tollways(self.avoid_tollways)
    }
}

/// A flat, presentation-ready row for one scored route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub route_id: usize,
    pub mode: Mode,
    pub distance_km: f64,
    pub duration_min: f64,
    pub cost_inr: f64,
    pub emissions_kg: f64,
    pub summary: String,
    pub score: f64,
    pub tag: Tag,
}

impl From<&ScoredRoute> for RouteRecord {
    fn from(route: &ScoredRoute) -> Self {
        let kpis = route.candidate.kpis;
        Self {
            route_id: route.route_id,
            mode: route.candidate.mode(),
            distance_km: kpis.distance_km,
            duration_min: kpis.duration_min,
            cost_inr: kpis.cost_inr,
            emissions_kg: kpis.emissions_kg,
            summary: route.candidate.summary.clone(),
            score: route.score,
            tag: route.tag,
        }
    }
}

/// Result of a successful plan.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub origin: Coordinate,
    pub destination: Coordinate,
    /// Never empty.
    pub batch: ScoredBatch,
    pub computed_at: DateTime<Utc>,
}

impl QueryOutcome {
    /// Rows in score order.
    pub fn records(&self) -> Vec<RouteRecord> {
        self.batch.routes.iter().map(RouteRecord::from).collect()
    }

    /// The recommended route.
    pub fn recommended(&self) -> Option<&ScoredRoute> {
        self.batch.recommended()
    }
}

/// Route planner.
///
/// Stateless between queries: hub catalogs and mode models are shared
/// read-only, and every query builds and scores its candidates from scratch.
#[derive(Clone)]
pub struct Planner {
    road: Arc<dyn RoadProvider>,
    rail_hubs: Arc<HubCatalog>,
    air_hubs: Arc<HubCatalog>,
    models: ModeModels,
}

impl Planner {
    /// Create a new planner.
    pub fn new(
        road: Arc<dyn RoadProvider>,
        rail_hubs: Arc<HubCatalog>,
        air_hubs: Arc<HubCatalog>,
        models: ModeModels,
    ) -> Self {
        Self {
            road,
            rail_hubs,
            air_hubs,
            models,
        }
    }

    pub fn models(&self) -> &ModeModels {
        &self.models
    }

    /// Plan and rank routes for `query`.
    ///
    /// Modes are built one after another in [`Mode::ALL`] order, which is
    /// also the order ties are broken in.
    pub async fn plan(&self, query: &RouteQuery) -> Result<QueryOutcome, QueryError> {
        query.validate()?;

        let mut candidates: Vec<RouteCandidate> = Vec::new();

        for &mode in &normalize_modes(query.modes.iter().copied()) {
            let built = match mode {
                Mode::Road => {
                    build_road_routes(self.road.as_ref(), &query.road_request(), &query.road).await
                }
                Mode::Rail => build_hub_routes(
                    query.origin,
                    query.destination,
                    &self.rail_hubs,
                    Mode::Rail,
                    &self.models.rail,
                    query.alt_target,
                ),
                Mode::Flight => build_hub_routes(
                    query.origin,
                    query.destination,
                    &self.air_hubs,
                    Mode::Flight,
                    &self.models.flight,
                    query.alt_target,
                ),
            };

            debug!(mode = %mode, candidates = built.len(), "Mode built");
            candidates.extend(built);
        }

        if candidates.is_empty() {
            return Err(QueryError::NoRoutes);
        }

        let batch = score_candidates(candidates, &query.weights);

        if let Some(best) = batch.recommended() {
            info!(
                routes = batch.len(),
                recommended = best.route_id,
                mode = %best.candidate.mode(),
                score = best.score,
                "Routes planned"
            );
        }

        Ok(QueryOutcome {
            origin: query.origin,
            destination: query.destination,
            batch,
            computed_at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("road", &self.road.name())
            .field("rail_hubs", &self.rail_hubs.len())
            .field("air_hubs", &self.air_hubs.len())
            .field("models", &self.models)
            .finish()
    }
}
