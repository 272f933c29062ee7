//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{Kpi, ModeDetail, Step};
use crate::places::Places;
use crate::planner::{QueryDefaults, QueryOutcome, ScoredRoute};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with the planning form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub places: Vec<PlaceView>,
    pub form: FormDefaultsView,
}

/// Results page.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub origin: String,
    pub destination: String,
    pub computed_at: String,
    pub rows: Vec<RouteRowView>,
    pub best: Option<RecommendedView>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

impl IndexTemplate {
    pub fn new(places: &Places, defaults: &QueryDefaults) -> Self {
        Self {
            places: places
                .all()
                .iter()
                .map(|p| PlaceView {
                    name: p.name.to_string(),
                    city: p.city.to_string(),
                })
                .collect(),
            form: FormDefaultsView::from_defaults(defaults),
        }
    }
}

impl ResultsTemplate {
    pub fn from_outcome(outcome: &QueryOutcome) -> Self {
        Self {
            origin: outcome.origin.to_string(),
            destination: outcome.destination.to_string(),
            computed_at: outcome.computed_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            rows: outcome.batch.routes.iter().map(RouteRowView::from_route).collect(),
            best: outcome.recommended().map(RecommendedView::from_route),
        }
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// A selectable place.
#[derive(Debug, Clone)]
pub struct PlaceView {
    pub name: String,
    pub city: String,
}

/// Pre-filled form values.
#[derive(Debug, Clone)]
pub struct FormDefaultsView {
    pub alternatives: usize,
    pub fuel_economy_kmpl: String,
    pub fuel_price: String,
    pub co2_g_per_km: String,
    pub w_distance: String,
    pub w_duration: String,
    pub w_cost: String,
    pub w_emissions: String,
}

impl FormDefaultsView {
    pub fn from_defaults(defaults: &QueryDefaults) -> Self {
        let w = &defaults.weights;
        Self {
            alternatives: defaults.alt_target,
            fuel_economy_kmpl: fmt2(defaults.road.fuel_economy_kmpl),
            fuel_price: fmt2(defaults.road.fuel_price),
            co2_g_per_km: fmt2(defaults.road.co2_g_per_km),
            w_distance: fmt2(w.get(Kpi::Distance)),
            w_duration: fmt2(w.get(Kpi::Duration)),
            w_cost: fmt2(w.get(Kpi::Cost)),
            w_emissions: fmt2(w.get(Kpi::Emissions)),
        }
    }
}

/// One row of the comparison table.
#[derive(Debug, Clone)]
pub struct RouteRowView {
    pub route_id: usize,
    pub mode: String,
    pub distance_km: String,
    pub duration_min: String,
    pub cost_inr: String,
    pub emissions_kg: String,
    pub summary: String,
    pub score: String,
    pub is_recommended: bool,
}

impl RouteRowView {
    pub fn from_route(route: &ScoredRoute) -> Self {
        let kpis = route.candidate.kpis;
        Self {
            route_id: route.route_id,
            mode: route.candidate.mode().label().to_string(),
            distance_km: fmt2(kpis.distance_km),
            duration_min: fmt2(kpis.duration_min),
            cost_inr: fmt2(kpis.cost_inr),
            emissions_kg: fmt3(kpis.emissions_kg),
            summary: route.candidate.summary.clone(),
            score: fmt3(route.score),
            is_recommended: route.is_recommended(),
        }
    }

    /// Badge text for the tag column.
    pub fn badge(&self) -> &'static str {
        if self.is_recommended {
            "Recommended"
        } else {
            "Alt"
        }
    }
}

/// The recommended route card.
#[derive(Debug, Clone)]
pub struct RecommendedView {
    pub row: RouteRowView,
    /// Provider name or hub pair.
    pub via: String,
    pub steps: Vec<StepView>,
    pub geometry_points: usize,
}

impl RecommendedView {
    pub fn from_route(route: &ScoredRoute) -> Self {
        let via = match &route.candidate.detail {
            ModeDetail::Road { provider, .. } => format!("via {provider}"),
            ModeDetail::Rail(pair) | ModeDetail::Flight(pair) => pair.label(),
        };

        Self {
            row: RouteRowView::from_route(route),
            via,
            steps: route.candidate.steps.iter().map(StepView::from_step).collect(),
            geometry_points: route.candidate.geometry.len(),
        }
    }
}

/// A turn-by-turn row or a stop.
#[derive(Debug, Clone)]
pub struct StepView {
    pub name: String,
    pub instruction: String,
    pub distance_km: String,
    pub duration_min: String,
}

impl StepView {
    pub fn from_step(step: &Step) -> Self {
        Self {
            name: if step.name.is_empty() {
                "-".to_string()
            } else {
                step.name.clone()
            },
            instruction: step.instruction.clone(),
            distance_km: fmt2(step.distance_m / 1000.0),
            duration_min: fmt2(step.duration_s / 60.0),
        }
    }
}

fn fmt2(value: f64) -> String {
    format!("{value:.2}")
}

fn fmt3(value: f64) -> String {
    format!("{value:.3}")
}
