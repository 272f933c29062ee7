//! Multi-criteria scoring of route candidates.
//!
//! Each KPI column is min-max normalized across the whole candidate set,
//! regardless of mode, and the normalized values are combined into one
//! weighted score. Lower is better.

use serde::Serialize;

use crate::domain::{Kpi, RouteCandidate, ScoringWeights};

/// Whether a route is the recommended choice of its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Recommended,
    Alternative,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Recommended => "recommended",
            Tag::Alternative => "alternative",
        }
    }
}

/// A candidate with its scoring outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRoute {
    /// Index of the candidate in the scoring input.
    pub route_id: usize,
    pub candidate: RouteCandidate,
    /// Normalized KPIs in [`Kpi::ALL`] order.
    pub normalized: [f64; 4],
    pub score: f64,
    pub tag: Tag,
}

impl ScoredRoute {
    pub fn is_recommended(&self) -> bool {
        self.tag == Tag::Recommended
    }
}

/// Scored routes, best first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScoredBatch {
    pub routes: Vec<ScoredRoute>,
}

impl ScoredBatch {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// The recommended route; always the first one.
    pub fn recommended(&self) -> Option<&ScoredRoute> {
        self.routes.first()
    }

    /// Input index of the recommended route.
    pub fn recommended_index(&self) -> Option<usize> {
        self.recommended().map(|r| r.route_id)
    }
}

/// Scale `values` linearly onto [0, 1].
///
/// A constant column has no spread and maps to all zeros.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if !range.is_finite() || range <= 0.0 {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| (v - min) / range).collect()
}

/// Score and rank candidates.
///
/// The first candidate (in input order) with the minimal score is tagged
/// [`Tag::Recommended`]; the output is stably sorted by ascending score so
/// it comes first.
pub fn score_candidates(candidates: Vec<RouteCandidate>, weights: &ScoringWeights) -> ScoredBatch {
    if candidates.is_empty() {
        return ScoredBatch::default();
    }

    let columns: Vec<Vec<f64>> = Kpi::ALL
        .iter()
        .map(|&kpi| {
            let raw: Vec<f64> = candidates.iter().map(|c| c.kpis.get(kpi)).collect();
            min_max_normalize(&raw)
        })
        .collect();

    let w = weights.as_array();

    let mut routes: Vec<ScoredRoute> = candidates
        .into_iter()
        .enumerate()
        .map(|(i, candidate)| {
            let normalized = [columns[0][i], columns[1][i], columns[2][i], columns[3][i]];
            let score = normalized.iter().zip(w.iter()).map(|(n, w)| n * w).sum();
            ScoredRoute {
                route_id: i,
                candidate,
                normalized,
                score,
                tag: Tag::Alternative,
            }
        })
        .collect();

    // Strict `<` keeps the earliest minimum.
    let mut best = 0;
    for (i, route) in routes.iter().enumerate().skip(1) {
        if route.score < routes[best].score {
            best = i;
        }
    }
    routes[best].tag = Tag::Recommended;

    // Stable: equal scores keep input order, so `best` lands first.
    routes.sort_by(|a, b| a.score.total_cmp(&b.score));

    ScoredBatch { routes }
}
