//! Road candidates from provider paths.

use tracing::{debug, warn};

use crate::domain::{Kpis, ModeDetail, RouteCandidate, Step, non_negative};
use crate::kpi::{DISTANCE_DECIMALS, RoadKpiParams, road_cost_emissions, round_to};
use crate::providers::{RawPath, RoadProvider, RoadRequest};

/// Most road names listed in a summary.
pub const MAX_SUMMARY_NAMES: usize = 10;

/// Fetch road paths and turn each into a candidate.
///
/// A provider error is logged and yields no candidates; so does a path whose
/// geometry cannot be decoded.
pub async fn build_road_routes(
    provider: &dyn RoadProvider,
    request: &RoadRequest,
    params: &RoadKpiParams,
) -> Vec<RouteCandidate> {
    let paths = match provider.fetch(request).await {
        Ok(paths) => paths,
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "Road provider failed");
            return Vec::new();
        }
    };

    let candidates: Vec<RouteCandidate> = paths
        .into_iter()
        .enumerate()
        .filter_map(|(i, path)| road_candidate(i, path, params))
        .collect();

    debug!(candidates = candidates.len(), "Road candidates built");
    candidates
}

fn road_candidate(index: usize, path: RawPath, params: &RoadKpiParams) -> Option<RouteCandidate> {
    let geometry = match path.geometry.to_coordinates() {
        Ok(coords) => coords,
        Err(e) => {
            warn!(provider = %path.provider, path = index, error = %e, "Dropping path with malformed geometry");
            return None;
        }
    };

    let distance_km = round_to(non_negative(path.distance_m) / 1000.0, DISTANCE_DECIMALS);
    let duration_min = round_to(non_negative(path.duration_s) / 60.0, DISTANCE_DECIMALS);
    let (cost, emissions) = road_cost_emissions(distance_km, params);

    let road_names = distinct_names(path.steps.iter().map(|s| s.name.as_str()));

    let steps = path
        .steps
        .into_iter()
        .map(|s| {
            Step::new(
                s.name,
                s.instruction,
                non_negative(s.distance_m),
                non_negative(s.duration_s),
            )
        })
        .collect();

    Some(RouteCandidate {
        kpis: Kpis::new(distance_km, duration_min, cost, emissions).sanitized(),
        geometry,
        summary: road_names.join(", "),
        steps,
        detail: ModeDetail::Road {
            provider: path.provider,
            road_names,
        },
    })
}

/// Distinct non-empty names other than `"-"`, first-seen order, capped.
fn distinct_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for name in names.map(str::trim) {
        if seen.len() >= MAX_SUMMARY_NAMES {
            break;
        }
        if name.is_empty() || name == "-" || seen.iter().any(|s| s == name) {
            continue;
        }
        seen.push(name.to_string());
    }
    seen
}
