//! Rail and flight candidates through pairs of nearby hubs.

use tracing::trace;

use crate::domain::{HubPair, Kpis, Mode, ModeDetail, RouteCandidate, Step};
use crate::geo::{Coordinate, haversine_km};
use crate::hubs::{HubCatalog, NearbyHub};
use crate::kpi::{DISTANCE_DECIMALS, ModeModel, round_to};

/// Build up to `alt_target` candidates for a hub-based `mode`.
///
/// Boarding and alighting hubs are drawn from the `alt_target` nearest hubs
/// at each end; pairs with the least total access distance win. Returns an
/// empty list for [`Mode::Road`], an empty catalog or `alt_target == 0`.
pub fn build_hub_routes(
    origin: Coordinate,
    destination: Coordinate,
    catalog: &HubCatalog,
    mode: Mode,
    model: &ModeModel,
    alt_target: usize,
) -> Vec<RouteCandidate> {
    if mode == Mode::Road || alt_target == 0 {
        return Vec::new();
    }

    let near_origin = catalog.nearest(origin, alt_target);
    let near_destination = catalog.nearest(destination, alt_target);

    let mut pairs: Vec<(NearbyHub<'_>, NearbyHub<'_>)> = near_origin
        .iter()
        .flat_map(|o| near_destination.iter().map(move |d| (*o, *d)))
        .collect();

    pairs.sort_by(|a, b| {
        let a_access = a.0.distance_km + a.1.distance_km;
        let b_access = b.0.distance_km + b.1.distance_km;
        a_access.total_cmp(&b_access)
    });
    pairs.truncate(alt_target);

    pairs
        .into_iter()
        .map(|(o, d)| hub_candidate(origin, destination, o, d, mode, model))
        .collect()
}

fn hub_candidate(
    origin: Coordinate,
    destination: Coordinate,
    boarding: NearbyHub<'_>,
    alighting: NearbyHub<'_>,
    mode: Mode,
    model: &ModeModel,
) -> RouteCandidate {
    let trunk_km = haversine_km(boarding.hub.location, alighting.hub.location);
    let total_km = boarding.distance_km + trunk_km + alighting.distance_km;
    // KPIs come from the exact length; only the reported distance is rounded.
    let (duration_min, cost, emissions) = model.estimate(total_km);
    let distance_km = round_to(total_km, DISTANCE_DECIMALS);

    let pair = HubPair {
        origin_hub: boarding.hub.name.clone(),
        destination_hub: alighting.hub.name.clone(),
        origin_access_km: boarding.distance_km,
        destination_access_km: alighting.distance_km,
    };

    trace!(mode = %mode, hubs = %pair.label(), distance_km, "Hub candidate");

    let vehicle = mode.vehicle();
    let steps = vec![
        Step::new(pair.origin_hub.clone(), format!("Board {vehicle}"), 0.0, 0.0),
        Step::new(pair.destination_hub.clone(), format!("Alight {vehicle}"), 0.0, 0.0),
    ];

    let summary = format!("{}, {}", pair.origin_hub, pair.destination_hub);

    let detail = match mode {
        Mode::Flight => ModeDetail::Flight(pair),
        _ => ModeDetail::Rail(pair),
    };

    RouteCandidate {
        kpis: Kpis::new(distance_km, duration_min, cost, emissions).sanitized(),
        geometry: vec![
            origin,
            boarding.hub.location,
            alighting.hub.location,
            destination,
        ],
        summary,
        steps,
        detail,
    }
}
