//! Route candidates: the unit the scoring engine compares.

use serde::Serialize;

use super::{Kpi, Mode};
use crate::geo::Coordinate;

/// The four scored quantities of a candidate.
///
/// Units are fixed across a scoring run: kilometres, minutes, currency units
/// and kilograms of CO₂.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Kpis {
    pub distance_km: f64,
    pub duration_min: f64,
    pub cost_inr: f64,
    pub emissions_kg: f64,
}

impl Kpis {
    pub fn new(distance_km: f64, duration_min: f64, cost_inr: f64, emissions_kg: f64) -> Self {
        Self {
            distance_km,
            duration_min,
            cost_inr,
            emissions_kg,
        }
    }

    pub fn get(&self, kpi: Kpi) -> f64 {
        match kpi {
            Kpi::Distance => self.distance_km,
            Kpi::Duration => self.duration_min,
            Kpi::Cost => self.cost_inr,
            Kpi::Emissions => self.emissions_kg,
        }
    }

    /// Values in [`Kpi::ALL`] order.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.distance_km,
            self.duration_min,
            self.cost_inr,
            self.emissions_kg,
        ]
    }

    /// Replace negative or non-finite values with 0.
    pub fn sanitized(self) -> Self {
        Self {
            distance_km: non_negative(self.distance_km),
            duration_min: non_negative(self.duration_min),
            cost_inr: non_negative(self.cost_inr),
            emissions_kg: non_negative(self.emissions_kg),
        }
    }
}

/// Clamp to a finite, non-negative value.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// One sub-segment of a route: a turn instruction, or boarding at a hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    /// Road or stop name.
    pub name: String,
    pub instruction: String,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl Step {
    pub fn new(
        name: impl Into<String>,
        instruction: impl Into<String>,
        distance_m: f64,
        duration_s: f64,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            distance_m,
            duration_s,
        }
    }
}

/// The boarding and alighting hubs of a rail or flight candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubPair {
    pub origin_hub: String,
    pub destination_hub: String,
    /// Ground distance from the origin to the boarding hub.
    pub origin_access_km: f64,
    /// Ground distance from the alighting hub to the destination.
    pub destination_access_km: f64,
}

impl HubPair {
    /// Total "first/last mile" distance used to rank hub pairs.
    pub fn access_km(&self) -> f64 {
        self.origin_access_km + self.destination_access_km
    }

    /// E.g. `"Howrah (HWH) → New Delhi (NDLS)"`.
    pub fn label(&self) -> String {
        format!("{} → {}", self.origin_hub, self.destination_hub)
    }
}

/// Mode-specific payload of a candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ModeDetail {
    Road {
        /// Name of the routing provider that produced the path.
        provider: String,
        /// Distinct road names in travel order.
        road_names: Vec<String>,
    },
    Rail(HubPair),
    Flight(HubPair),
}

impl ModeDetail {
    pub fn mode(&self) -> Mode {
        match self {
            ModeDetail::Road { .. } => Mode::Road,
            ModeDetail::Rail(_) => Mode::Rail,
            ModeDetail::Flight(_) => Mode::Flight,
        }
    }

    /// The hub pair, for rail and flight candidates.
    pub fn hubs(&self) -> Option<&HubPair> {
        match self {
            ModeDetail::Road { .. } => None,
            ModeDetail::Rail(pair) | ModeDetail::Flight(pair) => Some(pair),
        }
    }
}

/// A proposed route for one mode, carrying its KPIs and geometry.
///
/// Candidates live for one query; nothing persists them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCandidate {
    pub kpis: Kpis,
    /// Path in travel order. Rail and flight use an
    /// origin → hub → hub → destination skeleton.
    pub geometry: Vec<Coordinate>,
    pub summary: String,
    pub steps: Vec<Step>,
    pub detail: ModeDetail,
}

impl RouteCandidate {
    pub fn mode(&self) -> Mode {
        self.detail.mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> HubPair {
        HubPair {
            origin_hub: "Howrah (HWH)".into(),
            destination_hub: "New Delhi (NDLS)".into(),
            origin_access_km: 2.5,
            destination_access_km: 1.25,
        }
    }

    #[test]
    fn kpis_by_name() {
        let k = Kpis::new(10.0, 20.0, 50.0, 1.0);
        assert_eq!(k.get(Kpi::Duration), 20.0);
        assert_eq!(k.as_array(), [10.0, 20.0, 50.0, 1.0]);
    }

    #[test]
    fn sanitize_defaults_malformed_values() {
        let k = Kpis::new(-1.0, f64::NAN, f64::INFINITY, 3.0).sanitized();
        assert_eq!(k.as_array(), [0.0, 0.0, 0.0, 3.0]);
    }

    #[test]
    fn hub_pair_access_and_label() {
        let p = pair();
        assert_eq!(p.access_km(), 3.75);
        assert_eq!(p.label(), "Howrah (HWH) → New Delhi (NDLS)");
    }

    #[test]
    fn mode_from_detail() {
        assert_eq!(ModeDetail::Rail(pair()).mode(), Mode::Rail);
        assert_eq!(ModeDetail::Flight(pair()).mode(), Mode::Flight);
        let road = ModeDetail::Road {
            provider: "osrm".into(),
            road_names: vec![],
        };
        assert_eq!(road.mode(), Mode::Road);
        assert!(road.hubs().is_none());
    }

    #[test]
    fn detail_serializes_with_mode_tag() {
        let json = serde_json::to_value(ModeDetail::Flight(pair())).unwrap();
        assert_eq!(json["mode"], "flight");
        assert_eq!(json["origin_hub"], "Howrah (HWH)");
    }
}
