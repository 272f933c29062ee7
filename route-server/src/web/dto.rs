//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{InvalidMode, Kpi, Mode, ModeDetail, ScoringWeights, Step, parse_mode_list};
use crate::geo::Coordinate;
use crate::kpi::RoadKpiParams;
use crate::places::{Places, UnknownPlace};
use crate::planner::{QueryDefaults, QueryOutcome, RouteQuery, RouteRecord};

/// Why a request could not be turned into a query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error(transparent)]
    UnknownPlace(#[from] UnknownPlace),

    #[error(transparent)]
    InvalidMode(#[from] InvalidMode),

    #[error("{0}: give a place name or both lat and lon")]
    MissingEndpoint(&'static str),

    #[error("{field}: {value:?} is not a finite number")]
    InvalidNumber { field: &'static str, value: String },
}

/// An endpoint given either by name or by coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PlaceOrPoint {
    /// A name from the place catalog, e.g. `{"place": "Garia"}`.
    Named { place: String },
    /// Raw coordinates, e.g. `{"lat": 22.46, "lon": 88.39}`.
    Point { lat: f64, lon: f64 },
}

impl PlaceOrPoint {
    pub fn resolve(&self, places: &Places) -> Result<Coordinate, UnknownPlace> {
        match self {
            PlaceOrPoint::Named { place } => places.resolve(place),
            PlaceOrPoint::Point { lat, lon } => Ok(Coordinate::new(*lat, *lon)),
        }
    }
}

/// Partial KPI weights; unset entries keep the default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeightsInput {
    #[serde(alias = "distance")]
    pub distance_km: Option<f64>,
    #[serde(alias = "duration", alias = "time")]
    pub duration_min: Option<f64>,
    #[serde(alias = "cost")]
    pub cost_inr: Option<f64>,
    #[serde(alias = "emissions", alias = "co2")]
    pub emissions_kg: Option<f64>,
}

impl WeightsInput {
    pub fn apply(&self, base: ScoringWeights) -> ScoringWeights {
        let pairs = [
            (Kpi::Distance, self.distance_km),
            (Kpi::Duration, self.duration_min),
            (Kpi::Cost, self.cost_inr),
            (Kpi::Emissions, self.emissions_kg),
        ];
        pairs
            .into_iter()
            .filter_map(|(kpi, w)| w.map(|w| (kpi, w)))
            .fold(base, |weights, (kpi, w)| weights.with(kpi, w))
    }
}

/// Partial road vehicle parameters; unset entries keep the default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoadParamsInput {
    pub fuel_economy_kmpl: Option<f64>,
    pub fuel_price: Option<f64>,
    pub co2_g_per_km: Option<f64>,
}

impl RoadParamsInput {
    pub fn apply(&self, base: RoadKpiParams) -> RoadKpiParams {
        RoadKpiParams::new(
            self.fuel_economy_kmpl.unwrap_or(base.fuel_economy_kmpl),
            self.fuel_price.unwrap_or(base.fuel_price),
            self.co2_g_per_km.unwrap_or(base.co2_g_per_km),
        )
    }
}

/// JSON request to plan routes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanRoutesRequest {
    pub origin: PlaceOrPoint,
    pub destination: PlaceOrPoint,

    /// Modes to compare (defaults to all).
    #[serde(default)]
    pub modes: Option<Vec<Mode>>,

    /// Alternatives per mode.
    #[serde(default)]
    pub alternatives: Option<usize>,

    #[serde(default)]
    pub avoid_tollways: Option<bool>,

    #[serde(default)]
    pub road: RoadParamsInput,

    #[serde(default)]
    pub weights: WeightsInput,
}

impl PlanRoutesRequest {
    pub fn to_query(&self, places: &Places, defaults: &QueryDefaults) -> Result<RouteQuery, InputError> {
        let origin = self.origin.resolve(places)?;
        let destination = self.destination.resolve(places)?;

        let mut query = RouteQuery::new(origin, destination, defaults)
            .with_road_params(self.road.apply(defaults.road))
            .with_weights(self.weights.apply(defaults.weights));

        if let Some(modes) = &self.modes {
            query = query.with_modes(modes.iter().copied());
        }
        if let Some(n) = self.alternatives {
            query = query.with_alt_target(n);
        }
        if let Some(avoid) = self.avoid_tollways {
            query = query.with_avoid_tollways(avoid);
        }

        Ok(query)
    }
}

/// Flat query-string form submitted by the HTML page.
///
/// Numeric fields are strings so that blank inputs mean "use the default"
/// rather than failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlanFormRequest {
    pub origin_place: Option<String>,
    pub origin_lat: Option<String>,
    pub origin_lon: Option<String>,
    pub destination_place: Option<String>,
    pub destination_lat: Option<String>,
    pub destination_lon: Option<String>,

    pub fuel_economy_kmpl: Option<String>,
    pub fuel_price: Option<String>,
    pub co2_g_per_km: Option<String>,

    pub w_distance: Option<String>,
    pub w_duration: Option<String>,
    pub w_cost: Option<String>,
    pub w_emissions: Option<String>,

    /// Comma-separated mode list; takes precedence over the checkboxes.
    pub modes: Option<String>,
    pub road: Option<String>,
    pub rail: Option<String>,
    pub flight: Option<String>,

    pub alternatives: Option<String>,
    pub avoid_tollways: Option<String>,
}

impl PlanFormRequest {
    pub fn to_query(&self, places: &Places, defaults: &QueryDefaults) -> Result<RouteQuery, InputError> {
        let origin = form_endpoint(
            "origin",
            &self.origin_place,
            &self.origin_lat,
            &self.origin_lon,
            places,
        )?;
        let destination = form_endpoint(
            "destination",
            &self.destination_place,
            &self.destination_lat,
            &self.destination_lon,
            places,
        )?;

        let road = RoadParamsInput {
            fuel_economy_kmpl: form_number("fuel_economy_kmpl", &self.fuel_economy_kmpl)?,
            fuel_price: form_number("fuel_price", &self.fuel_price)?,
            co2_g_per_km: form_number("co2_g_per_km", &self.co2_g_per_km)?,
        };
        let weights = WeightsInput {
            distance_km: form_number("w_distance", &self.w_distance)?,
            duration_min: form_number("w_duration", &self.w_duration)?,
            cost_inr: form_number("w_cost", &self.w_cost)?,
            emissions_kg: form_number("w_emissions", &self.w_emissions)?,
        };

        let mut query = RouteQuery::new(origin, destination, defaults)
            .with_road_params(road.apply(defaults.road))
            .with_weights(weights.apply(defaults.weights))
            .with_avoid_tollways(is_checked(&self.avoid_tollways));

        if let Some(modes) = self.selected_modes()? {
            query = query.with_modes(modes);
        }
        if let Some(n) = form_number("alternatives", &self.alternatives)? {
            query = query.with_alt_target(n.max(0.0).round() as usize);
        }

        Ok(query)
    }

    /// The explicit mode selection, or `None` to use the defaults.
    fn selected_modes(&self) -> Result<Option<Vec<Mode>>, InputError> {
        if let Some(list) = &self.modes {
            return Ok(Some(parse_mode_list(list)?));
        }

        let boxes = [
            (Mode::Road, &self.road),
            (Mode::Rail, &self.rail),
            (Mode::Flight, &self.flight),
        ];
        if boxes.iter().all(|(_, v)| v.is_none()) {
            return Ok(None);
        }

        Ok(Some(
            boxes
                .into_iter()
                .filter(|(_, v)| is_checked(v))
                .map(|(mode, _)| mode)
                .collect(),
        ))
    }
}

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_checked(value: &Option<String>) -> bool {
    matches!(
        blank_to_none(value).map(str::to_ascii_lowercase).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}

fn form_number(field: &'static str, value: &Option<String>) -> Result<Option<f64>, InputError> {
    blank_to_none(value)
        .map(|v| {
            v.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| InputError::InvalidNumber {
                    field,
                    value: v.to_string(),
                })
        })
        .transpose()
}

fn form_endpoint(
    which: &'static str,
    place: &Option<String>,
    lat: &Option<String>,
    lon: &Option<String>,
    places: &Places,
) -> Result<Coordinate, InputError> {
    if let Some(name) = blank_to_none(place) {
        return Ok(places.resolve(name)?);
    }

    let (lat_field, lon_field) = if which == "origin" {
        ("origin_lat", "origin_lon")
    } else {
        ("destination_lat", "destination_lon")
    };

    match (form_number(lat_field, lat)?, form_number(lon_field, lon)?) {
        (Some(lat), Some(lon)) => Ok(Coordinate::new(lat, lon)),
        _ => Err(InputError::MissingEndpoint(which)),
    }
}

/// Full detail of the recommended route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedRoute {
    pub route_id: usize,
    pub summary: String,
    pub geometry: Vec<Coordinate>,
    pub steps: Vec<Step>,
    pub detail: ModeDetail,
}

/// Response from planning routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRoutesResponse {
    pub origin: Coordinate,
    pub destination: Coordinate,

    /// RFC 3339 timestamp of when the plan was computed.
    pub computed_at: String,

    /// Input index of the recommended route.
    pub recommended_index: Option<usize>,

    /// All routes, best first.
    pub routes: Vec<RouteRecord>,

    pub recommended: Option<RecommendedRoute>,
}

impl PlanRoutesResponse {
    pub fn from_outcome(outcome: &QueryOutcome) -> Self {
        let recommended = outcome.recommended().map(|best| RecommendedRoute {
            route_id: best.route_id,
            summary: best.candidate.summary.clone(),
            geometry: best.candidate.geometry.clone(),
            steps: best.candidate.steps.clone(),
            detail: best.candidate.detail.clone(),
        });

        Self {
            origin: outcome.origin,
            destination: outcome.destination,
            computed_at: outcome.computed_at.to_rfc3339(),
            recommended_index: outcome.batch.recommended_index(),
            routes: outcome.records(),
            recommended,
        }
    }
}

/// A place in the catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceResult {
    pub name: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

/// Response listing the place catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacesResponse {
    pub places: Vec<PlaceResult>,
}

impl PlacesResponse {
    pub fn from_places(places: &Places) -> Self {
        Self {
            places: places
                .all()
                .iter()
                .map(|p| PlaceResult {
                    name: p.name.to_string(),
                    city: p.city.to_string(),
                    lat: p.lat,
                    lon: p.lon,
                })
                .collect(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HubPair, Kpis, RouteCandidate};
    use crate::planner::{Tag, score_candidates};
    use chrono::{TimeZone, Utc};

    fn places() -> Places {
        Places::builtin()
    }

    #[test]
    fn json_request_with_names_and_points() {
        let req: PlanRoutesRequest = serde_json::from_str(
            r#"{
                "origin": {"place": "Kolkata (Esplanade)"},
                "destination": {"lat": 28.6, "lon": 77.2},
                "modes": ["rail", "road"],
                "alternatives": 3,
                "avoid_tollways": true,
                "road": {"fuel_price": 100.0},
                "weights": {"cost": 2.0, "co2": -1.0}
            }"#,
        )
        .unwrap();

        let query = req.to_query(&places(), &QueryDefaults::default()).unwrap();

        assert_eq!(query.origin, Coordinate::new(22.5667, 88.3667));
        assert_eq!(query.destination, Coordinate::new(28.6, 77.2));
        assert_eq!(query.modes, [Mode::Road, Mode::Rail]);
        assert_eq!(query.alt_target, 3);
        assert!(query.avoid_tollways);
        assert_eq!(query.road, RoadKpiParams::new(15.0, 100.0, 120.0));
        assert_eq!(query.weights, ScoringWeights::new(1.0, 1.0, 2.0, 0.0));
    }

    #[test]
    fn json_request_minimal_uses_defaults() {
        let req: PlanRoutesRequest = serde_json::from_str(
            r#"{"origin": {"lat": 1.0, "lon": 2.0}, "destination": {"lat": 3.0, "lon": 4.0}}"#,
        )
        .unwrap();

        let defaults = QueryDefaults::default();
        let query = req.to_query(&places(), &defaults).unwrap();

        assert_eq!(query.modes, defaults.modes);
        assert_eq!(query.alt_target, defaults.alt_target);
        assert_eq!(query.weights, defaults.weights);
    }

    #[test]
    fn unknown_place_is_an_input_error() {
        let req: PlanRoutesRequest = serde_json::from_str(
            r#"{"origin": {"place": "Atlantis"}, "destination": {"lat": 3.0, "lon": 4.0}}"#,
        )
        .unwrap();

        let err = req.to_query(&places(), &QueryDefaults::default()).unwrap_err();
        assert_eq!(err, InputError::UnknownPlace(UnknownPlace("Atlantis".into())));
    }

    #[test]
    fn form_with_places_and_checkboxes() {
        let form = PlanFormRequest {
            origin_place: Some("Garia".into()),
            destination_place: Some("Salt Lake (Sector V)".into()),
            road: Some("on".into()),
            flight: Some("on".into()),
            alternatives: Some("20".into()),
            w_duration: Some(" 2.5 ".into()),
            fuel_price: Some("".into()),
            avoid_tollways: Some("on".into()),
            ..PlanFormRequest::default()
        };

        let query = form.to_query(&places(), &QueryDefaults::default()).unwrap();

        assert_eq!(query.origin, Coordinate::new(22.4629, 88.3968));
        assert_eq!(query.modes, [Mode::Road, Mode::Flight]);
        assert_eq!(query.alt_target, crate::planner::MAX_ALT_TARGET);
        assert_eq!(query.weights.get(Kpi::Duration), 2.5);
        assert_eq!(query.road.fuel_price, 110.0);
        assert!(query.avoid_tollways);
    }

    #[test]
    fn form_with_coordinates_and_mode_list() {
        let form = PlanFormRequest {
            origin_lat: Some("22.5667".into()),
            origin_lon: Some("88.3667".into()),
            destination_lat: Some("22.5792".into()),
            destination_lon: Some("88.4317".into()),
            modes: Some("rail".into()),
            road: Some("on".into()),
            ..PlanFormRequest::default()
        };

        let query = form.to_query(&places(), &QueryDefaults::default()).unwrap();
        assert_eq!(query.destination, Coordinate::new(22.5792, 88.4317));
        assert_eq!(query.modes, [Mode::Rail]);
        assert!(!query.avoid_tollways);
    }

    #[test]
    fn form_without_mode_fields_uses_defaults() {
        let form = PlanFormRequest {
            origin_place: Some("Garia".into()),
            destination_place: Some("Behala".into()),
            ..PlanFormRequest::default()
        };
        let query = form.to_query(&places(), &QueryDefaults::default()).unwrap();
        assert_eq!(query.modes, Mode::ALL);
    }

    #[test]
    fn form_errors() {
        let missing = PlanFormRequest {
            origin_lat: Some("22.5".into()),
            destination_place: Some("Garia".into()),
            ..PlanFormRequest::default()
        };
        assert_eq!(
            missing.to_query(&places(), &QueryDefaults::default()),
            Err(InputError::MissingEndpoint("origin"))
        );

        let bad_number = PlanFormRequest {
            origin_place: Some("Garia".into()),
            destination_lat: Some("north".into()),
            destination_lon: Some("88.4".into()),
            ..PlanFormRequest::default()
        };
        assert_eq!(
            bad_number.to_query(&places(), &QueryDefaults::default()),
            Err(InputError::InvalidNumber {
                field: "destination_lat",
                value: "north".into()
            })
        );

        for value in ["NaN", "inf", "-infinity"] {
            let non_finite = PlanFormRequest {
                origin_lat: Some(value.into()),
                origin_lon: Some("88.36".into()),
                destination_place: Some("Garia".into()),
                ..PlanFormRequest::default()
            };
            assert_eq!(
                non_finite.to_query(&places(), &QueryDefaults::default()),
                Err(InputError::InvalidNumber {
                    field: "origin_lat",
                    value: value.into()
                })
            );
        }

        let nan_weight = PlanFormRequest {
            origin_place: Some("Garia".into()),
            destination_place: Some("Behala".into()),
            w_cost: Some("nan".into()),
            ..PlanFormRequest::default()
        };
        assert!(matches!(
            nan_weight.to_query(&places(), &QueryDefaults::default()),
            Err(InputError::InvalidNumber { field: "w_cost", .. })
        ));

        let bad_mode = PlanFormRequest {
            origin_place: Some("Garia".into()),
            destination_place: Some("Behala".into()),
            modes: Some("road,ferry".into()),
            ..PlanFormRequest::default()
        };
        assert!(matches!(
            bad_mode.to_query(&places(), &QueryDefaults::default()),
            Err(InputError::InvalidMode(_))
        ));
    }

    #[test]
    fn response_from_outcome() {
        let pair = HubPair {
            origin_hub: "Howrah (HWH)".into(),
            destination_hub: "New Delhi (NDLS)".into(),
            origin_access_km: 1.0,
            destination_access_km: 2.0,
        };
        let candidates = vec![
            RouteCandidate {
                kpis: Kpis::new(10.0, 20.0, 50.0, 1.0),
                geometry: vec![Coordinate::new(1.0, 2.0)],
                summary: "Park Street".into(),
                steps: vec![Step::new("Park Street", "Continue", 100.0, 10.0)],
                detail: ModeDetail::Road {
                    provider: "fixture".into(),
                    road_names: vec!["Park Street".into()],
                },
            },
            RouteCandidate {
                kpis: Kpis::new(5.0, 30.0, 80.0, 2.0),
                geometry: Vec::new(),
                summary: "Howrah (HWH), New Delhi (NDLS)".into(),
                steps: Vec::new(),
                detail: ModeDetail::Rail(pair),
            },
        ];
        let outcome = QueryOutcome {
            origin: Coordinate::new(1.0, 2.0),
            destination: Coordinate::new(3.0, 4.0),
            batch: score_candidates(candidates, &ScoringWeights::default()),
            computed_at: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
        };

        let response = PlanRoutesResponse::from_outcome(&outcome);

        assert_eq!(response.computed_at, "2024-03-15T10:00:00+00:00");
        assert_eq!(response.recommended_index, Some(0));
        assert_eq!(response.routes.len(), 2);
        assert_eq!(response.routes[0].tag, Tag::Recommended);
        assert_eq!(response.routes[1].mode, Mode::Rail);

        let best = response.recommended.as_ref().unwrap();
        assert_eq!(best.steps.len(), 1);
        assert_eq!(best.geometry, vec![Coordinate::new(1.0, 2.0)]);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["routes"][0]["tag"], "recommended");
        assert_eq!(json["routes"][1]["mode"], "rail");
        assert_eq!(json["recommended"]["detail"]["mode"], "road");
    }

    #[test]
    fn places_response_lists_catalog() {
        let response = PlacesResponse::from_places(&places());
        assert_eq!(response.places.len(), places().len());
        assert_eq!(response.places[0].name, "Kolkata (Esplanade)");
        assert_eq!(response.places[0].city, "Kolkata");
    }
}
