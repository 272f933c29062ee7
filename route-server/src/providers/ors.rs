//! OpenRouteService directions client.
//!
//! Uses the GeoJSON flavour of the driving-car directions endpoint, which
//! returns one `Feature` per alternative with a `[lon, lat]` line geometry.

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::error::ProviderError;
use super::types::{RawGeometry, RawPath, RawStep, RoadProvider, RoadRequest, first_label};
use crate::geo::haversine_km;

/// Default base URL for the OpenRouteService API.
const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Alternatives are only requested for trips up to this crow-flies length;
/// the service refuses them for longer routes.
const DEFAULT_ALTERNATIVES_MAX_KM: f64 = 100.0;

const PROVIDER_NAME: &str = "openrouteservice";

/// Configuration for the OpenRouteService client.
#[derive(Debug, Clone)]
pub struct OrsConfig {
    /// API key sent in the `Authorization` header
    pub api_key: String,
    /// Base URL for the API (defaults to the public service)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Longest crow-flies distance for which alternatives are requested
    pub alternatives_max_km: f64,
}

impl OrsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            alternatives_max_km: DEFAULT_ALTERNATIVES_MAX_KM,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OpenRouteService API client.
#[derive(Debug, Clone)]
pub struct OrsClient {
    http: reqwest::Client,
    base_url: String,
    alternatives_max_km: f64,
}

impl OrsClient {
    /// Create a new client.
    ///
    /// Fails with [`ProviderError::NotConfigured`] when the API key is empty.
    pub fn new(config: OrsConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured("missing ORS_API_KEY".into()));
        }

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| ProviderError::Api {
            status: 0,
            message: "Invalid API key format".to_string(),
        })?;
        headers.insert(AUTHORIZATION, api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            alternatives_max_km: config.alternatives_max_km,
        })
    }

    /// Request driving directions.
    ///
    /// Alternatives are requested only for short trips. If the service
    /// rejects an alternatives request with 400, it is retried once as a
    /// plain fastest-route request.
    pub async fn directions(&self, request: &RoadRequest) -> Result<Vec<RawPath>, ProviderError> {
        let crow_km = haversine_km(request.origin, request.destination);
        let use_alternatives = crow_km <= self.alternatives_max_km;

        let mut response = self
            .post(&request_body(request, use_alternatives))
            .await?;

        if response.status() == StatusCode::BAD_REQUEST && use_alternatives {
            info!(crow_km, "ORS rejected alternatives request, retrying without");
            response = self.post(&request_body(request, false)).await?;
        }

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::Unauthorized);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let collection: OrsFeatureCollection =
            serde_json::from_str(&body).map_err(|e| ProviderError::json(&e, &body))?;

        let paths = convert_features(collection, request.alt_count);
        debug!(paths = paths.len(), crow_km, "ORS directions parsed");
        Ok(paths)
    }

    async fn post(&self, body: &Value) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/v2/directions/driving-car/geojson", self.base_url);
        Ok(self.http.post(&url).json(body).send().await?)
    }
}

impl RoadProvider for OrsClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch<'a>(
        &'a self,
        request: &'a RoadRequest,
    ) -> BoxFuture<'a, Result<Vec<RawPath>, ProviderError>> {
        self.directions(request).boxed()
    }
}

/// Build the directions request body.
fn request_body(request: &RoadRequest, with_alternatives: bool) -> Value {
    let preference = if with_alternatives {
        "recommended"
    } else {
        "fastest"
    };

    let mut body = json!({
        "coordinates": [
            [request.origin.lon, request.origin.lat],
            [request.destination.lon, request.destination.lat],
        ],
        "instructions": true,
        "preference": preference,
    });

    if with_alternatives {
        body["alternative_routes"] = json!({
            "share_factor": 0.6,
            "target_count": request.alt_count.max(1),
            "weight_factor": 1.4,
        });
    }

    if request.avoid_tollways {
        body["options"] = json!({ "avoid_features": ["tollways"] });
    }

    body
}

/// Pull a human-readable message out of an ORS error body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

fn convert_features(collection: OrsFeatureCollection, limit: usize) -> Vec<RawPath> {
    collection
        .features
        .into_iter()
        .take(limit)
        .map(|feature| {
            let steps = feature
                .properties
                .segments
                .into_iter()
                .flat_map(|segment| segment.steps)
                .map(|step| RawStep {
                    name: first_label([step.name.as_deref(), step.instruction.as_deref()]),
                    instruction: step.instruction.unwrap_or_default(),
                    distance_m: step.distance,
                    duration_s: step.duration,
                })
                .collect();

            let positions = feature
                .geometry
                .coordinates
                .into_iter()
                .filter_map(|p| match p.as_slice() {
                    [lon, lat, ..] => Some([*lon, *lat]),
                    _ => None,
                })
                .collect();

            RawPath {
                distance_m: feature.properties.summary.distance,
                duration_s: feature.properties.summary.duration,
                geometry: RawGeometry::GeoJsonLine(positions),
                steps,
                provider: PROVIDER_NAME.to_string(),
            }
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrsFeatureCollection {
    features: Vec<OrsFeature>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrsFeature {
    properties: OrsProperties,
    geometry: OrsGeometry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrsProperties {
    summary: OrsSummary,
    segments: Vec<OrsSegment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrsSummary {
    distance: f64,
    duration: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrsSegment {
    steps: Vec<OrsStep>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrsStep {
    name: Option<String>,
    instruction: Option<String>,
    distance: f64,
    duration: f64,
}

/// Positions may carry a third (elevation) element.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrsGeometry {
    coordinates: Vec<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ESPLANADE: Coordinate = Coordinate::new(22.5667, 88.3667);
    const SALT_LAKE: Coordinate = Coordinate::new(22.5792, 88.4317);
    const DELHI: Coordinate = Coordinate::new(28.6315, 77.2167);

    fn feature_collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "properties": {
                        "summary": { "distance": 8123.4, "duration": 1260.0 },
                        "segments": [{
                            "steps": [
                                { "name": "-", "instruction": "Head east", "distance": 120.0, "duration": 30.0 },
                                { "name": "EM Bypass", "instruction": "Turn left onto EM Bypass", "distance": 8003.4, "duration": 1230.0 }
                            ]
                        }]
                    },
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[88.3667, 22.5667, 9.0], [88.4317, 22.5792, 7.5]]
                    }
                },
                {
                    "properties": { "summary": { "distance": 9000.0 } },
                    "geometry": { "type": "LineString", "coordinates": [] }
                }
            ]
        })
    }

    fn client_for(server: &MockServer) -> OrsClient {
        OrsClient::new(OrsConfig::new("test-key").with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = OrsConfig::new("k");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.alternatives_max_km, 100.0);
    }

    #[test]
    fn empty_key_is_not_configured() {
        assert!(matches!(
            OrsClient::new(OrsConfig::new("  ")),
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[test]
    fn body_with_alternatives_and_tolls() {
        let request = RoadRequest::new(ESPLANADE, SALT_LAKE, 4).with_avoid_tollways(true);
        let body = request_body(&request, true);

        assert_eq!(body["coordinates"][0][0], 88.3667);
        assert_eq!(body["coordinates"][0][1], 22.5667);
        assert_eq!(body["preference"], "recommended");
        assert_eq!(body["alternative_routes"]["target_count"], 4);
        assert_eq!(body["options"]["avoid_features"][0], "tollways");
    }

    #[test]
    fn body_without_alternatives() {
        let request = RoadRequest::new(ESPLANADE, DELHI, 0);
        let body = request_body(&request, false);

        assert_eq!(body["preference"], "fastest");
        assert!(body.get("alternative_routes").is_none());
        assert!(body.get("options").is_none());
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error": {"code": 2004, "message": "too far"}}"#),
            "too far"
        );
        assert_eq!(error_message(r#"{"error": "quota"}"#), "quota");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }

    #[tokio::test]
    async fn parses_features() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/directions/driving-car/geojson"))
            .and(header("authorization", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let paths = client
            .directions(&RoadRequest::new(ESPLANADE, SALT_LAKE, 4))
            .await
            .unwrap();

        assert_eq!(paths.len(), 2);
        let first = &paths[0];
        assert_eq!(first.distance_m, 8123.4);
        assert_eq!(first.duration_s, 1260.0);
        assert_eq!(first.provider, "openrouteservice");
        assert_eq!(first.steps.len(), 2);
        // Unnamed road falls back to the instruction text.
        assert_eq!(first.steps[0].name, "Head east");
        assert_eq!(first.steps[1].name, "EM Bypass");
        assert_eq!(
            first.geometry.to_coordinates().unwrap(),
            vec![ESPLANADE, SALT_LAKE]
        );

        // Missing fields default.
        assert_eq!(paths[1].duration_s, 0.0);
        assert!(paths[1].steps.is_empty());
    }

    #[tokio::test]
    async fn caps_at_requested_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let paths = client
            .directions(&RoadRequest::new(ESPLANADE, SALT_LAKE, 1))
            .await
            .unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[tokio::test]
    async fn retries_without_alternatives_on_400() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "preference": "recommended" })))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad alternatives"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "preference": "fastest" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let paths = client
            .directions(&RoadRequest::new(ESPLANADE, SALT_LAKE, 4))
            .await
            .unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[tokio::test]
    async fn long_trips_skip_alternatives() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "preference": "fastest" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(feature_collection()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let paths = client
            .directions(&RoadRequest::new(ESPLANADE, DELHI, 4))
            .await
            .unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[tokio::test]
    async fn maps_status_codes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .directions(&RoadRequest::new(ESPLANADE, DELHI, 4))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unauthorized));
    }

    #[tokio::test]
    async fn server_error_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "error": { "message": "routing failed" } })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        match client
            .directions(&RoadRequest::new(ESPLANADE, DELHI, 4))
            .await
        {
            Err(ProviderError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "routing failed");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .directions(&RoadRequest::new(ESPLANADE, DELHI, 4))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Json { .. }));
    }
}
