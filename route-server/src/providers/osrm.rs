//! OSRM `route` service client.

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::error::ProviderError;
use super::types::{RawGeometry, RawPath, RawStep, RoadProvider, RoadRequest, first_label};

/// Public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

const PROVIDER_NAME: &str = "osrm";

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL for the API (defaults to the public demo server)
    pub base_url: String,
    /// Routing profile segment of the URL
    pub profile: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    /// Set a custom base URL (for testing or a self-hosted server).
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

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: "driving".to_string(),
            timeout_secs: 60,
        }
    }
}

/// OSRM HTTP client.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmClient {
    /// Create a new client.
    pub fn new(config: OsrmConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile,
        })
    }

    /// Request a route with alternatives, full overview geometry and steps.
    ///
    /// The demo profile has no tollway switch, so `avoid_tollways` is
    /// ignored here.
    pub async fn route(&self, request: &RoadRequest) -> Result<Vec<RawPath>, ProviderError> {
        if request.avoid_tollways {
            debug!("OSRM ignores the tollway avoidance flag");
        }

        let url = format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            self.profile,
            request.origin.lon,
            request.origin.lat,
            request.destination.lon,
            request.destination.lat,
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("alternatives", "true"),
                ("overview", "full"),
                ("steps", "true"),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::Unauthorized);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: OsrmResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::json(&e, &body))?;

        // OSRM reports some failures (e.g. "NoRoute") with a 200-class body.
        if let Some(code) = parsed.code.as_deref() {
            if code != "Ok" {
                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message: parsed.message.unwrap_or_else(|| code.to_string()),
                });
            }
        }

        let paths = convert_routes(parsed.routes, request.alt_count);
        debug!(paths = paths.len(), "OSRM route parsed");
        Ok(paths)
    }
}

impl RoadProvider for OsrmClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch<'a>(
        &'a self,
        request: &'a RoadRequest,
    ) -> BoxFuture<'a, Result<Vec<RawPath>, ProviderError>> {
        self.route(request).boxed()
    }
}

fn convert_routes(routes: Vec<OsrmRoute>, limit: usize) -> Vec<RawPath> {
    routes
        .into_iter()
        .take(limit)
        .map(|route| {
            let steps = route
                .legs
                .into_iter()
                .flat_map(|leg| leg.steps)
                .map(|step| RawStep {
                    name: first_label([
                        step.name.as_deref(),
                        step.r#ref.as_deref(),
                        step.mode.as_deref(),
                    ]),
                    instruction: step.maneuver.kind.unwrap_or_default(),
                    distance_m: step.distance,
                    duration_s: step.duration,
                })
                .collect();

            let geometry = match route.geometry {
                Some(OsrmGeometry::Encoded(polyline)) => RawGeometry::Polyline5(polyline),
                Some(OsrmGeometry::GeoJson { coordinates }) => RawGeometry::GeoJsonLine(
                    coordinates
                        .into_iter()
                        .filter_map(|p| match p.as_slice() {
                            [lon, lat, ..] => Some([*lon, *lat]),
                            _ => None,
                        })
                        .collect(),
                ),
                None => RawGeometry::Missing,
            };

            RawPath {
                distance_m: route.distance,
                duration_s: route.duration,
                geometry,
                steps,
                provider: PROVIDER_NAME.to_string(),
            }
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OsrmResponse {
    code: Option<String>,
    message: Option<String>,
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: Option<OsrmGeometry>,
    legs: Vec<OsrmLeg>,
}

/// `polyline` (default) or `geojson` geometry, depending on the request.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OsrmGeometry {
    Encoded(String),
    GeoJson { coordinates: Vec<Vec<f64>> },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OsrmLeg {
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OsrmStep {
    name: Option<String>,
    r#ref: Option<String>,
    mode: Option<String>,
    distance: f64,
    duration: f64,
    maneuver: OsrmManeuver,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: Option<String>,
}
