//! Provider-agnostic request and raw path types.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use crate::geo::{Coordinate, PolylineError, decode_polyline5};

/// What the core asks a road provider for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    /// Target number of alternative paths. Providers may return fewer.
    pub alt_count: usize,
    pub avoid_tollways: bool,
}

impl RoadRequest {
    pub fn new(origin: Coordinate, destination: Coordinate, alt_count: usize) -> Self {
        Self {
            origin,
            destination,
            alt_count,
            avoid_tollways: false,
        }
    }

    pub fn with_avoid_tollways(mut self, avoid: bool) -> Self {
        self.avoid_tollways = avoid;
        self
    }
}

/// Path geometry in whichever shape the provider returned it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawGeometry {
    /// Explicit `(lat, lon)` coordinates.
    Coordinates(Vec<Coordinate>),
    /// Precision-5 encoded polyline.
    Polyline5(String),
    /// GeoJSON `LineString` positions, `[lon, lat]` order.
    GeoJsonLine(Vec<[f64; 2]>),
    #[default]
    Missing,
}

impl RawGeometry {
    /// Resolve to `(lat, lon)` coordinates, decoding or axis-swapping as needed.
    pub fn to_coordinates(&self) -> Result<Vec<Coordinate>, PolylineError> {
        match self {
            RawGeometry::Coordinates(coords) => Ok(coords.clone()),
            RawGeometry::Polyline5(encoded) => decode_polyline5(encoded),
            RawGeometry::GeoJsonLine(positions) => Ok(positions
                .iter()
                .copied()
                .map(Coordinate::from_lon_lat)
                .collect()),
            RawGeometry::Missing => Ok(Vec::new()),
        }
    }
}

/// One turn-by-turn step as reported by a provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStep {
    /// Road or location label; providers fall back to other fields when the
    /// road is unnamed.
    pub name: String,
    pub instruction: String,
    pub distance_m: f64,
    pub duration_s: f64,
}

/// One path returned by a provider, before KPIs are attached.
///
/// Every field defaults, so partially filled provider responses and fixture
/// files still deserialize.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPath {
    pub distance_m: f64,
    pub duration_s: f64,
    pub geometry: RawGeometry,
    pub steps: Vec<RawStep>,
    /// Name of the provider that produced this path.
    pub provider: String,
}

/// A source of road paths.
///
/// The returned future is boxed so providers can sit behind
/// `Arc<dyn RoadProvider>` in a [`ProviderChain`](super::ProviderChain).
pub trait RoadProvider: Send + Sync {
    /// Short identifier used in logs and candidate details.
    fn name(&self) -> &str;

    /// Fetch up to `request.alt_count` paths.
    ///
    /// Zero paths is a valid answer, not an error.
    fn fetch<'a>(
        &'a self,
        request: &'a RoadRequest,
    ) -> BoxFuture<'a, Result<Vec<RawPath>, ProviderError>>;
}

impl<P: RoadProvider + ?Sized> RoadProvider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch<'a>(
        &'a self,
        request: &'a RoadRequest,
    ) -> BoxFuture<'a, Result<Vec<RawPath>, ProviderError>> {
        (**self).fetch(request)
    }
}

/// Pick the first non-empty label, treating `"-"` as empty.
pub(crate) fn first_label<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty() && *s != "-")
        .unwrap_or_default()
        .to_string()
}
