//! Road routing providers.
//!
//! Road candidates come from third-party routing services that are treated
//! as black boxes: each one answers a [`RoadRequest`] with raw paths (distance,
//! duration, geometry, turn steps) or a [`ProviderError`].
//!
//! Providers are composed into a [`ProviderChain`], a ranked list consulted
//! in order until the requested number of alternatives is collected. The
//! chain never fails; a provider error only means fewer paths.
//!
//! Available providers:
//! - [`OrsClient`]: OpenRouteService directions (needs an API key)
//! - [`OsrmClient`]: OSRM `route` service (the public demo server by default)
//! - [`FixtureRoadProvider`]: canned paths for offline development and tests

mod chain;
mod error;
mod fixture;
mod ors;
mod osrm;
mod types;

pub use chain::ProviderChain;
pub use error::ProviderError;
pub use fixture::FixtureRoadProvider;
pub use ors::{OrsClient, OrsConfig};
pub use osrm::{OsrmClient, OsrmConfig};
pub use types::{RawGeometry, RawPath, RawStep, RoadProvider, RoadRequest};
