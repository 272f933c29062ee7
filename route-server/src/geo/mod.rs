//! Geographic primitives.
//!
//! Coordinates are plain WGS-84 latitude/longitude pairs in degrees. Routing
//! providers hand geometry back in several shapes (explicit coordinate lists,
//! GeoJSON lines with swapped axes, encoded polylines); this module owns the
//! conversions so the rest of the crate only sees [`Coordinate`] sequences.

mod coordinate;
mod polyline;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM, haversine_km};
pub use polyline::{PolylineError, decode_polyline5};
