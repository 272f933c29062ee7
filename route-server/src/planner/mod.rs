//! Multi-modal route planner.
//!
//! This module answers: "Between these two points, which way should I go?"
//!
//! Road candidates come from a [`RoadProvider`](crate::providers::RoadProvider);
//! rail and flight candidates are synthesised from hub catalogs. All
//! candidates are then scored together on distance, time, cost and
//! emissions, and the lowest score is recommended.

mod config;
mod hub_routes;
mod query;
mod road;
mod score;

pub use config::{DEFAULT_ALT_TARGET, MAX_ALT_TARGET, QueryDefaults};
pub use hub_routes::build_hub_routes;
pub use query::{Planner, QueryError, QueryOutcome, RouteQuery, RouteRecord};
pub use road::{MAX_SUMMARY_NAMES, build_road_routes};
pub use score::{ScoredBatch, ScoredRoute, Tag, min_max_normalize, score_candidates};
