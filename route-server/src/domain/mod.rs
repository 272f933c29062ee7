//! Domain types for the route optimizer.
//!
//! Candidates from every mode share one KPI-bearing record so the scoring
//! engine can compare them directly; mode-specific data (provider, road names,
//! hub pairs) lives in the [`ModeDetail`] variant.

mod candidate;
mod mode;
mod weights;

pub use candidate::{HubPair, Kpis, ModeDetail, RouteCandidate, Step};
pub(crate) use candidate::non_negative;
pub use mode::{InvalidMode, Mode, normalize_modes, parse_mode_list};
pub use weights::{DEFAULT_WEIGHT, InvalidKpi, Kpi, ScoringWeights};
