//! Per-query defaults for the route planner.

use crate::domain::{Mode, ScoringWeights};
use crate::kpi::RoadKpiParams;

/// Upper bound on alternatives requested per mode.
pub const MAX_ALT_TARGET: usize = 8;

/// Alternatives per mode when the caller does not say.
pub const DEFAULT_ALT_TARGET: usize = 4;

/// Defaults applied to fields a query leaves unset.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDefaults {
    /// Alternatives per mode.
    pub alt_target: usize,

    /// Modes to plan for.
    pub modes: Vec<Mode>,

    /// Ask road providers to avoid tollways.
    pub avoid_tollways: bool,

    /// Fuel and CO₂ parameters for road KPIs.
    pub road: RoadKpiParams,

    /// KPI weights for scoring.
    pub weights: ScoringWeights,
}

impl QueryDefaults {
    /// Create defaults with the given parameters.
    ///
    /// `alt_target` is clamped to [`MAX_ALT_TARGET`].
    pub fn new(
        alt_target: usize,
        modes: Vec<Mode>,
        avoid_tollways: bool,
        road: RoadKpiParams,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            alt_target: alt_target.min(MAX_ALT_TARGET),
            modes,
            avoid_tollways,
            road,
            weights,
        }
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            alt_target: DEFAULT_ALT_TARGET,
            modes: Mode::ALL.to_vec(),
            avoid_tollways: false,
            road: RoadKpiParams::default(),
            weights: ScoringWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let defaults = QueryDefaults::default();

        assert_eq!(defaults.alt_target, 4);
        assert_eq!(defaults.modes, [Mode::Road, Mode::Rail, Mode::Flight]);
        assert!(!defaults.avoid_tollways);
        assert_eq!(defaults.road, RoadKpiParams::new(15.0, 110.0, 120.0));
        assert_eq!(defaults.weights, ScoringWeights::default());
    }

    #[test]
    fn custom_config_clamps_alternatives() {
        let defaults = QueryDefaults::new(
            20,
            vec![Mode::Rail],
            true,
            RoadKpiParams::default(),
            ScoringWeights::default(),
        );

        assert_eq!(defaults.alt_target, MAX_ALT_TARGET);
        assert_eq!(defaults.modes, [Mode::Rail]);
        assert!(defaults.avoid_tollways);
    }
}
