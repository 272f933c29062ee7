//! KPIs and the weights that combine them into a score.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

/// Weight used for any KPI the caller leaves unset.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Error returned when parsing an unknown KPI name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown KPI: {0:?}")]
pub struct InvalidKpi(pub String);

/// One of the four key performance indicators every candidate carries.
///
/// All four are cost-like: a larger value is always worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kpi {
    Distance,
    Duration,
    Cost,
    Emissions,
}

impl Kpi {
    /// Every KPI, in column order.
    pub const ALL: [Kpi; 4] = [Kpi::Distance, Kpi::Duration, Kpi::Cost, Kpi::Emissions];

    /// Position of this KPI in a `[f64; 4]` column array.
    pub const fn index(self) -> usize {
        match self {
            Kpi::Distance => 0,
            Kpi::Duration => 1,
            Kpi::Cost => 2,
            Kpi::Emissions => 3,
        }
    }

    /// Canonical column name, including the unit.
    pub fn column_name(&self) -> &'static str {
        match self {
            Kpi::Distance => "distance_km",
            Kpi::Duration => "duration_min",
            Kpi::Cost => "cost_inr",
            Kpi::Emissions => "emissions_kg",
        }
    }
}

impl fmt::Display for Kpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Kpi {
    type Err = InvalidKpi;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance_km" | "distance" => Ok(Kpi::Distance),
            "duration_min" | "duration" | "time" => Ok(Kpi::Duration),
            "cost_inr" | "cost" => Ok(Kpi::Cost),
            "emissions_kg" | "emissions" | "co2" => Ok(Kpi::Emissions),
            _ => Err(InvalidKpi(s.to_string())),
        }
    }
}

/// Non-negative weight per KPI.
///
/// Every setter clamps: negative, NaN and infinite weights are stored as 0,
/// which removes that KPI from the score. A zero weight is legitimate and
/// never an error.
///
/// # Examples
///
/// ```
/// use route_server::domain::{Kpi, ScoringWeights};
///
/// let weights = ScoringWeights::default().with(Kpi::Cost, 2.5).with(Kpi::Duration, -1.0);
/// assert_eq!(weights.get(Kpi::Cost), 2.5);
/// assert_eq!(weights.get(Kpi::Duration), 0.0);
/// assert_eq!(weights.get(Kpi::Distance), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    distance_km: f64,
    duration_min: f64,
    cost_inr: f64,
    emissions_kg: f64,
}

impl ScoringWeights {
    /// Weights for all four KPIs, clamped.
    pub fn new(distance: f64, duration: f64, cost: f64, emissions: f64) -> Self {
        Self::default()
            .with(Kpi::Distance, distance)
            .with(Kpi::Duration, duration)
            .with(Kpi::Cost, cost)
            .with(Kpi::Emissions, emissions)
    }

    /// Build from a partial mapping; unset KPIs keep [`DEFAULT_WEIGHT`].
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Kpi, f64)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |weights, (kpi, w)| weights.with(kpi, w))
    }

    /// Return a copy with one weight replaced.
    pub fn with(mut self, kpi: Kpi, weight: f64) -> Self {
        let weight = clamp_weight(kpi, weight);
        match kpi {
            Kpi::Distance => self.distance_km = weight,
            Kpi::Duration => self.duration_min = weight,
            Kpi::Cost => self.cost_inr = weight,
            Kpi::Emissions => self.emissions_kg = weight,
        }
        self
    }

    pub fn get(&self, kpi: Kpi) -> f64 {
        match kpi {
            Kpi::Distance => self.distance_km,
            Kpi::Duration => self.duration_min,
            Kpi::Cost => self.cost_inr,
            Kpi::Emissions => self.emissions_kg,
        }
    }

    /// Weights in column order.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.distance_km,
            self.duration_min,
            self.cost_inr,
            self.emissions_kg,
        ]
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            distance_km: DEFAULT_WEIGHT,
            duration_min: DEFAULT_WEIGHT,
            cost_inr: DEFAULT_WEIGHT,
            emissions_kg: DEFAULT_WEIGHT,
        }
    }
}

fn clamp_weight(kpi: Kpi, weight: f64) -> f64 {
    if weight.is_finite() && weight >= 0.0 {
        weight
    } else {
        warn!(%kpi, weight, "clamping invalid scoring weight to 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_one() {
        let w = ScoringWeights::default();
        for kpi in Kpi::ALL {
            assert_eq!(w.get(kpi), 1.0);
        }
    }

    #[test]
    fn partial_mapping_keeps_defaults() {
        let w = ScoringWeights::from_pairs([(Kpi::Emissions, 3.0)]);
        assert_eq!(w.as_array(), [1.0, 1.0, 1.0, 3.0]);
    }

    #[test]
    fn invalid_weights_clamp_to_zero() {
        let w = ScoringWeights::new(-2.0, f64::NAN, f64::INFINITY, 0.0);
        assert_eq!(w.as_array(), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn kpi_names() {
        assert_eq!("time".parse::<Kpi>().unwrap(), Kpi::Duration);
        assert_eq!("CO2".parse::<Kpi>().unwrap(), Kpi::Emissions);
        assert_eq!("cost_inr".parse::<Kpi>().unwrap(), Kpi::Cost);
        assert!("comfort".parse::<Kpi>().is_err());
    }

    #[test]
    fn index_matches_all_order() {
        for (i, kpi) in Kpi::ALL.iter().enumerate() {
            assert_eq!(kpi.index(), i);
        }
    }
}
