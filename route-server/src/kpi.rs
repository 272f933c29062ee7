//! Per-mode cost, time and emissions models.
//!
//! Road uses the real routed distance and user-tunable vehicle parameters.
//! Rail and flight use constant-speed models over the hub-to-hub distance.
//!
//! Results are rounded (cost to 2 decimals, emissions to 3, durations to 2).
//! The rounding is half-away-from-zero and is part of the observable output.

use serde::{Deserialize, Serialize};

use crate::domain::Mode;

/// Floor applied to fuel economy and speeds before dividing by them.
pub const FUEL_ECONOMY_EPSILON: f64 = 1e-4;

/// Decimals kept for currency amounts.
pub const COST_DECIMALS: i32 = 2;
/// Decimals kept for kilograms of CO₂.
pub const EMISSIONS_DECIMALS: i32 = 3;
/// Decimals kept for kilometres and minutes.
pub const DISTANCE_DECIMALS: i32 = 2;

/// Round `value` to `decimals` places, half away from zero.
///
/// ```
/// use route_server::kpi::round_to;
///
/// assert_eq!(round_to(1.005, 2), 1.0); // 1.005 is stored as 1.00499...
/// assert_eq!(round_to(2.675_1, 2), 2.68);
/// assert_eq!(round_to(-0.5, 0), -1.0);
/// ```
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Tunable parameters of the road vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadKpiParams {
    /// Kilometres per litre.
    pub fuel_economy_kmpl: f64,
    /// Price per litre.
    pub fuel_price: f64,
    /// Tailpipe CO₂ in grams per kilometre.
    pub co2_g_per_km: f64,
}

impl RoadKpiParams {
    pub fn new(fuel_economy_kmpl: f64, fuel_price: f64, co2_g_per_km: f64) -> Self {
        Self {
            fuel_economy_kmpl,
            fuel_price,
            co2_g_per_km,
        }
    }

    /// Clamp out-of-range values: fuel economy to the epsilon floor, price
    /// and CO₂ rate to zero.
    pub fn clamped(self) -> Self {
        Self {
            fuel_economy_kmpl: floor_epsilon(self.fuel_economy_kmpl),
            fuel_price: non_negative(self.fuel_price),
            co2_g_per_km: non_negative(self.co2_g_per_km),
        }
    }
}

impl Default for RoadKpiParams {
    fn default() -> Self {
        Self {
            fuel_economy_kmpl: 15.0,
            fuel_price: 110.0,
            co2_g_per_km: 120.0,
        }
    }
}

/// Cost and emissions of driving `distance_km`.
///
/// Returns `(cost, emissions_kg)`. Negative distances count as zero.
pub fn road_cost_emissions(distance_km: f64, params: &RoadKpiParams) -> (f64, f64) {
    let params = params.clamped();
    let distance = non_negative(distance_km);

    let litres = distance / params.fuel_economy_kmpl;
    let cost = litres * params.fuel_price;
    let emissions_kg = params.co2_g_per_km * distance / 1000.0;

    (
        round_to(cost, COST_DECIMALS),
        round_to(emissions_kg, EMISSIONS_DECIMALS),
    )
}

/// Constant-speed model for a hub-based mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeModel {
    pub speed_kmph: f64,
    pub cost_per_km: f64,
    pub co2_g_per_km: f64,
}

impl ModeModel {
    pub const RAIL: ModeModel = ModeModel {
        speed_kmph: 70.0,
        cost_per_km: 0.8,
        co2_g_per_km: 30.0,
    };

    pub const FLIGHT: ModeModel = ModeModel {
        speed_kmph: 650.0,
        cost_per_km: 6.0,
        co2_g_per_km: 120.0,
    };

    /// Estimate `(duration_min, cost, emissions_kg)` for a trip.
    pub fn estimate(&self, distance_km: f64) -> (f64, f64, f64) {
        let distance = non_negative(distance_km);
        let speed = floor_epsilon(self.speed_kmph);

        let duration_min = distance / speed * 60.0;
        let cost = distance * non_negative(self.cost_per_km);
        let emissions_kg = non_negative(self.co2_g_per_km) * distance / 1000.0;

        (
            round_to(duration_min, DISTANCE_DECIMALS),
            round_to(cost, COST_DECIMALS),
            round_to(emissions_kg, EMISSIONS_DECIMALS),
        )
    }
}

/// Models for the hub-based modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeModels {
    pub rail: ModeModel,
    pub flight: ModeModel,
}

impl ModeModels {
    /// The model for `mode`, or `None` for road, which is not hub-based.
    pub fn for_mode(&self, mode: Mode) -> Option<&ModeModel> {
        match mode {
            Mode::Road => None,
            Mode::Rail => Some(&self.rail),
            Mode::Flight => Some(&self.flight),
        }
    }
}

impl Default for ModeModels {
    fn default() -> Self {
        Self {
            rail: ModeModel::RAIL,
            flight: ModeModel::FLIGHT,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    crate::domain::non_negative(value)
}

fn floor_epsilon(value: f64) -> f64 {
    if value.is_finite() {
        value.max(FUEL_ECONOMY_EPSILON)
    } else {
        FUEL_ECONOMY_EPSILON
    }
}
