//! CO₂ model for a driven route.
//!
//! ```text
//! expected_min = distance_km / 50 km/h * 60
//! delay        = clamp(duration_min / expected_min - 1, 0, 0.6)
//! congestion   = 1 + delay * traffic_sensitivity(vehicle)
//! emissions_kg = distance_km * base_factor(vehicle) * congestion
//! ```

use crate::models::VehicleClass;

/// Free-flow speed used to derive the expected travel time.
pub const REFERENCE_SPEED_KMH: f64 = 50.0;
/// Maximum extra consumption attributed to traffic (+60%).
pub const MAX_DELAY_RATIO: f64 = 0.6;
/// Share of the congestion penalty felt by vehicles with regenerative braking.
pub const REGENERATIVE_TRAFFIC_SENSITIVITY: f64 = 0.3;
/// Float noise below this many decimals is discarded before the final rounding.
const NOISE_DECIMALS: i32 = 6;

/// kg CO₂ per km.
pub fn base_factor(vehicle: VehicleClass) -> f64 {
    match vehicle {
        VehicleClass::Gasoline => 0.192,
        VehicleClass::Diesel => 0.171,
        VehicleClass::Suv => 0.255,
        VehicleClass::Hybrid => 0.108,
        VehicleClass::Electric => 0.045,
    }
}

pub fn traffic_sensitivity(vehicle: VehicleClass) -> f64 {
    match vehicle {
        VehicleClass::Electric | VehicleClass::Hybrid => REGENERATIVE_TRAFFIC_SENSITIVITY,
        VehicleClass::Gasoline | VehicleClass::Diesel | VehicleClass::Suv => 1.0,
    }
}

pub fn expected_duration_min(distance_km: f64) -> f64 {
    distance_km / REFERENCE_SPEED_KMH * 60.0
}

pub fn congestion_factor(distance_km: f64, duration_min: f64, vehicle: VehicleClass) -> f64 {
    let expected = expected_duration_min(distance_km);
    let delay_ratio = if expected > 0.0 {
        duration_min / expected - 1.0
    } else {
        0.0
    };

    1.0 + delay_ratio.clamp(0.0, MAX_DELAY_RATIO) * traffic_sensitivity(vehicle)
}

/// Estimated kg of CO₂ for the trip, rounded to 2 decimals.
///
/// Inputs are not validated: negative values flow through the arithmetic.
///
/// Inside the congested band distance cancels out of the product; the raw value
/// is snapped to `NOISE_DECIMALS` first so equal products round alike.
pub fn estimate_emissions(distance_km: f64, duration_min: f64, vehicle: VehicleClass) -> f64 {
    let raw = distance_km * base_factor(vehicle) * congestion_factor(distance_km, duration_min, vehicle);
    round_to(round_to(raw, NOISE_DECIMALS), 2)
}

/// Percentage of CO₂ saved against the worst route of the same result set.
pub fn calculate_savings(current_kg: f64, worst_kg: f64) -> u32 {
    if worst_kg == 0.0 {
        return 0;
    }
    let savings = ((worst_kg - current_kg) / worst_kg * 100.0).round();
    savings.clamp(0.0, 100.0) as u32
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
