//! Fixed route sets served when live routing is unavailable.

use crate::models::RankedRoute;
use crate::ranking::{ECO_DESCRIPTION, ECO_LABEL};

/// Straight two-point polyline, enough for a map to draw something.
pub const PLACEHOLDER_GEOMETRY: &str = "_p~iF~ps|U_ulLnnqC";

/// Served when no directions credential is configured.
pub fn demo_routes() -> Vec<RankedRoute> {
    vec![
        RankedRoute {
            id: "mock-eco".into(),
            geometry: PLACEHOLDER_GEOMETRY.into(),
            distance_km: 12.5,
            duration_min: 18,
            emissions_kg: 2.4,
            savings_percent: 25,
            is_ecofriendly: true,
            is_fastest: false,
            label: ECO_LABEL.into(),
            description: ECO_DESCRIPTION.into(),
        },
        RankedRoute {
            id: "mock-fast".into(),
            geometry: PLACEHOLDER_GEOMETRY.into(),
            distance_km: 14.2,
            duration_min: 15,
            emissions_kg: 3.2,
            savings_percent: 0,
            is_ecofriendly: false,
            is_fastest: true,
            label: "Fastest".into(),
            description: "High traffic zone".into(),
        },
    ]
}

/// Served when every directions request failed.
pub fn fallback_routes() -> Vec<RankedRoute> {
    vec![RankedRoute {
        id: "fallback-mock".into(),
        geometry: PLACEHOLDER_GEOMETRY.into(),
        distance_km: 12.5,
        duration_min: 18,
        emissions_kg: 2.4,
        savings_percent: 0,
        is_ecofriendly: true,
        is_fastest: true,
        label: ECO_LABEL.into(),
        description: ECO_DESCRIPTION.into(),
    }]
}
