pub use shared::{
    ApiError, Coordinate, GeocodeResult, RankedRoute, RouteSearchRequest, VehicleClass,
};

/// A single route as reported by the directions provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoute {
    pub geometry: String,
    pub distance_km: f64,
    pub duration_min: f64,
}
