use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
}

impl Coordinate {
    pub fn interpolate(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }

    pub fn offset(self, delta_deg: f64) -> Self {
        Self {
            lat: self.lat + delta_deg,
            lon: self.lon + delta_deg,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    #[default]
    Gasoline,
    Diesel,
    Suv,
    Hybrid,
    Electric,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 5] = [
        VehicleClass::Gasoline,
        VehicleClass::Diesel,
        VehicleClass::Suv,
        VehicleClass::Hybrid,
        VehicleClass::Electric,
    ];

    /// Unknown names fall back to gasoline rather than failing the request.
    pub fn parse_lossy(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "diesel" => VehicleClass::Diesel,
            "suv" => VehicleClass::Suv,
            "hybrid" => VehicleClass::Hybrid,
            "electric" | "ev" => VehicleClass::Electric,
            _ => VehicleClass::Gasoline,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Gasoline => "gasoline",
            VehicleClass::Diesel => "diesel",
            VehicleClass::Suv => "suv",
            VehicleClass::Hybrid => "hybrid",
            VehicleClass::Electric => "electric",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteSearchRequest {
    #[serde(default)]
    pub start: Option<Coordinate>,
    #[serde(default)]
    pub end: Option<Coordinate>,
    #[serde(default, alias = "vehicleType", alias = "vehicle")]
    pub vehicle_type: Option<String>,
}

impl RouteSearchRequest {
    pub fn vehicle_class(&self) -> VehicleClass {
        self.vehicle_type
            .as_deref()
            .map(VehicleClass::parse_lossy)
            .unwrap_or_default()
    }
}

/// One user-facing route option, as returned by `POST /api/routes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRoute {
    pub id: String,
    /// Encoded polyline, passed through untouched from the directions provider
    pub geometry: String,
    #[serde(alias = "distanceKm")]
    pub distance_km: f64,
    #[serde(alias = "durationMin")]
    pub duration_min: u32,
    #[serde(alias = "emissionsKg")]
    pub emissions_kg: f64,
    #[serde(alias = "savingsPercent")]
    pub savings_percent: u32,
    #[serde(alias = "isEcofriendly")]
    pub is_ecofriendly: bool,
    #[serde(alias = "isFastest")]
    pub is_fastest: bool,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
    #[serde(alias = "displayName")]
    pub display_name: String,
}

impl GeocodeResult {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}
