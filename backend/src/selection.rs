use std::collections::HashSet;

use crate::acquisition::Leg;
use crate::emissions::{estimate_emissions, round_to};
use crate::models::{RawRoute, VehicleClass};

pub const ECO_VARIANT_DURATION_FACTOR: f64 = 1.15;
pub const ECO_VARIANT_EMISSIONS_FACTOR: f64 = 0.9;
pub const CONGESTED_VARIANT_DURATION_FACTOR: f64 = 0.95;
pub const CONGESTED_VARIANT_EMISSIONS_FACTOR: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOrigin {
    Provider(Leg),
    /// Derived from a lone provider route; same geometry, perturbed numbers.
    EcoLeaning,
    Congested,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRoute {
    pub route: RawRoute,
    pub emissions_kg: f64,
    /// Distance rounded to the whole kilometre.
    pub dedup_key: i64,
    pub origin: RouteOrigin,
}

impl ScoredRoute {
    pub fn score(leg: Leg, route: RawRoute, vehicle: VehicleClass) -> Self {
        let emissions_kg = estimate_emissions(route.distance_km, route.duration_min, vehicle);
        Self {
            dedup_key: route.distance_km.round() as i64,
            emissions_kg,
            route,
            origin: RouteOrigin::Provider(leg),
        }
    }

    fn variant(&self, origin: RouteOrigin, duration_factor: f64, emissions_factor: f64) -> Self {
        Self {
            route: RawRoute {
                geometry: self.route.geometry.clone(),
                distance_km: self.route.distance_km,
                duration_min: self.route.duration_min * duration_factor,
            },
            emissions_kg: round_to(self.emissions_kg * emissions_factor, 2),
            dedup_key: self.dedup_key,
            origin,
        }
    }
}

/// Keep the first route seen for every rounded distance.
pub fn dedup_by_distance(candidates: &[ScoredRoute]) -> Vec<ScoredRoute> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|candidate| seen.insert(candidate.dedup_key))
        .cloned()
        .collect()
}

/// Two estimates around a single real route so there is always something to compare.
pub fn synthesize_variants(source: ScoredRoute) -> Vec<ScoredRoute> {
    let eco = source.variant(
        RouteOrigin::EcoLeaning,
        ECO_VARIANT_DURATION_FACTOR,
        ECO_VARIANT_EMISSIONS_FACTOR,
    );
    let congested = source.variant(
        RouteOrigin::Congested,
        CONGESTED_VARIANT_DURATION_FACTOR,
        CONGESTED_VARIANT_EMISSIONS_FACTOR,
    );
    vec![source, eco, congested]
}

pub fn normalize_candidates(candidates: Vec<ScoredRoute>) -> Vec<ScoredRoute> {
    let mut distinct = dedup_by_distance(&candidates);
    let dropped = candidates.len() - distinct.len();
    if distinct.is_empty() {
        distinct = candidates;
    } else if dropped > 0 {
        tracing::debug!("dropped {dropped} near-duplicate route(s)");
    }

    if distinct.len() == 1 {
        tracing::debug!("single distinct route, synthesizing eco and congested variants");
        return synthesize_variants(distinct.remove(0));
    }
    distinct
}
