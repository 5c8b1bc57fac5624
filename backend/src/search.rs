use std::time::Duration;

use crate::acquisition::acquire_routes;
use crate::directions::DirectionsProvider;
use crate::error::SearchError;
use crate::fallback::{demo_routes, fallback_routes};
use crate::models::{Coordinate, RankedRoute, RouteSearchRequest, VehicleClass};
use crate::ranking::rank_routes;
use crate::selection::{ScoredRoute, normalize_candidates};

/// Route search pipeline: acquisition, scoring, normalization, ranking.
///
/// Without a provider the search runs in demo mode and answers with the
/// canned demo set after `demo_delay`.
pub struct RouteSearch<P> {
    provider: Option<P>,
    demo_delay: Duration,
}

impl<P: DirectionsProvider> RouteSearch<P> {
    pub fn live(provider: P) -> Self {
        Self {
            provider: Some(provider),
            demo_delay: Duration::ZERO,
        }
    }

    pub fn demo(demo_delay: Duration) -> Self {
        Self {
            provider: None,
            demo_delay,
        }
    }

    pub fn is_live(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn search_routes(
        &self,
        start: Coordinate,
        end: Coordinate,
        vehicle: VehicleClass,
    ) -> Result<Vec<RankedRoute>, SearchError> {
        let Some(provider) = &self.provider else {
            tracing::warn!("directions provider not configured, serving demo routes");
            tokio::time::sleep(self.demo_delay).await;
            return Ok(demo_routes());
        };

        let acquisition = acquire_routes(provider, start, end).await;
        if acquisition.is_empty() {
            return Err(SearchError::AcquisitionFailed {
                failures: acquisition.failures,
            });
        }

        let scored = acquisition
            .routes
            .into_iter()
            .map(|(leg, route)| ScoredRoute::score(leg, route, vehicle))
            .collect();
        let ranked = rank_routes(normalize_candidates(scored));

        tracing::info!(
            "ranked {} route(s) for {} vehicle, best {:.2} kg CO₂",
            ranked.len(),
            vehicle.as_str(),
            ranked.first().map_or(0.0, |r| r.emissions_kg)
        );
        Ok(ranked)
    }

    /// Never fails on provider trouble: a total acquisition failure is logged
    /// and replaced by the canned fallback set.
    pub async fn search_or_fallback(
        &self,
        start: Coordinate,
        end: Coordinate,
        vehicle: VehicleClass,
    ) -> Vec<RankedRoute> {
        match self.search_routes(start, end, vehicle).await {
            Ok(routes) => routes,
            Err(err) => {
                tracing::error!("route search failed, serving fallback routes: {err}");
                fallback_routes()
            }
        }
    }
}

pub fn require_endpoints(req: &RouteSearchRequest) -> Result<(Coordinate, Coordinate), SearchError> {
    let start = req.start.ok_or(SearchError::MissingInput("start"))?;
    let end = req.end.ok_or(SearchError::MissingInput("end"))?;
    Ok((start, end))
}
