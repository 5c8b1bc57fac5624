use std::fmt;

use crate::directions::{DirectionsError, DirectionsProvider};
use crate::models::{Coordinate, RawRoute};

/// Lateral shift applied to the midpoint to push a detour onto another corridor.
pub const VIA_OFFSET_DEG: f64 = 0.05;

/// One directions request issued for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    /// start → end
    Direct,
    /// start → midpoint + 0.05° → end
    PositiveDetour,
    /// start → midpoint − 0.05° → end
    NegativeDetour,
}

impl Leg {
    pub const ALL: [Leg; 3] = [Leg::Direct, Leg::PositiveDetour, Leg::NegativeDetour];

    pub fn waypoints(self, start: Coordinate, end: Coordinate) -> Vec<Coordinate> {
        let midpoint = start.interpolate(end, 0.5);
        match self {
            Leg::Direct => vec![start, end],
            Leg::PositiveDetour => vec![start, midpoint.offset(VIA_OFFSET_DEG), end],
            Leg::NegativeDetour => vec![start, midpoint.offset(-VIA_OFFSET_DEG), end],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Leg::Direct => "direct",
            Leg::PositiveDetour => "positive-detour",
            Leg::NegativeDetour => "negative-detour",
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
pub struct LegFailure {
    pub leg: Leg,
    pub error: DirectionsError,
}

impl fmt::Display for LegFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.leg, self.error)
    }
}

/// Routes gathered from every leg, in leg order, plus what went wrong.
#[derive(Debug, Default)]
pub struct Acquisition {
    pub routes: Vec<(Leg, RawRoute)>,
    pub failures: Vec<LegFailure>,
}

impl Acquisition {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Issue the direct and both detour requests concurrently.
///
/// Each leg contributes at most its first route. A failed or empty leg is
/// recorded and never cancels its siblings; all three are awaited.
pub async fn acquire_routes<P: DirectionsProvider>(
    provider: &P,
    start: Coordinate,
    end: Coordinate,
) -> Acquisition {
    let (direct, positive, negative) = tokio::join!(
        fetch_leg(provider, Leg::Direct, start, end),
        fetch_leg(provider, Leg::PositiveDetour, start, end),
        fetch_leg(provider, Leg::NegativeDetour, start, end),
    );

    let mut acquisition = Acquisition::default();
    for outcome in [direct, positive, negative] {
        match outcome {
            Ok(route) => acquisition.routes.push(route),
            Err(failure) => {
                if failure.error.is_client_rejection() {
                    tracing::warn!("directions leg {} rejected: {}", failure.leg, failure.error);
                } else {
                    tracing::error!("directions leg {} failed: {}", failure.leg, failure.error);
                }
                acquisition.failures.push(failure);
            }
        }
    }

    tracing::debug!(
        "acquired {} route(s), {} leg(s) failed",
        acquisition.routes.len(),
        acquisition.failures.len()
    );
    acquisition
}

async fn fetch_leg<P: DirectionsProvider>(
    provider: &P,
    leg: Leg,
    start: Coordinate,
    end: Coordinate,
) -> Result<(Leg, RawRoute), LegFailure> {
    let waypoints = leg.waypoints(start, end);
    let routes = provider
        .directions(&waypoints)
        .await
        .map_err(|error| LegFailure { leg, error })?;

    routes
        .into_iter()
        .next()
        .map(|route| (leg, route))
        .ok_or(LegFailure {
            leg,
            error: DirectionsError::NoRoutes,
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Answers by number of waypoints and the via-point latitude sign.
    pub(crate) struct StubProvider {
        pub answers: HashMap<Leg, Result<Vec<RawRoute>, u16>>,
        pub calls: Mutex<Vec<Vec<Coordinate>>>,
    }

    impl StubProvider {
        pub(crate) fn new(answers: impl IntoIterator<Item = (Leg, Result<Vec<RawRoute>, u16>)>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn leg_for(waypoints: &[Coordinate]) -> Leg {
            if waypoints.len() == 2 {
                return Leg::Direct;
            }
            let midpoint = waypoints[0].interpolate(waypoints[2], 0.5);
            if waypoints[1].lat > midpoint.lat {
                Leg::PositiveDetour
            } else {
                Leg::NegativeDetour
            }
        }
    }

    impl DirectionsProvider for StubProvider {
        async fn directions(&self, waypoints: &[Coordinate]) -> Result<Vec<RawRoute>, DirectionsError> {
            self.calls.lock().unwrap().push(waypoints.to_vec());
            match self.answers.get(&Self::leg_for(waypoints)) {
                Some(Ok(routes)) => Ok(routes.clone()),
                Some(Err(status)) if *status < 500 => Err(DirectionsError::Rejected {
                    status: *status,
                    message: "rejected".into(),
                }),
                Some(Err(status)) => Err(DirectionsError::Upstream {
                    status: *status,
                    message: "unavailable".into(),
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    pub(crate) fn raw(distance_km: f64, duration_min: f64) -> RawRoute {
        RawRoute {
            geometry: format!("poly-{distance_km}"),
            distance_km,
            duration_min,
        }
    }

    const BERLIN: Coordinate = Coordinate { lat: 52.52, lon: 13.405 };
    const POTSDAM: Coordinate = Coordinate { lat: 52.3906, lon: 13.0645 };

    #[test]
    fn detours_are_offset_from_midpoint() {
        let positive = Leg::PositiveDetour.waypoints(BERLIN, POTSDAM);
        let negative = Leg::NegativeDetour.waypoints(BERLIN, POTSDAM);
        assert_eq!(positive.len(), 3);
        assert!((positive[1].lat - (52.4553 + 0.05)).abs() < 1e-9);
        assert!((positive[1].lon - (13.23475 + 0.05)).abs() < 1e-9);
        assert!((negative[1].lat - (52.4553 - 0.05)).abs() < 1e-9);
        assert!((negative[1].lon - (13.23475 - 0.05)).abs() < 1e-9);
        assert_eq!(Leg::Direct.waypoints(BERLIN, POTSDAM), vec![BERLIN, POTSDAM]);
    }

    #[tokio::test]
    async fn collects_first_route_of_each_leg_in_order() {
        let provider = StubProvider::new([
            (Leg::Direct, Ok(vec![raw(30.0, 35.0), raw(31.0, 40.0)])),
            (Leg::PositiveDetour, Ok(vec![raw(36.0, 42.0)])),
            (Leg::NegativeDetour, Ok(vec![raw(38.0, 44.0)])),
        ]);

        let acquisition = acquire_routes(&provider, BERLIN, POTSDAM).await;

        let legs: Vec<Leg> = acquisition.routes.iter().map(|(leg, _)| *leg).collect();
        assert_eq!(legs, Leg::ALL.to_vec());
        assert_eq!(acquisition.routes[0].1.distance_km, 30.0);
        assert!(acquisition.failures.is_empty());
        assert_eq!(provider.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn partial_failure_keeps_surviving_legs() {
        let provider = StubProvider::new([
            (Leg::Direct, Err(400)),
            (Leg::PositiveDetour, Ok(vec![raw(36.0, 42.0)])),
            (Leg::NegativeDetour, Ok(vec![])),
        ]);

        let acquisition = acquire_routes(&provider, BERLIN, POTSDAM).await;

        assert_eq!(acquisition.routes.len(), 1);
        assert_eq!(acquisition.routes[0].0, Leg::PositiveDetour);
        assert_eq!(acquisition.failures.len(), 2);
        assert!(matches!(
            acquisition.failures[1].error,
            DirectionsError::NoRoutes
        ));
    }

    #[tokio::test]
    async fn total_failure_is_empty() {
        let provider = StubProvider::new([
            (Leg::Direct, Err(503)),
            (Leg::PositiveDetour, Err(400)),
            (Leg::NegativeDetour, Err(500)),
        ]);

        let acquisition = acquire_routes(&provider, BERLIN, POTSDAM).await;
        assert!(acquisition.is_empty());
        assert_eq!(acquisition.failures.len(), 3);
    }
}
