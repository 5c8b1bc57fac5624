use crate::emissions::{calculate_savings, round_to};
use crate::models::RankedRoute;
use crate::selection::ScoredRoute;

pub const ECO_LABEL: &str = "Eco Pick";
pub const ECO_DESCRIPTION: &str = "Lowest CO₂";
pub const HIGH_EMISSIONS_LABEL: &str = "High Emissions";
pub const ALTERNATIVE_LABEL: &str = "Alternative";

/// Order routes from greenest to dirtiest and annotate them for display.
///
/// Ids are assigned from the incoming order before sorting. Every route tied
/// with the worst emissions gets the high-emissions label, except when it is
/// the only route.
pub fn rank_routes(candidates: Vec<ScoredRoute>) -> Vec<RankedRoute> {
    let mut indexed: Vec<(usize, ScoredRoute)> = candidates.into_iter().enumerate().collect();
    // stable: ties keep their incoming order
    indexed.sort_by(|(_, a), (_, b)| a.emissions_kg.total_cmp(&b.emissions_kg));

    let Some(worst) = indexed.last().map(|(_, route)| route.emissions_kg) else {
        return Vec::new();
    };
    let fastest = fastest_position(&indexed);
    let set_size = indexed.len();

    indexed
        .into_iter()
        .enumerate()
        .map(|(position, (id, scored))| {
            let is_ecofriendly = position == 0;
            let (label, description) = if is_ecofriendly {
                (ECO_LABEL.to_string(), ECO_DESCRIPTION.to_string())
            } else if scored.emissions_kg >= worst && set_size > 1 {
                (
                    HIGH_EMISSIONS_LABEL.to_string(),
                    format!("{}kg CO₂", scored.emissions_kg),
                )
            } else {
                (ALTERNATIVE_LABEL.to_string(), String::new())
            };

            RankedRoute {
                id: format!("route-{id}"),
                savings_percent: calculate_savings(scored.emissions_kg, worst),
                distance_km: round_to(scored.route.distance_km, 1),
                duration_min: scored.route.duration_min.round().max(0.0) as u32,
                emissions_kg: scored.emissions_kg,
                geometry: scored.route.geometry,
                is_ecofriendly,
                is_fastest: Some(position) == fastest,
                label,
                description,
            }
        })
        .collect()
}

/// First position, in ranked order, holding the shortest duration.
fn fastest_position(ranked: &[(usize, ScoredRoute)]) -> Option<usize> {
    ranked
        .iter()
        .enumerate()
        .min_by(|(_, (_, a)), (_, (_, b))| a.route.duration_min.total_cmp(&b.route.duration_min))
        .map(|(position, _)| position)
}
