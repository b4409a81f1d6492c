//! Single-line routes between two stops.

use std::collections::HashSet;

use crate::domain::{DirectRoute, Direction, Estimate, SequenceEntry, StopRef};

use super::active::ActiveLineSet;

/// Round a distance to 2 decimal places.
pub(crate) fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Find lines that call at the origin and later at the destination, in the
/// same direction.
///
/// Only the first pairing for each (line, direction) is kept. Lines not in
/// `active` are dropped. Each route carries the first origin estimate for its
/// line, if any.
pub fn match_direct(
    at_origin: &[SequenceEntry],
    at_destination: &[SequenceEntry],
    active: &ActiveLineSet,
    origin_estimates: &[Estimate],
) -> Vec<DirectRoute> {
    let mut seen: HashSet<(&str, Direction)> = HashSet::new();
    let mut routes = Vec::new();

    for lo in at_origin {
        for ld in at_destination {
            if !lo.reaches(ld) {
                continue;
            }
            if !seen.insert((lo.line.as_str(), lo.direction)) {
                continue;
            }
            if !active.contains(&lo.line) {
                continue;
            }

            let next_bus = origin_estimates
                .iter()
                .find(|e| e.is_for_line(&lo.line))
                .cloned();

            routes.push(DirectRoute {
                line: lo.line.clone(),
                direction: lo.direction,
                origin: StopRef::new(&lo.stop_id, &lo.stop_name),
                destination: StopRef::new(&ld.stop_id, &ld.stop_name),
                distance_km: round_km(ld.position_km - lo.position_km),
                next_bus,
            });
        }
    }

    routes
}
