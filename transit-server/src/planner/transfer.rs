//! One-transfer routes through an intermediate stop.
//!
//! Every stop on a line serving the origin is a potential interchange, with
//! no proximity limit. At each one we look for a line that serves the
//! destination and reaches it from there, then for any origin-serving line
//! calling at the interchange. The first leg is matched to the origin by
//! line alone; its direction and position at the origin are not checked.
//!
//! Results are not deduplicated: the same (first line, second line, stop)
//! combination can appear more than once when it is reachable in more than
//! one way.

use std::collections::{HashMap, HashSet};

use crate::domain::{SequenceEntry, StopRef, TransferLeg, TransferRoute};

use super::active::ActiveLineSet;

/// Everything the transfer search looks at.
pub struct TransferInputs<'a> {
    pub origin_id: &'a str,
    pub destination_id: &'a str,

    /// Sequence entries recorded at the origin stop.
    pub at_origin: &'a [SequenceEntry],

    /// Sequence entries recorded at the destination stop.
    pub at_destination: &'a [SequenceEntry],

    /// Full sequences of every line serving the origin.
    pub origin_network: &'a [SequenceEntry],

    /// Full sequences of every line serving the destination.
    pub destination_network: &'a [SequenceEntry],
}

/// Find up to `limit` transfer routes, in discovery order, where both legs
/// run on active lines.
pub fn match_transfers(
    inputs: &TransferInputs<'_>,
    active: &ActiveLineSet,
    limit: usize,
) -> Vec<TransferRoute> {
    let mut routes = Vec::new();
    if limit == 0 {
        return routes;
    }

    let origin_lines: HashSet<&str> = inputs.at_origin.iter().map(|e| e.line.as_str()).collect();
    let destination_lines: HashSet<&str> = inputs
        .at_destination
        .iter()
        .map(|e| e.line.as_str())
        .collect();

    let mut by_stop: HashMap<&str, Vec<&SequenceEntry>> = HashMap::new();
    for entry in inputs
        .origin_network
        .iter()
        .chain(inputs.destination_network)
    {
        by_stop.entry(entry.stop_id.as_str()).or_default().push(entry);
    }

    for stop_id in interchange_candidates(inputs, &origin_lines) {
        let Some(entries) = by_stop.get(stop_id) else {
            continue;
        };

        for onward in entries
            .iter()
            .filter(|e| destination_lines.contains(e.line.as_str()))
        {
            for ld in inputs.at_destination.iter().filter(|ld| onward.reaches(ld)) {
                let Some((lo, inbound)) = first_leg(entries, inputs.at_origin, &origin_lines)
                else {
                    continue;
                };

                if !active.contains(&inbound.line) || !active.contains(&onward.line) {
                    continue;
                }

                routes.push(TransferRoute {
                    first_leg: TransferLeg {
                        line: inbound.line.clone(),
                        direction: inbound.direction,
                        from: StopRef::new(&lo.stop_id, &lo.stop_name),
                        to: StopRef::new(&inbound.stop_id, &inbound.stop_name),
                    },
                    second_leg: TransferLeg {
                        line: onward.line.clone(),
                        direction: onward.direction,
                        from: StopRef::new(&onward.stop_id, &onward.stop_name),
                        to: StopRef::new(&ld.stop_id, &ld.stop_name),
                    },
                });

                if routes.len() >= limit {
                    return routes;
                }
            }
        }
    }

    routes
}

/// Distinct stops on origin-serving lines, excluding both endpoints, in the
/// order they appear in the origin network.
fn interchange_candidates<'a>(
    inputs: &TransferInputs<'a>,
    origin_lines: &HashSet<&str>,
) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    inputs
        .origin_network
        .iter()
        .filter(|e| origin_lines.contains(e.line.as_str()))
        .map(|e| e.stop_id.as_str())
        .filter(|id| *id != inputs.origin_id && *id != inputs.destination_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Pick the first-leg line at an interchange: the first origin-serving line
/// calling there that also has an entry at the origin stop.
///
/// Returns the origin-side entry and the interchange-side entry.
fn first_leg<'a>(
    at_interchange: &[&'a SequenceEntry],
    at_origin: &'a [SequenceEntry],
    origin_lines: &HashSet<&str>,
) -> Option<(&'a SequenceEntry, &'a SequenceEntry)> {
    at_interchange
        .iter()
        .copied()
        .filter(|e| origin_lines.contains(e.line.as_str()))
        .find_map(|inbound| {
            at_origin
                .iter()
                .find(|lo| lo.line == inbound.line)
                .map(|lo| (lo, inbound))
        })
}
