//! Convoy path search.
//!
//! A move may travel by convoy when a continuous chain of fleets, each of
//! which ordered a matching convoy, links the army's origin to its
//! destination. Chains may span boards, so a convoy can carry an army
//! further through time and timelines than a direct move could reach.

use crate::world::{Location, UnitKind};

use super::adjacency::Adjacency;

/// Returns true if the fleets at `fleets` form a continuous convoy chain
/// from `from` to `to` for a unit of `kind`.
pub fn has_path(
    adjacency: &Adjacency<'_>,
    kind: UnitKind,
    from: &Location,
    to: &Location,
    fleets: &[Location],
) -> bool {
    if kind == UnitKind::Fleet || from == to {
        return false;
    }
    if !adjacency.map().touches_coast(&from.region) || !adjacency.map().touches_coast(&to.region) {
        return false;
    }
    if fleets.is_empty() {
        return false;
    }

    let mut visited = vec![false; fleets.len()];
    chain_reaches(adjacency, kind, from, to, fleets, &mut visited)
}

fn chain_reaches(
    adjacency: &Adjacency<'_>,
    kind: UnitKind,
    at: &Location,
    to: &Location,
    fleets: &[Location],
    visited: &mut [bool],
) -> bool {
    if adjacency.is_valid_direct_move(kind, false, at, to) {
        return true;
    }
    for (i, fleet) in fleets.iter().enumerate() {
        if visited[i] {
            continue;
        }
        if !adjacency.is_valid_direct_move(UnitKind::Fleet, false, fleet, at) {
            continue;
        }
        visited[i] = true;
        if chain_reaches(adjacency, UnitKind::Fleet, fleet, to, fleets, visited) {
            return true;
        }
    }
    false
}

/// Returns the indices of every fleet lying on some viable chain from
/// `from` to `to`: reachable from the origin, and able to reach the
/// destination. Used during resolution to track which convoys a move
/// currently depends on.
pub fn possible_convoys(
    adjacency: &Adjacency<'_>,
    from: &Location,
    to: &Location,
    fleets: &[Location],
) -> Vec<usize> {
    if fleets.is_empty() {
        return Vec::new();
    }

    // Forward sweep: fleets the chain can pick up starting at the origin.
    let mut from_origin = vec![false; fleets.len()];
    let mut frontier = vec![from.clone()];
    while let Some(point) = frontier.pop() {
        for (i, fleet) in fleets.iter().enumerate() {
            if from_origin[i] {
                continue;
            }
            if adjacency.is_valid_direct_move(UnitKind::Fleet, false, fleet, &point) {
                from_origin[i] = true;
                frontier.push(fleet.clone());
            }
        }
    }

    // Backward sweep: fleets from which the destination is still reachable.
    let mut to_destination = vec![false; fleets.len()];
    let mut frontier: Vec<usize> = (0..fleets.len())
        .filter(|&i| adjacency.is_valid_direct_move(UnitKind::Fleet, false, &fleets[i], to))
        .collect();
    for &i in &frontier {
        to_destination[i] = true;
    }
    while let Some(i) = frontier.pop() {
        for (j, fleet) in fleets.iter().enumerate() {
            if to_destination[j] {
                continue;
            }
            if adjacency.is_valid_direct_move(UnitKind::Fleet, false, fleet, &fleets[i]) {
                to_destination[j] = true;
                frontier.push(j);
            }
        }
    }

    (0..fleets.len())
        .filter(|&i| from_origin[i] && to_destination[i])
        .collect()
}
