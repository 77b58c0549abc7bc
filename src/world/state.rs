//! The `World` aggregate: the full board history and order log of one game.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::location::{Location, Phase};
use super::order::Order;
use super::unit::{Nation, Unit};

/// Aggregate root owning every board and order of one game instance.
///
/// Boards form an append-only arena keyed by (timeline, year, phase);
/// nothing in the engine deletes a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub boards: Vec<Board>,
    pub orders: Vec<Order>,
    pub iteration: u32,
    pub winner: Option<Nation>,
}

impl World {
    /// Creates an empty world with no boards or orders.
    pub fn new() -> Self {
        World {
            boards: Vec::new(),
            orders: Vec::new(),
            iteration: 0,
            winner: None,
        }
    }

    /// Returns the board at the given cell, if it exists.
    pub fn board_at(&self, timeline: u32, year: i32, phase: Phase) -> Option<&Board> {
        self.boards
            .iter()
            .find(|b| b.timeline == timeline && b.year == year && b.phase == phase)
    }

    /// Returns the board containing the given location.
    pub fn board_containing(&self, location: &Location) -> Option<&Board> {
        self.board_at(location.timeline, location.year, location.phase)
    }

    /// Returns the unit at the given location, if any.
    pub fn unit_at(&self, location: &Location) -> Option<&Unit> {
        self.board_containing(location)
            .and_then(|b| b.unit_at(&location.region))
    }

    /// Mutable access to the unit at the given location.
    pub fn unit_at_mut(&mut self, location: &Location) -> Option<&mut Unit> {
        self.boards
            .iter_mut()
            .find(|b| b.contains(location))
            .and_then(|b| {
                b.units
                    .iter_mut()
                    .find(|u| u.location.region == location.region)
            })
    }

    /// For each timeline, the index of its most time-advanced board.
    pub fn active_board_indices(&self) -> Vec<usize> {
        let timelines: BTreeSet<u32> = self.boards.iter().map(|b| b.timeline).collect();
        timelines
            .into_iter()
            .filter_map(|timeline| {
                self.boards
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| b.timeline == timeline)
                    .max_by_key(|(_, b)| b.time_index())
                    .map(|(i, _)| i)
            })
            .collect()
    }

    /// For each timeline, its most time-advanced board.
    pub fn active_boards(&self) -> Vec<&Board> {
        self.active_board_indices()
            .into_iter()
            .map(|i| &self.boards[i])
            .collect()
    }

    /// Nations owning at least one centre on any active board.
    pub fn living_players(&self) -> Vec<Nation> {
        let owners: BTreeSet<Nation> = self
            .active_boards()
            .into_iter()
            .flat_map(|b| b.centres.iter().filter_map(|c| c.owner))
            .collect();
        owners.into_iter().collect()
    }

    /// True while any unit anywhere is dislodged and pending a retreat.
    /// Gates the Executor: no timeline advances until retreats resolve.
    pub fn has_retreats(&self) -> bool {
        self.boards
            .iter()
            .any(|b| b.units.iter().any(|u| u.must_retreat))
    }

    /// The highest timeline id in use.
    pub fn max_timeline(&self) -> u32 {
        self.boards.iter().map(|b| b.timeline).max().unwrap_or(0)
    }

    /// Locations of every unit currently flagged for retreat.
    pub fn retreating_unit_locations(&self) -> Vec<Location> {
        self.boards
            .iter()
            .flat_map(|b| b.units.iter())
            .filter(|u| u.must_retreat)
            .map(|u| u.location.clone())
            .collect()
    }
}

impl Default for World {
    fn default() -> Self {
        World::new()
    }
}
