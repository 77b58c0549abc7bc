//! Boards: the state of one timeline at one (year, phase).

use serde::{Deserialize, Serialize};

use super::location::{Location, Phase};
use super::unit::{Nation, Unit};

/// A strategic supply centre and its current owner (None while unclaimed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Centre {
    pub owner: Option<Nation>,
    pub location: Location,
}

/// World state at one (timeline, year, phase).
///
/// Boards are append-only: the Executor synthesizes new boards rather than
/// rewriting old ones, which is what keeps the branching history a DAG.
/// `child_timelines` is the only structural link from a board to the
/// timelines that forked off it; the reverse edge is reconstructed by
/// matching (year, phase) predecessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub timeline: u32,
    pub year: i32,
    pub phase: Phase,
    pub child_timelines: Vec<u32>,
    pub centres: Vec<Centre>,
    pub units: Vec<Unit>,
    /// Set while the board may still advance this turn; persists across
    /// passes so a retreat-gated advance resumes once retreats resolve.
    pub might_advance: bool,
}

impl Board {
    /// Creates an empty board at the given cell.
    pub fn new(timeline: u32, year: i32, phase: Phase) -> Self {
        Board {
            timeline,
            year,
            phase,
            child_timelines: Vec::new(),
            centres: Vec::new(),
            units: Vec::new(),
            might_advance: false,
        }
    }

    /// Returns true if the location sits on this board.
    pub fn contains(&self, location: &Location) -> bool {
        self.timeline == location.timeline
            && self.year == location.year
            && self.phase == location.phase
    }

    /// Total ordering of boards in game time: `3 * year + phase`.
    pub fn time_index(&self) -> i32 {
        3 * self.year + self.phase.ordinal()
    }

    /// Returns the unit occupying the given region, if any.
    pub fn unit_at(&self, region: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.location.region == region)
    }

    /// Structural position equality: same centre ownership and the same
    /// units, compared order-independently and ignoring identity. Used by
    /// the Executor to decide merge versus fork.
    pub fn same_position(&self, other: &Board) -> bool {
        let mut ours: Vec<_> = self
            .centres
            .iter()
            .map(|c| (c.location.region.as_str(), c.owner))
            .collect();
        let mut theirs: Vec<_> = other
            .centres
            .iter()
            .map(|c| (c.location.region.as_str(), c.owner))
            .collect();
        ours.sort_unstable();
        theirs.sort_unstable();
        if ours != theirs {
            return false;
        }

        let mut our_units: Vec<_> = self
            .units
            .iter()
            .map(|u| (u.location.region.as_str(), u.owner, u.kind, u.must_retreat))
            .collect();
        let mut their_units: Vec<_> = other
            .units
            .iter()
            .map(|u| (u.location.region.as_str(), u.owner, u.kind, u.must_retreat))
            .collect();
        our_units.sort_unstable();
        their_units.sort_unstable();
        our_units == their_units
    }
}
