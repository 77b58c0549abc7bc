//! Locations in the branching world-space.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The seasonal phase of a game year.
///
/// Spring and Fall are major (movement) phases; Winter is the minor
/// (adjustment) phase where builds, disbands, and centre ownership resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Spring,
    Fall,
    Winter,
}

impl Phase {
    /// Returns the next phase in the yearly cycle.
    pub const fn next(self) -> Phase {
        match self {
            Phase::Spring => Phase::Fall,
            Phase::Fall => Phase::Winter,
            Phase::Winter => Phase::Spring,
        }
    }

    /// Returns the phase's position within the year.
    pub const fn ordinal(self) -> i32 {
        match self {
            Phase::Spring => 0,
            Phase::Fall => 1,
            Phase::Winter => 2,
        }
    }

    /// Returns true for the movement phases (Spring, Fall).
    pub const fn is_major(self) -> bool {
        !matches!(self, Phase::Winter)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Spring => "Spring",
            Phase::Fall => "Fall",
            Phase::Winter => "Winter",
        };
        write!(f, "{name}")
    }
}

/// A cell in the branching world-space.
///
/// Two locations are equal iff timeline, year, phase, and region all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub timeline: u32,
    pub year: i32,
    pub phase: Phase,
    pub region: String,
}

impl Location {
    /// Creates a location.
    pub fn new(timeline: u32, year: i32, phase: Phase, region: impl Into<String>) -> Self {
        Location {
            timeline,
            year,
            phase,
            region: region.into(),
        }
    }

    /// Returns true if both locations sit on the same board.
    pub fn same_board(&self, other: &Location) -> bool {
        self.timeline == other.timeline && self.year == other.year && self.phase == other.phase
    }

    /// Returns the same board cell with a different region.
    pub fn with_region(&self, region: impl Into<String>) -> Location {
        Location {
            timeline: self.timeline,
            year: self.year,
            phase: self.phase,
            region: region.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.timeline, self.year, self.phase, self.region
        )
    }
}
