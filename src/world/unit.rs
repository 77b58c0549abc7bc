//! Nations, unit kinds, and units.

use serde::{Deserialize, Serialize};

use super::location::Location;

/// One of the seven playable factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nation {
    Austria,
    England,
    France,
    Germany,
    Italy,
    Russia,
    Turkey,
}

/// All nations in standard order.
pub const ALL_NATIONS: [Nation; 7] = [
    Nation::Austria,
    Nation::England,
    Nation::France,
    Nation::Germany,
    Nation::Italy,
    Nation::Russia,
    Nation::Turkey,
];

impl Nation {
    /// Returns the display name of this nation.
    pub const fn name(self) -> &'static str {
        match self {
            Nation::Austria => "Austria",
            Nation::England => "England",
            Nation::France => "France",
            Nation::Germany => "Germany",
            Nation::Italy => "Italy",
            Nation::Russia => "Russia",
            Nation::Turkey => "Turkey",
        }
    }

    /// Parses a nation from its display name.
    pub fn from_name(name: &str) -> Option<Nation> {
        ALL_NATIONS.into_iter().find(|n| n.name() == name)
    }
}

/// The kind of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    Army,
    Fleet,
}

/// A military unit on some board.
///
/// `must_retreat` marks the unit as dislodged and pending a retreat order
/// before its timeline may advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub owner: Nation,
    pub kind: UnitKind,
    pub location: Location,
    pub must_retreat: bool,
}

impl Unit {
    /// Creates a unit that is not retreating.
    pub fn new(owner: Nation, kind: UnitKind, location: Location) -> Self {
        Unit {
            owner,
            kind,
            location,
            must_retreat: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::location::Phase;

    #[test]
    fn nation_name_roundtrip() {
        for nation in ALL_NATIONS {
            assert_eq!(Nation::from_name(nation.name()), Some(nation));
        }
        assert_eq!(Nation::from_name("Atlantis"), None);
    }

    #[test]
    fn new_unit_is_not_retreating() {
        let unit = Unit::new(
            Nation::England,
            UnitKind::Fleet,
            Location::new(1, 1901, Phase::Spring, "Lon"),
        );
        assert!(!unit.must_retreat);
    }
}
