//! Multiversal adjacency rules.
//!
//! Decides whether a unit can move between two locations, which may sit on
//! the same board or on different boards across time and timelines. The
//! strict/loose flag is the per-game option for cross-board moves: strict
//! games require landing on the exact equivalent region, loose games allow
//! any adjacent region of the target board.

use crate::map::{ConnectionType, RegionMap};
use crate::world::{Location, Phase, UnitKind};

/// Adjacency oracle bound to a map and a strictness mode.
pub struct Adjacency<'a> {
    map: &'a RegionMap,
    strict: bool,
}

impl<'a> Adjacency<'a> {
    /// Creates the oracle. `strict` selects exact-region cross-board moves.
    pub fn new(map: &'a RegionMap, strict: bool) -> Self {
        Adjacency { map, strict }
    }

    /// The map this oracle reads.
    pub fn map(&self) -> &RegionMap {
        self.map
    }

    /// Returns true if a unit of `kind` may move directly from `from` to
    /// `to`. Dislodged units (`must_retreat`) may not leave their board.
    pub fn is_valid_direct_move(
        &self,
        kind: UnitKind,
        must_retreat: bool,
        from: &Location,
        to: &Location,
    ) -> bool {
        self.direct_move(kind, must_retreat, from, to, false)
    }

    /// Direct-move check for support destinations, which may name a sibling
    /// coast or the parent of the region actually reached.
    pub fn is_valid_support_move(&self, kind: UnitKind, from: &Location, to: &Location) -> bool {
        self.direct_move(kind, false, from, to, true)
    }

    fn direct_move(
        &self,
        kind: UnitKind,
        must_retreat: bool,
        from: &Location,
        to: &Location,
        allow_sibling: bool,
    ) -> bool {
        if from.phase == Phase::Winter || to.phase == Phase::Winter {
            return false;
        }
        if from.same_board(to) {
            self.intra_board_move(kind, from, to, allow_sibling)
        } else {
            !must_retreat && self.inter_board_move(kind, from, to, allow_sibling)
        }
    }

    fn inter_board_move(
        &self,
        kind: UnitKind,
        from: &Location,
        to: &Location,
        allow_sibling: bool,
    ) -> bool {
        if self.strict && from.region != to.region {
            return false;
        }
        if !self.intra_board_move(kind, from, to, allow_sibling) {
            return false;
        }

        let year_distance = from.year - to.year;
        let phase_distance = from.phase.ordinal() - to.phase.ordinal();
        let time_distance = (2 * year_distance + phase_distance).abs();
        let timeline_distance = (from.timeline as i64 - to.timeline as i64).abs();

        time_distance <= 1 && timeline_distance <= 1 && (time_distance == 0 || timeline_distance == 0)
    }

    fn intra_board_move(
        &self,
        kind: UnitKind,
        from: &Location,
        to: &Location,
        allow_sibling: bool,
    ) -> bool {
        if from == to {
            return false;
        }
        if from.region == to.region {
            return true;
        }

        if allow_sibling {
            for sibling in self.sibling_regions(&to.region) {
                if sibling == to.region {
                    continue;
                }
                let sibling_location = to.with_region(sibling);
                if self.intra_board_move(kind, from, &sibling_location, false) {
                    return true;
                }
            }
        }

        match self.map.connection_between(&from.region, &to.region) {
            Some(connection) => can_traverse(kind, connection),
            None => false,
        }
    }

    /// The destination region's coast children, its siblings, and its
    /// parent, as alternative support destinations.
    fn sibling_regions(&self, region: &str) -> Vec<String> {
        let mut siblings: Vec<String> = self
            .map
            .children_of(region)
            .into_iter()
            .map(|r| r.id.clone())
            .collect();
        if let Some(parent) = self.map.parent_of(region) {
            siblings.extend(self.map.children_of(&parent.id).into_iter().map(|r| r.id.clone()));
            siblings.push(parent.id.clone());
        }
        siblings
    }

    /// Returns true if two locations name the same board cell up to the
    /// coast/parent relation: same board, and regions sharing a root.
    pub fn equals_or_related(&self, a: &Location, b: &Location) -> bool {
        a.same_board(b) && self.map.root_id(&a.region) == self.map.root_id(&b.region)
    }
}

fn can_traverse(kind: UnitKind, connection: ConnectionType) -> bool {
    match kind {
        UnitKind::Army => connection.army_ok(),
        UnitKind::Fleet => connection.fleet_ok(),
    }
}
