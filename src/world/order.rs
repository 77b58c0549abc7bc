//! Orders and their resolution lifecycle.

use serde::{Deserialize, Serialize};

use super::location::Location;
use super::unit::{Nation, UnitKind};

/// Resolution state of an order.
///
/// Every order starts `New` and ends the pass in a terminal status: the
/// Validator may reject it as `Invalid`, otherwise the Evaluator settles it
/// as `Success` or `Failure`. Orders acting for a dislodged unit move
/// through the `Retreat`-prefixed family instead. Terminal statuses are
/// never revisited within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    Success,
    Failure,
    Invalid,
    RetreatNew,
    RetreatSuccess,
    RetreatFailure,
    RetreatInvalid,
}

impl OrderStatus {
    /// Returns true while the order awaits resolution.
    pub const fn is_new(self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::RetreatNew)
    }

    /// Returns true once the order can no longer change this pass.
    pub const fn is_terminal(self) -> bool {
        !self.is_new()
    }

    /// Returns true if the order resolved successfully.
    pub const fn succeeded(self) -> bool {
        matches!(self, OrderStatus::Success | OrderStatus::RetreatSuccess)
    }

    /// Returns true if the order was structurally rejected.
    pub const fn is_invalid(self) -> bool {
        matches!(self, OrderStatus::Invalid | OrderStatus::RetreatInvalid)
    }

    /// Maps a base-family status onto the retreat family.
    pub const fn to_retreat(self) -> OrderStatus {
        match self {
            OrderStatus::New => OrderStatus::RetreatNew,
            OrderStatus::Success => OrderStatus::RetreatSuccess,
            OrderStatus::Failure => OrderStatus::RetreatFailure,
            OrderStatus::Invalid => OrderStatus::RetreatInvalid,
            retreat => retreat,
        }
    }
}

/// The variant-specific payload of an order.
///
/// A closed sum type so every dispatch over order kinds is checked for
/// exhaustiveness by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    /// Keep the unit in place.
    Hold,
    /// Move (or retreat) the unit to `destination`.
    Move { destination: Location },
    /// Back the unit at `midpoint` moving to (or holding at) `destination`.
    Support {
        midpoint: Location,
        destination: Location,
    },
    /// Carry the army at `midpoint` towards `destination`.
    Convoy {
        midpoint: Location,
        destination: Location,
    },
    /// Create a new unit at the order's location (Winter only).
    Build,
    /// Remove the unit at the order's location.
    Disband,
}

/// A submitted order.
///
/// The acting unit is identified by `location` (one unit per region per
/// board); `owner` and `unit_kind` describe it, and for `Build` describe
/// the unit that does not yet exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub status: OrderStatus,
    pub owner: Nation,
    pub unit_kind: UnitKind,
    pub location: Location,
    pub kind: OrderKind,
}

impl Order {
    /// Creates a new order awaiting validation.
    pub fn new(owner: Nation, unit_kind: UnitKind, location: Location, kind: OrderKind) -> Self {
        Order {
            status: OrderStatus::New,
            owner,
            unit_kind,
            location,
            kind,
        }
    }

    /// Every location this order reads or writes; used to close the active
    /// order set over boards that interact this pass.
    pub fn touched_locations(&self) -> Vec<&Location> {
        match &self.kind {
            OrderKind::Hold | OrderKind::Build | OrderKind::Disband => vec![&self.location],
            OrderKind::Move { destination } => vec![&self.location, destination],
            OrderKind::Support {
                midpoint,
                destination,
            }
            | OrderKind::Convoy {
                midpoint,
                destination,
            } => vec![&self.location, midpoint, destination],
        }
    }

    /// Returns true if the Validator should (re-)examine this order.
    /// Supports and convoys are always re-checked, since their legality
    /// depends on the other orders in the batch.
    pub fn needs_validation(&self) -> bool {
        if self.status.is_new() {
            return true;
        }
        self.status.is_invalid()
            && matches!(
                self.kind,
                OrderKind::Support { .. } | OrderKind::Convoy { .. }
            )
    }

    /// Returns the destination for move orders.
    pub fn move_destination(&self) -> Option<&Location> {
        match &self.kind {
            OrderKind::Move { destination } => Some(destination),
            _ => None,
        }
    }

    /// Returns true for move orders.
    pub fn is_move(&self) -> bool {
        matches!(self.kind, OrderKind::Move { .. })
    }
}
