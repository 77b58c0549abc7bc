//! Region and connection value types.

use serde::{Deserialize, Serialize};

/// Classifies a region by terrain.
///
/// Split-coast provinces are modelled as a `Land` parent with `Coast`
/// children, so armies occupy the parent and fleets a named coast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionType {
    Land,
    Sea,
    Coast,
}

/// Classifies a connection by which unit kinds may traverse it.
///
/// `Land` edges carry armies, `Sea` edges carry fleets, `Coast` edges carry
/// both (a shoreline border between two coastal provinces).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionType {
    Land,
    Sea,
    Coast,
}

impl ConnectionType {
    /// Returns true if an army may traverse this connection.
    pub const fn army_ok(self) -> bool {
        !matches!(self, ConnectionType::Sea)
    }

    /// Returns true if a fleet may traverse this connection.
    pub const fn fleet_ok(self) -> bool {
        !matches!(self, ConnectionType::Land)
    }
}

/// A named region of the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub kind: RegionType,
    /// Owning province for coast children (`Spa_S` -> `Spa`), else `None`.
    pub parent: Option<String>,
}

/// An undirected typed edge between two regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub kind: ConnectionType,
    pub endpoints: [String; 2],
}
