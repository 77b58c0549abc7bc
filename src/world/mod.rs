//! The branching world model.
//!
//! Contains the data the engine reads and mutates: locations across
//! timelines, units, centres, boards, orders, and the `World` aggregate,
//! plus the factory for the standard starting position.

pub mod board;
pub mod factory;
pub mod location;
pub mod order;
pub mod state;
pub mod unit;

pub use board::{Board, Centre};
pub use location::{Location, Phase};
pub use order::{Order, OrderKind, OrderStatus};
pub use state::World;
pub use unit::{Nation, Unit, UnitKind, ALL_NATIONS};
