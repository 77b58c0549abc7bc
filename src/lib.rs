//! Chronopolitik: a multiversal Diplomacy adjudication engine.
//!
//! Adjudicates a Diplomacy variant played across branching timelines:
//! validates a submitted order batch, resolves it simultaneously, advances
//! each timeline's board (forking where futures diverge), and checks for
//! victory. The engine is a pure, synchronous transformation of an
//! exclusively owned `World`; persistence, transport, and session
//! lifecycle belong to the caller.

pub mod adjudicate;
pub mod error;
pub mod map;
pub mod world;

pub use adjudicate::{adjudicate, Adjudicator, VICTORY_REQUIRED_CENTRES};
pub use error::EngineError;
pub use map::RegionMap;
pub use world::{
    Board, Centre, Location, Nation, Order, OrderKind, OrderStatus, Phase, Unit, UnitKind, World,
};
