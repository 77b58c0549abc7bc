//! Adjudication: one pass over a submitted order batch.
//!
//! The `Adjudicator` runs Validator -> Evaluator -> Executor in strict
//! sequence over an exclusively owned `World`, then re-evaluates victory.
//! Everything here is synchronous and deterministic; concurrency control
//! and persistence belong to the caller.

pub mod adjacency;
pub mod adjust;
pub mod convoy;
pub mod evaluate;
pub mod execute;
pub mod resolve;
pub mod retreat;
pub mod validate;

use std::collections::{BTreeSet, HashMap};

use crate::error::EngineError;
use crate::map::RegionMap;
use crate::world::{factory, Centre, Nation, World};

use adjacency::Adjacency;

/// Deduplicated active-board centres required for a solo victory.
pub const VICTORY_REQUIRED_CENTRES: usize = 18;

/// Orchestrates one adjudication pass over a world.
pub struct Adjudicator<'a> {
    world: &'a mut World,
    adjacency: Adjacency<'a>,
    home_centres: Vec<Centre>,
}

impl<'a> Adjudicator<'a> {
    /// Binds an adjudicator to a world and map. `strict_adjacencies` is the
    /// per-game option for cross-board move legality.
    pub fn new(
        world: &'a mut World,
        map: &'a RegionMap,
        strict_adjacencies: bool,
    ) -> Result<Self, EngineError> {
        let home_centres = factory::starting_centres()?;
        Ok(Adjudicator {
            world,
            adjacency: Adjacency::new(map, strict_adjacencies),
            home_centres,
        })
    }

    /// Runs one full pass: validation, evaluation, execution, victory.
    ///
    /// A world with a declared winner is frozen: newly submitted orders are
    /// discarded and nothing else changes.
    pub fn adjudicate(&mut self) -> Result<(), EngineError> {
        if self.world.winner.is_some() {
            self.world.orders.retain(|o| !o.status.is_new());
            return Ok(());
        }

        self.world.iteration += 1;

        validate::validate_orders(self.world, &self.adjacency, &self.home_centres)?;

        // Snapshot before evaluation clears the flags: the Executor must
        // know which units were dislodged going into this pass.
        let retreated = self.world.retreating_unit_locations();

        evaluate::evaluate_orders(self.world, &self.adjacency);
        execute::execute_orders(self.world, self.adjacency.map(), &retreated);

        self.world.winner = self.find_winner();
        Ok(())
    }

    /// Victory check: a nation wins when it alone holds the maximum
    /// deduplicated centre count across active boards and that count
    /// reaches the threshold. A centre owned in several timelines counts
    /// once.
    fn find_winner(&self) -> Option<Nation> {
        let mut owned: HashMap<Nation, BTreeSet<&str>> = HashMap::new();
        for board in self.world.active_boards() {
            for centre in &board.centres {
                if let Some(owner) = centre.owner {
                    owned
                        .entry(owner)
                        .or_default()
                        .insert(centre.location.region.as_str());
                }
            }
        }

        let best = owned.values().map(|regions| regions.len()).max()?;
        if best < VICTORY_REQUIRED_CENTRES {
            return None;
        }
        let mut leaders = owned
            .iter()
            .filter(|(_, regions)| regions.len() == best)
            .map(|(&nation, _)| nation);
        let winner = leaders.next()?;
        if leaders.next().is_some() {
            return None;
        }
        Some(winner)
    }
}

/// The engine's single entry point: append the newly submitted orders and
/// adjudicate the batch against the standard map.
pub fn adjudicate(
    world: &mut World,
    new_orders: Vec<crate::world::Order>,
    strict_adjacencies: bool,
) -> Result<(), EngineError> {
    world.orders.extend(new_orders);
    let map = RegionMap::standard()?;
    Adjudicator::new(world, map, strict_adjacencies)?.adjudicate()
}
