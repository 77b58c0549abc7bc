//! Evaluator front door.
//!
//! Collects the active order set for the pass, dispatches to retreat or
//! movement+adjustment evaluation, and guarantees the terminal-status
//! invariant: every active order leaves the pass in a non-`New` status.

use std::collections::HashSet;

use crate::world::{Location, Order, OrderKind, OrderStatus, World};

use super::adjacency::Adjacency;
use super::adjust;
use super::resolve::MovementResolver;
use super::retreat;

/// Evaluates the current batch. Retreat rounds resolve only retreats;
/// otherwise movement resolution and winter adjustments run.
pub fn evaluate_orders(world: &mut World, adjacency: &Adjacency<'_>) {
    let active = collect_active_orders(world);

    if world.has_retreats() {
        retreat::evaluate_retreats(world, &active);
    } else {
        let was_new: Vec<bool> = world
            .orders
            .iter()
            .map(|o| o.status == OrderStatus::New)
            .collect();
        MovementResolver::new(world, adjacency, &active).resolve();
        mark_dislodged_units(world, adjacency, &was_new);
        adjust::evaluate_adjustments(world, &active);
    }

    // Terminal-status invariant: nothing stays pending across passes.
    for &i in &active {
        match world.orders[i].status {
            OrderStatus::New => world.orders[i].status = OrderStatus::Failure,
            OrderStatus::RetreatNew => world.orders[i].status = OrderStatus::RetreatFailure,
            _ => {}
        }
    }
}

/// The active set: this batch's orders, implicit holds for idle units, and
/// the closure over historical orders sharing a touched location, which
/// contribute strength on the boards this pass interacts with. Every board
/// touched by an active order is flagged as possibly advancing.
fn collect_active_orders(world: &mut World) -> Vec<usize> {
    let mut new_orders: Vec<usize> = (0..world.orders.len())
        .filter(|&i| world.orders[i].status.is_new())
        .collect();

    if !world.has_retreats() {
        let mut implicit_holds: Vec<Order> = Vec::new();
        for bi in world.active_board_indices() {
            if !world.boards[bi].phase.is_major() {
                continue;
            }
            for unit in &world.boards[bi].units {
                let has_order = new_orders
                    .iter()
                    .any(|&i| world.orders[i].location == unit.location);
                let pending = implicit_holds.iter().any(|o| o.location == unit.location);
                if !has_order && !pending {
                    implicit_holds.push(Order::new(
                        unit.owner,
                        unit.kind,
                        unit.location.clone(),
                        OrderKind::Hold,
                    ));
                }
            }
        }
        for order in implicit_holds {
            world.orders.push(order);
            new_orders.push(world.orders.len() - 1);
        }
    }

    let mut touched: HashSet<Location> = HashSet::new();
    for &i in &new_orders {
        for location in world.orders[i].touched_locations() {
            touched.insert(location.clone());
        }
    }

    let mut in_active = vec![false; world.orders.len()];
    let mut active = new_orders;
    for &i in &active {
        in_active[i] = true;
    }
    loop {
        let mut grew = false;
        for i in 0..world.orders.len() {
            if in_active[i] {
                continue;
            }
            let overlaps = world.orders[i]
                .touched_locations()
                .iter()
                .any(|l| touched.contains(*l));
            if overlaps {
                in_active[i] = true;
                active.push(i);
                for location in world.orders[i].touched_locations() {
                    touched.insert(location.clone());
                }
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }

    let flagged: Vec<usize> = (0..world.boards.len())
        .filter(|&bi| {
            let board = &world.boards[bi];
            active.iter().any(|&i| {
                world.orders[i]
                    .touched_locations()
                    .iter()
                    .any(|l| board.contains(l))
            })
        })
        .collect();
    for bi in flagged {
        world.boards[bi].might_advance = true;
    }

    active.sort_unstable();
    active
}

/// Units on a successfully attacked location are dislodged unless they
/// vacated it with their own successful move. Only moves resolved this
/// pass dislodge; historical successes already had their retreats.
fn mark_dislodged_units(world: &mut World, adjacency: &Adjacency<'_>, was_new: &[bool]) {
    let map = adjacency.map();

    let incoming: Vec<Location> = world
        .orders
        .iter()
        .enumerate()
        .filter(|&(i, o)| {
            i < was_new.len() && was_new[i] && o.status == OrderStatus::Success && o.is_move()
        })
        .filter_map(|(_, o)| o.move_destination().cloned())
        .collect();

    for destination in incoming {
        let root = map.root_id(&destination.region).to_string();
        let victim: Option<Location> = world.board_containing(&destination).and_then(|b| {
            b.units
                .iter()
                .find(|u| map.root_id(&u.location.region) == root)
                .map(|u| u.location.clone())
        });
        let Some(victim_location) = victim else {
            continue;
        };

        let vacated = world.orders.iter().any(|o| {
            o.location == victim_location && o.is_move() && o.status.succeeded()
        });
        if !vacated {
            if let Some(unit) = world.unit_at_mut(&victim_location) {
                unit.must_retreat = true;
            }
        }
    }
}
