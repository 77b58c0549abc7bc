//! Retreat evaluation.
//!
//! Runs instead of movement resolution while any unit is dislodged.
//! Retreats are resolved as ordinary moves and disbands within the
//! dislodged unit's own board; conflicts disband rather than bounce, and
//! dislodged units left without a successful retreat are disbanded too.
//! Clears every `must_retreat` flag, which re-opens the Executor.

use crate::world::{Order, OrderKind, OrderStatus, World};

/// Evaluates the retreat orders in the active set.
pub fn evaluate_retreats(world: &mut World, active: &[usize]) {
    evaluate_disbands(world, active);
    evaluate_retreat_moves(world, active);
    disband_stranded_units(world);
}

/// A submitted retreat-disband always succeeds.
fn evaluate_disbands(world: &mut World, active: &[usize]) {
    for &i in active {
        if world.orders[i].status != OrderStatus::RetreatNew {
            continue;
        }
        if !matches!(world.orders[i].kind, OrderKind::Disband) {
            continue;
        }
        world.orders[i].status = OrderStatus::RetreatSuccess;
        let location = world.orders[i].location.clone();
        if let Some(unit) = world.unit_at_mut(&location) {
            unit.must_retreat = false;
        }
    }
}

fn evaluate_retreat_moves(world: &mut World, active: &[usize]) {
    let retreats: Vec<usize> = active
        .iter()
        .copied()
        .filter(|&i| world.orders[i].status == OrderStatus::RetreatNew && world.orders[i].is_move())
        .collect();

    let mut forced_disbands: Vec<Order> = Vec::new();

    for &i in &retreats {
        let location = world.orders[i].location.clone();
        let destination = match world.orders[i].move_destination() {
            Some(d) => d.clone(),
            None => continue,
        };

        // A unit that stayed put occupies the destination: any stationary
        // order, or a move that could not leave.
        let occupied = world.orders.iter().any(|o| {
            o.location == destination
                && match o.kind {
                    OrderKind::Hold | OrderKind::Support { .. } | OrderKind::Convoy { .. } => true,
                    OrderKind::Move { .. } => {
                        matches!(o.status, OrderStatus::Invalid | OrderStatus::Failure)
                    }
                    _ => false,
                }
        });

        let taken = world.orders.iter().any(|o| {
            o.is_move()
                && o.status == OrderStatus::Success
                && o.move_destination() == Some(&destination)
        });

        // Two or more failed attacks mean the region saw a standoff; no
        // retreat into a contested region.
        let contested = world
            .orders
            .iter()
            .filter(|o| {
                o.is_move()
                    && o.status == OrderStatus::Failure
                    && o.move_destination() == Some(&destination)
            })
            .count()
            >= 2;

        // The attack came through here; retreating towards the attacker's
        // origin is forbidden.
        let attacker_origin = world.orders.iter().any(|o| {
            o.is_move() && o.location == destination && o.move_destination() == Some(&location)
        });

        let mutual_retreat = retreats.iter().any(|&r| {
            r != i && world.orders[r].move_destination() == Some(&destination)
        });

        if occupied || taken || contested || attacker_origin || mutual_retreat {
            world.orders[i].status = OrderStatus::RetreatFailure;
            forced_disbands.push(Order {
                status: OrderStatus::RetreatSuccess,
                owner: world.orders[i].owner,
                unit_kind: world.orders[i].unit_kind,
                location: location.clone(),
                kind: OrderKind::Disband,
            });
        } else {
            world.orders[i].status = OrderStatus::RetreatSuccess;
        }

        if let Some(unit) = world.unit_at_mut(&location) {
            unit.must_retreat = false;
        }
    }

    world.orders.extend(forced_disbands);
}

/// Dislodged units with no resolved retreat are disbanded (civil disorder).
fn disband_stranded_units(world: &mut World) {
    let stranded: Vec<(crate::world::Nation, crate::world::UnitKind, crate::world::Location)> =
        world
            .active_boards()
            .into_iter()
            .flat_map(|b| b.units.iter())
            .filter(|u| u.must_retreat)
            .map(|u| (u.owner, u.kind, u.location.clone()))
            .collect();

    for (owner, kind, location) in stranded {
        world.orders.push(Order {
            status: OrderStatus::RetreatSuccess,
            owner,
            unit_kind: kind,
            location: location.clone(),
            kind: OrderKind::Disband,
        });
        if let Some(unit) = world.unit_at_mut(&location) {
            unit.must_retreat = false;
        }
    }
}
