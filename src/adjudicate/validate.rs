//! Order validation.
//!
//! Rejects structurally illegal orders before resolution by setting their
//! status to `Invalid`/`RetreatInvalid`. Orders for dislodged units are
//! routed through the retreat status family here. The validator never moves
//! a unit; its only side effect is status mutation.

use crate::error::EngineError;
use crate::map::RegionType;
use crate::world::{Centre, Location, OrderKind, OrderStatus, Phase, UnitKind, World};

use super::adjacency::Adjacency;
use super::convoy;

/// Validates every order that needs it, after checking the batch for
/// structural errors (unknown regions, orders without an acting unit).
pub fn validate_orders(
    world: &mut World,
    adjacency: &Adjacency<'_>,
    home_centres: &[Centre],
) -> Result<(), EngineError> {
    check_batch_integrity(world, adjacency)?;

    let pending: Vec<usize> = (0..world.orders.len())
        .filter(|&i| world.orders[i].needs_validation())
        .collect();

    let mut retreats = Vec::new();
    let mut holds = Vec::new();
    let mut moves = Vec::new();
    let mut supports = Vec::new();
    let mut convoys = Vec::new();
    let mut builds = Vec::new();
    let mut disbands = Vec::new();

    for &i in &pending {
        let order = &world.orders[i];
        let dislodged = world
            .unit_at(&order.location)
            .map(|u| u.must_retreat)
            .unwrap_or(false);
        if dislodged {
            retreats.push(i);
            continue;
        }
        match order.kind {
            OrderKind::Hold => holds.push(i),
            OrderKind::Move { .. } => moves.push(i),
            OrderKind::Support { .. } => supports.push(i),
            OrderKind::Convoy { .. } => convoys.push(i),
            OrderKind::Build => builds.push(i),
            OrderKind::Disband => disbands.push(i),
        }
    }

    validate_moves(world, adjacency, &moves, &convoys);
    validate_supports(world, adjacency, &supports, &holds, &moves, &convoys);
    validate_convoys(world, adjacency, &convoys, &moves);
    validate_builds(world, adjacency, &builds, home_centres);
    validate_disbands(world, &disbands);
    validate_retreats(world, adjacency, &retreats);

    Ok(())
}

/// Structural (programmer) errors: these indicate a bug upstream, not a
/// game-rule violation, and fail the whole pass.
fn check_batch_integrity(world: &World, adjacency: &Adjacency<'_>) -> Result<(), EngineError> {
    let map = adjacency.map();
    for order in world.orders.iter().filter(|o| o.needs_validation()) {
        for location in order.touched_locations() {
            map.region(&location.region)?;
        }
        if matches!(order.kind, OrderKind::Build) {
            continue;
        }
        let unit = world
            .unit_at(&order.location)
            .ok_or_else(|| EngineError::MissingUnit(order.location.to_string()))?;
        if unit.owner != order.owner || unit.kind != order.unit_kind {
            return Err(EngineError::InvalidWorldData(format!(
                "order at {} does not describe the unit stationed there",
                order.location
            )));
        }
    }
    Ok(())
}

fn matching_fleets(
    world: &World,
    convoys: &[usize],
    midpoint: &Location,
    destination: &Location,
) -> Vec<Location> {
    convoys
        .iter()
        .filter_map(|&i| {
            let order = &world.orders[i];
            match &order.kind {
                OrderKind::Convoy {
                    midpoint: m,
                    destination: d,
                } if m == midpoint && d == destination => Some(order.location.clone()),
                _ => None,
            }
        })
        .collect()
}

fn validate_moves(world: &mut World, adjacency: &Adjacency<'_>, moves: &[usize], convoys: &[usize]) {
    for &i in moves {
        let order = &world.orders[i];
        let destination = match order.move_destination() {
            Some(d) => d.clone(),
            None => continue,
        };
        let can_direct =
            adjacency.is_valid_direct_move(order.unit_kind, false, &order.location, &destination);
        let fleets = matching_fleets(world, convoys, &order.location, &destination);
        let can_convoy = convoy::has_path(
            adjacency,
            world.orders[i].unit_kind,
            &world.orders[i].location,
            &destination,
            &fleets,
        );
        world.orders[i].status = if can_direct || can_convoy {
            OrderStatus::New
        } else {
            OrderStatus::Invalid
        };
    }
}

fn validate_supports(
    world: &mut World,
    adjacency: &Adjacency<'_>,
    supports: &[usize],
    holds: &[usize],
    moves: &[usize],
    convoys: &[usize],
) {
    // Orders that keep their unit in place; an invalid move holds too.
    let stationary: Vec<usize> = holds
        .iter()
        .chain(supports.iter())
        .chain(convoys.iter())
        .copied()
        .chain(
            moves
                .iter()
                .copied()
                .filter(|&m| world.orders[m].status == OrderStatus::Invalid),
        )
        .collect();

    for &i in supports {
        let (midpoint, destination) = match &world.orders[i].kind {
            OrderKind::Support {
                midpoint,
                destination,
            } => (midpoint.clone(), destination.clone()),
            _ => continue,
        };
        let order = &world.orders[i];

        let can_support =
            adjacency.is_valid_support_move(order.unit_kind, &order.location, &destination);

        let has_matching_hold = midpoint == destination
            && stationary.iter().any(|&s| {
                adjacency.equals_or_related(&world.orders[s].location, &destination)
            });

        let has_matching_move = moves.iter().any(|&m| {
            let candidate = &world.orders[m];
            candidate.location == midpoint
                && candidate.status != OrderStatus::Invalid
                && candidate
                    .move_destination()
                    .map(|d| adjacency.equals_or_related(d, &destination))
                    .unwrap_or(false)
        });

        world.orders[i].status = if can_support && (has_matching_hold || has_matching_move) {
            OrderStatus::New
        } else {
            OrderStatus::Invalid
        };
    }
}

fn validate_convoys(
    world: &mut World,
    adjacency: &Adjacency<'_>,
    convoys: &[usize],
    moves: &[usize],
) {
    let map = adjacency.map();
    for &i in convoys {
        let (midpoint, destination) = match &world.orders[i].kind {
            OrderKind::Convoy {
                midpoint,
                destination,
            } => (midpoint.clone(), destination.clone()),
            _ => continue,
        };
        let order = &world.orders[i];

        let on_sea = map
            .get(&order.location.region)
            .map(|r| r.kind == RegionType::Sea)
            .unwrap_or(false);
        let endpoints_coastal =
            map.touches_coast(&midpoint.region) && map.touches_coast(&destination.region);

        if !on_sea || !endpoints_coastal {
            world.orders[i].status = OrderStatus::Invalid;
            continue;
        }

        let has_matching_move = moves.iter().any(|&m| {
            let candidate = &world.orders[m];
            candidate.location == midpoint
                && candidate.status != OrderStatus::Invalid
                && candidate.move_destination() == Some(&destination)
        });

        world.orders[i].status = if has_matching_move {
            OrderStatus::New
        } else {
            OrderStatus::Invalid
        };
    }
}

fn validate_builds(
    world: &mut World,
    adjacency: &Adjacency<'_>,
    builds: &[usize],
    home_centres: &[Centre],
) {
    let map = adjacency.map();
    for &i in builds {
        let order = &world.orders[i];
        let location = order.location.clone();

        if location.phase != Phase::Winter {
            world.orders[i].status = OrderStatus::Invalid;
            continue;
        }

        let root = map.root_id(&location.region).to_string();
        let home_centre = home_centres
            .iter()
            .find(|c| c.location.region == location.region || c.location.region == root);
        // None until a board exists at the build's cell.
        let occupied = world
            .board_containing(&location)
            .map(|b| b.units.iter().any(|u| map.root_id(&u.location.region) == root));

        let is_home = home_centre.map(|c| c.owner == Some(order.owner));
        let region_kind = map.get(&location.region).map(|r| r.kind);
        let unit_fits = match order.unit_kind {
            UnitKind::Army => region_kind != Some(RegionType::Sea),
            UnitKind::Fleet => region_kind == Some(RegionType::Coast),
        };

        world.orders[i].status = match (is_home, occupied) {
            (Some(true), Some(false)) if unit_fits => OrderStatus::New,
            _ => OrderStatus::Invalid,
        };
    }
}

fn validate_disbands(world: &mut World, disbands: &[usize]) {
    let mut seen = Vec::new();
    for &i in disbands {
        let location = world.orders[i].location.clone();
        let duplicate = seen.contains(&location);
        seen.push(location.clone());

        world.orders[i].status = if location.phase == Phase::Winter && !duplicate {
            OrderStatus::New
        } else {
            OrderStatus::Invalid
        };
    }
}

fn validate_retreats(world: &mut World, adjacency: &Adjacency<'_>, retreats: &[usize]) {
    for &i in retreats {
        let order = &world.orders[i];
        let status = match &order.kind {
            OrderKind::Move { destination } => {
                if adjacency.is_valid_direct_move(order.unit_kind, true, &order.location, destination)
                {
                    OrderStatus::RetreatNew
                } else {
                    OrderStatus::RetreatInvalid
                }
            }
            OrderKind::Disband => OrderStatus::RetreatNew,
            _ => OrderStatus::RetreatInvalid,
        };
        world.orders[i].status = status;
    }
}
