//! Execution: advancing boards and mutating the timeline graph.
//!
//! Gated on retreats: while any unit must retreat, nothing advances. Each
//! advancing board synthesizes its successor; if an equivalent board
//! already occupies the target cell the futures merge, and if only
//! different boards do, the timeline forks. Boards are processed earliest
//! game-time first, then lowest timeline id, because fork ids are handed
//! out from the running maximum.

use std::collections::{BTreeMap, HashSet};

use crate::map::RegionMap;
use crate::world::{Board, Location, OrderKind, OrderStatus, Phase, Unit, World};

/// Advances every board flagged `might_advance`, unless retreats are
/// outstanding. `retreated` holds the locations of units that were
/// dislodged this pass; their stale orders no longer bind units.
pub fn execute_orders(world: &mut World, map: &RegionMap, retreated: &[Location]) {
    if world.has_retreats() {
        return;
    }

    let mut advancing: Vec<usize> = (0..world.boards.len())
        .filter(|&i| world.boards[i].might_advance)
        .collect();
    advancing.sort_by_key(|&i| (world.boards[i].time_index(), world.boards[i].timeline));

    for bi in advancing {
        world.boards[bi].might_advance = false;
        let next = create_next_board(world, bi, map, retreated);

        let child_timelines = world.boards[bi].child_timelines.clone();
        let existing: Vec<usize> = (0..world.boards.len())
            .filter(|&i| {
                let board = &world.boards[i];
                board.year == next.year
                    && board.phase == next.phase
                    && (board.timeline == next.timeline
                        || child_timelines.contains(&board.timeline))
            })
            .collect();

        if existing.is_empty() {
            world.boards.push(next);
            continue;
        }

        // An equivalent future already exists: merge by doing nothing.
        let diverges = existing
            .iter()
            .all(|&i| !world.boards[i].same_position(&next));
        if diverges {
            let fork = world.max_timeline() + 1;
            let mut forked = next;
            forked.timeline = fork;
            for centre in &mut forked.centres {
                centre.location.timeline = fork;
            }
            for unit in &mut forked.units {
                unit.location.timeline = fork;
            }
            world.boards[bi].child_timelines.push(fork);
            world.boards.push(forked);
        }
    }
}

fn create_next_board(world: &World, bi: usize, map: &RegionMap, retreated: &[Location]) -> Board {
    let board = &world.boards[bi];
    if board.phase == Phase::Winter {
        advance_minor_board(world, board)
    } else {
        advance_major_board(world, board, map, retreated)
    }
}

/// Spring -> Fall or Fall -> Winter: units carry over via holds and land
/// via successful incoming moves; a new Winter board also hands centre
/// ownership to whichever unit stands on the centre or one of its coasts.
fn advance_major_board(
    world: &World,
    board: &Board,
    map: &RegionMap,
    retreated: &[Location],
) -> Board {
    let timeline = board.timeline;
    let year = board.year;
    let phase = board.phase.next();

    let carry = |region: &str| Location::new(timeline, year, phase, region);
    let mut units: BTreeMap<String, Unit> = BTreeMap::new();

    // Units that never received an order hold in place.
    for unit in &board.units {
        let has_order = world.orders.iter().any(|o| o.location == unit.location);
        if !has_order && !retreated.contains(&unit.location) {
            let mut carried = unit.clone();
            carried.location = carry(&unit.location.region);
            units.insert(unit.location.region.clone(), carried);
        }
    }

    // Orders that keep their unit in place: everything except a departed
    // move, a disband, or a build.
    for order in &world.orders {
        if !board.contains(&order.location) || retreated.contains(&order.location) {
            continue;
        }
        match &order.kind {
            OrderKind::Build | OrderKind::Disband => continue,
            OrderKind::Move { .. } if order.status.succeeded() => continue,
            _ => {}
        }
        if let Some(unit) = board.unit_at(&order.location.region) {
            let mut carried = unit.clone();
            carried.location = carry(&unit.location.region);
            units.insert(unit.location.region.clone(), carried);
        }
    }

    // Successful moves (including resolved retreats) land at their
    // destination on this board.
    for order in &world.orders {
        if !order.is_move() || !order.status.succeeded() {
            continue;
        }
        let Some(destination) = order.move_destination() else {
            continue;
        };
        if !board.contains(destination) {
            continue;
        }
        units.insert(
            destination.region.clone(),
            Unit::new(order.owner, order.unit_kind, carry(&destination.region)),
        );
    }

    let mut centres: Vec<_> = board
        .centres
        .iter()
        .map(|c| {
            let mut centre = c.clone();
            centre.location = carry(&c.location.region);
            centre
        })
        .collect();

    if phase == Phase::Winter {
        for centre in &mut centres {
            let children = map.children_of(&centre.location.region);
            let occupier = units.values().find(|u| {
                u.location.region == centre.location.region
                    || children.iter().any(|c| c.id == u.location.region)
            });
            if let Some(unit) = occupier {
                centre.owner = Some(unit.owner);
            }
        }
    }

    Board {
        timeline,
        year,
        phase,
        child_timelines: Vec::new(),
        centres,
        units: units.into_values().collect(),
        might_advance: false,
    }
}

/// Winter -> next year's Spring: apply succeeded builds and disbands.
fn advance_minor_board(world: &World, board: &Board) -> Board {
    let timeline = board.timeline;
    let year = board.year + 1;
    let phase = Phase::Spring;
    let carry = |region: &str| Location::new(timeline, year, phase, region);

    let disbanded: HashSet<&str> = world
        .orders
        .iter()
        .filter(|o| {
            matches!(o.kind, OrderKind::Disband)
                && o.status == OrderStatus::Success
                && board.contains(&o.location)
        })
        .map(|o| o.location.region.as_str())
        .collect();

    let mut units: Vec<Unit> = board
        .units
        .iter()
        .filter(|u| !disbanded.contains(u.location.region.as_str()))
        .map(|u| {
            let mut carried = u.clone();
            carried.location = carry(&u.location.region);
            carried
        })
        .collect();

    for order in &world.orders {
        if matches!(order.kind, OrderKind::Build)
            && order.status == OrderStatus::Success
            && board.contains(&order.location)
        {
            units.push(Unit::new(
                order.owner,
                order.unit_kind,
                carry(&order.location.region),
            ));
        }
    }

    let centres = board
        .centres
        .iter()
        .map(|c| {
            let mut centre = c.clone();
            centre.location = carry(&c.location.region);
            centre
        })
        .collect();

    Board {
        timeline,
        year,
        phase,
        child_timelines: Vec::new(),
        centres,
        units,
        might_advance: false,
    }
}
