//! Winter adjustment evaluation.
//!
//! On each active Winter board, every nation may build up to its centre
//! surplus and must disband down to its centre count. Excess orders fail
//! in submission order, and missing disbands are forced in region-id
//! order, so the outcome is a pure function of the submitted batch.

use crate::world::{Nation, Order, OrderKind, OrderStatus, Phase, World, ALL_NATIONS};

/// Evaluates builds and disbands on all active Winter boards.
pub fn evaluate_adjustments(world: &mut World, active: &[usize]) {
    let winter_boards: Vec<usize> = world
        .active_board_indices()
        .into_iter()
        .filter(|&bi| world.boards[bi].phase == Phase::Winter)
        .collect();

    for bi in winter_boards {
        world.boards[bi].might_advance = true;

        let builds: Vec<usize> = active
            .iter()
            .copied()
            .filter(|&i| {
                matches!(world.orders[i].kind, OrderKind::Build)
                    && world.orders[i].status == OrderStatus::New
                    && world.boards[bi].contains(&world.orders[i].location)
            })
            .collect();
        let disbands: Vec<usize> = active
            .iter()
            .copied()
            .filter(|&i| {
                matches!(world.orders[i].kind, OrderKind::Disband)
                    && world.orders[i].status == OrderStatus::New
                    && world.boards[bi].contains(&world.orders[i].location)
            })
            .collect();

        for nation in ALL_NATIONS {
            evaluate_board_for_nation(world, bi, nation, &builds, &disbands);
        }
    }
}

fn evaluate_board_for_nation(
    world: &mut World,
    bi: usize,
    nation: Nation,
    builds: &[usize],
    disbands: &[usize],
) {
    let board = &world.boards[bi];
    let centre_count = board
        .centres
        .iter()
        .filter(|c| c.owner == Some(nation))
        .count() as i32;
    let unit_count = board.units.iter().filter(|u| u.owner == nation).count() as i32;
    let adjustment = centre_count - unit_count;

    let nation_builds: Vec<usize> = builds
        .iter()
        .copied()
        .filter(|&i| world.orders[i].owner == nation)
        .collect();
    let nation_disbands: Vec<usize> = disbands
        .iter()
        .copied()
        .filter(|&i| world.orders[i].owner == nation)
        .collect();

    let allowed_builds = adjustment.max(0) as usize;
    for (position, &i) in nation_builds.iter().enumerate() {
        world.orders[i].status = if position < allowed_builds {
            OrderStatus::Success
        } else {
            OrderStatus::Failure
        };
    }

    let required_disbands = (-adjustment).max(0) as usize;
    for (position, &i) in nation_disbands.iter().enumerate() {
        world.orders[i].status = if position < required_disbands {
            OrderStatus::Success
        } else {
            OrderStatus::Failure
        };
    }

    let missing = required_disbands.saturating_sub(nation_disbands.len());
    if missing == 0 {
        return;
    }

    // Civil disorder: disband unordered units, lowest region id first.
    let ordered_regions: Vec<String> = nation_disbands
        .iter()
        .map(|&i| world.orders[i].location.region.clone())
        .collect();
    let mut candidates: Vec<(Nation, crate::world::UnitKind, crate::world::Location)> = world
        .boards[bi]
        .units
        .iter()
        .filter(|u| u.owner == nation && !ordered_regions.contains(&u.location.region))
        .map(|u| (u.owner, u.kind, u.location.clone()))
        .collect();
    candidates.sort_by(|a, b| a.2.region.cmp(&b.2.region));

    for (owner, kind, location) in candidates.into_iter().take(missing) {
        world.orders.push(Order {
            status: OrderStatus::Success,
            owner,
            unit_kind: kind,
            location,
            kind: OrderKind::Disband,
        });
    }
}
