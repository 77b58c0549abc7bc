//! Multiversal adjudication scenarios.
//!
//! Cross-board movement under strict and loose adjacencies, timeline
//! forking and merging, and the bookkeeping that keeps the branching
//! history consistent.

use chronopolitik::{
    adjudicate, Board, Centre, Location, Nation, Order, OrderKind, OrderStatus, Phase, Unit,
    UnitKind, World,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn loc(timeline: u32, year: i32, phase: Phase, region: &str) -> Location {
    Location::new(timeline, year, phase, region)
}

fn spring(timeline: u32, region: &str) -> Location {
    loc(timeline, 1901, Phase::Spring, region)
}

fn add_board(world: &mut World, timeline: u32, year: i32, phase: Phase) -> usize {
    world.boards.push(Board::new(timeline, year, phase));
    world.boards.len() - 1
}

fn add_unit(world: &mut World, owner: Nation, kind: UnitKind, location: Location) {
    let board = world
        .boards
        .iter_mut()
        .find(|b| b.contains(&location))
        .expect("board for unit");
    board.units.push(Unit::new(owner, kind, location));
}

fn add_centre(world: &mut World, owner: Option<Nation>, location: Location) {
    let board = world
        .boards
        .iter_mut()
        .find(|b| b.contains(&location))
        .expect("board for centre");
    board.centres.push(Centre { owner, location });
}

fn mv(owner: Nation, kind: UnitKind, from: Location, to: Location) -> Order {
    Order::new(owner, kind, from, OrderKind::Move { destination: to })
}

fn board_at(world: &World, timeline: u32, year: i32, phase: Phase) -> Option<&Board> {
    world
        .boards
        .iter()
        .find(|b| b.timeline == timeline && b.year == year && b.phase == phase)
}

// ---------------------------------------------------------------------------
// Cross-board movement
// ---------------------------------------------------------------------------

#[test]
fn move_to_same_region_on_adjacent_timeline() {
    let mut world = World::new();
    add_board(&mut world, 1, 1901, Phase::Spring);
    add_board(&mut world, 2, 1901, Phase::Spring);
    add_unit(&mut world, Nation::England, UnitKind::Army, spring(1, "Lon"));

    adjudicate(
        &mut world,
        vec![mv(
            Nation::England,
            UnitKind::Army,
            spring(1, "Lon"),
            spring(2, "Lon"),
        )],
        false,
    )
    .unwrap();

    assert_eq!(world.orders[0].status, OrderStatus::Success);
    let top_next = board_at(&world, 1, 1901, Phase::Fall).unwrap();
    assert!(top_next.units.is_empty());
    let bottom_next = board_at(&world, 2, 1901, Phase::Fall).unwrap();
    assert_eq!(bottom_next.unit_at("Lon").unwrap().owner, Nation::England);
}

#[test]
fn same_region_hop_is_legal_under_strict_adjacencies() {
    let mut world = World::new();
    add_board(&mut world, 1, 1901, Phase::Spring);
    add_board(&mut world, 2, 1901, Phase::Spring);
    add_unit(&mut world, Nation::Turkey, UnitKind::Fleet, spring(1, "Smy"));

    adjudicate(
        &mut world,
        vec![mv(
            Nation::Turkey,
            UnitKind::Fleet,
            spring(1, "Smy"),
            spring(2, "Smy"),
        )],
        true,
    )
    .unwrap();

    assert_eq!(world.orders[0].status, OrderStatus::Success);
    assert!(board_at(&world, 2, 1901, Phase::Fall)
        .unwrap()
        .unit_at("Smy")
        .is_some());
}

#[test]
fn neighbouring_region_hop_needs_loose_adjacencies() {
    let run = |strict: bool| {
        let mut world = World::new();
        add_board(&mut world, 1, 1901, Phase::Spring);
        add_board(&mut world, 2, 1901, Phase::Spring);
        add_unit(&mut world, Nation::Austria, UnitKind::Army, spring(2, "Vie"));
        adjudicate(
            &mut world,
            vec![mv(
                Nation::Austria,
                UnitKind::Army,
                spring(2, "Vie"),
                spring(1, "Bud"),
            )],
            strict,
        )
        .unwrap();
        world.orders[0].status
    };

    assert_eq!(run(false), OrderStatus::Success);
    assert_eq!(run(true), OrderStatus::Invalid);
}

#[test]
fn non_neighbouring_region_hop_is_invalid() {
    let mut world = World::new();
    add_board(&mut world, 1, 1901, Phase::Spring);
    add_board(&mut world, 2, 1901, Phase::Spring);
    add_unit(&mut world, Nation::England, UnitKind::Fleet, spring(1, "Lvp"));

    adjudicate(
        &mut world,
        vec![mv(
            Nation::England,
            UnitKind::Fleet,
            spring(1, "Lvp"),
            spring(2, "Edi"),
        )],
        false,
    )
    .unwrap();

    assert_eq!(world.orders[0].status, OrderStatus::Invalid);
    // The unit holds in place instead.
    assert!(board_at(&world, 1, 1901, Phase::Fall)
        .unwrap()
        .unit_at("Lvp")
        .is_some());
}

#[test]
fn coasts_do_not_connect_across_timelines() {
    let mut world = World::new();
    add_board(&mut world, 1, 1901, Phase::Spring);
    add_board(&mut world, 2, 1901, Phase::Spring);
    add_unit(&mut world, Nation::France, UnitKind::Fleet, spring(2, "Spa_S"));

    adjudicate(
        &mut world,
        vec![mv(
            Nation::France,
            UnitKind::Fleet,
            spring(2, "Spa_S"),
            spring(1, "Spa_N"),
        )],
        false,
    )
    .unwrap();

    assert_eq!(world.orders[0].status, OrderStatus::Invalid);
}

#[test]
fn no_diagonal_movement_through_time_and_timelines() {
    let mut world = World::new();
    add_board(&mut world, 1, 1901, Phase::Fall);
    add_board(&mut world, 2, 1901, Phase::Spring);
    add_unit(
        &mut world,
        Nation::Germany,
        UnitKind::Army,
        loc(1, 1901, Phase::Fall, "Mun"),
    );

    adjudicate(
        &mut world,
        vec![mv(
            Nation::Germany,
            UnitKind::Army,
            loc(1, 1901, Phase::Fall, "Mun"),
            spring(2, "Mun"),
        )],
        false,
    )
    .unwrap();

    assert_eq!(world.orders[0].status, OrderStatus::Invalid);
}

#[test]
fn timeline_hops_are_limited_to_neighbours() {
    let mut world = World::new();
    add_board(&mut world, 1, 1901, Phase::Spring);
    add_board(&mut world, 2, 1901, Phase::Spring);
    add_board(&mut world, 3, 1901, Phase::Spring);
    add_unit(&mut world, Nation::England, UnitKind::Army, spring(1, "Lon"));

    adjudicate(
        &mut world,
        vec![mv(
            Nation::England,
            UnitKind::Army,
            spring(1, "Lon"),
            spring(3, "Lon"),
        )],
        false,
    )
    .unwrap();

    assert_eq!(world.orders[0].status, OrderStatus::Invalid);
    assert!(board_at(&world, 1, 1901, Phase::Fall)
        .unwrap()
        .unit_at("Lon")
        .is_some());
    // Timeline 2 was never touched by anything; it does not advance.
    assert!(board_at(&world, 2, 1901, Phase::Fall).is_none());
}

#[test]
fn only_the_immediate_past_major_board_is_reachable() {
    let mut world = World::new();
    add_board(&mut world, 1, 1902, Phase::Spring);
    add_board(&mut world, 1, 1901, Phase::Winter);
    add_board(&mut world, 1, 1901, Phase::Fall);
    add_board(&mut world, 1, 1901, Phase::Spring);
    add_unit(
        &mut world,
        Nation::France,
        UnitKind::Army,
        loc(1, 1902, Phase::Spring, "Par"),
    );

    // Two major boards back: too far.
    adjudicate(
        &mut world,
        vec![mv(
            Nation::France,
            UnitKind::Army,
            loc(1, 1902, Phase::Spring, "Par"),
            spring(1, "Gas"),
        )],
        false,
    )
    .unwrap();
    assert_eq!(world.orders[0].status, OrderStatus::Invalid);

    // The immediately preceding major board works and forks history.
    let second_move = world.orders.len();
    adjudicate(
        &mut world,
        vec![mv(
            Nation::France,
            UnitKind::Army,
            loc(1, 1902, Phase::Spring, "Par"),
            loc(1, 1901, Phase::Fall, "Gas"),
        )],
        false,
    )
    .unwrap();
    assert_eq!(world.orders[second_move].status, OrderStatus::Success);
    let forked = board_at(&world, 2, 1901, Phase::Winter).unwrap();
    assert_eq!(forked.unit_at("Gas").unwrap().owner, Nation::France);
}

#[test]
fn winter_boards_are_unreachable() {
    let mut world = World::new();
    add_board(&mut world, 1, 1902, Phase::Spring);
    add_board(&mut world, 1, 1901, Phase::Winter);
    add_unit(
        &mut world,
        Nation::Russia,
        UnitKind::Fleet,
        loc(1, 1902, Phase::Spring, "Sev"),
    );
    add_unit(
        &mut world,
        Nation::Russia,
        UnitKind::Fleet,
        loc(1, 1901, Phase::Winter, "Sev"),
    );

    adjudicate(
        &mut world,
        vec![mv(
            Nation::Russia,
            UnitKind::Fleet,
            loc(1, 1902, Phase::Spring, "Sev"),
            loc(1, 1901, Phase::Winter, "Sev"),
        )],
        false,
    )
    .unwrap();

    assert_eq!(world.orders[0].status, OrderStatus::Invalid);
}

// ---------------------------------------------------------------------------
// Fork and merge
// ---------------------------------------------------------------------------

#[test]
fn divergent_outcome_forks_the_timeline() {
    let mut world = World::new();
    let past = add_board(&mut world, 1, 1901, Phase::Spring);
    add_board(&mut world, 1, 1901, Phase::Fall);
    add_unit(&mut world, Nation::Austria, UnitKind::Army, spring(1, "Vie"));
    add_unit(
        &mut world,
        Nation::Austria,
        UnitKind::Army,
        loc(1, 1901, Phase::Fall, "Vie"),
    );

    // The army in the present attacks Budapest in the past.
    adjudicate(
        &mut world,
        vec![mv(
            Nation::Austria,
            UnitKind::Army,
            loc(1, 1901, Phase::Fall, "Vie"),
            spring(1, "Bud"),
        )],
        false,
    )
    .unwrap();

    // The past's new future (army in Vie and Bud) contradicts the existing
    // Fall board (army in Vie only): a new timeline appears.
    assert_eq!(world.boards[past].child_timelines, vec![2]);
    let forked = board_at(&world, 2, 1901, Phase::Fall).unwrap();
    assert!(forked.unit_at("Vie").is_some());
    assert!(forked.unit_at("Bud").is_some());
    assert!(forked.units.iter().all(|u| u.location.timeline == 2));
    assert_eq!(world.max_timeline(), 2);
}

#[test]
fn identical_outcome_merges_into_the_existing_future() {
    let mut world = World::new();
    let past = add_board(&mut world, 1, 1901, Phase::Spring);
    add_board(&mut world, 1, 1901, Phase::Fall);
    add_unit(&mut world, Nation::Austria, UnitKind::Army, spring(1, "Vie"));
    add_unit(
        &mut world,
        Nation::Austria,
        UnitKind::Army,
        loc(1, 1901, Phase::Fall, "Vie"),
    );
    add_unit(
        &mut world,
        Nation::Austria,
        UnitKind::Army,
        loc(1, 1901, Phase::Fall, "Bud"),
    );

    // Budapest's army steps into the past onto its own region; the past's
    // future then matches the board that already exists.
    adjudicate(
        &mut world,
        vec![mv(
            Nation::Austria,
            UnitKind::Army,
            loc(1, 1901, Phase::Fall, "Bud"),
            spring(1, "Bud"),
        )],
        false,
    )
    .unwrap();

    assert_eq!(world.orders[0].status, OrderStatus::Success);
    assert!(world.boards[past].child_timelines.is_empty());
    assert_eq!(world.max_timeline(), 1);
    // Only the present's own advance added a board.
    assert!(board_at(&world, 1, 1901, Phase::Winter).is_some());
    assert_eq!(world.boards.len(), 3);
}

#[test]
fn fork_ids_grow_from_the_running_maximum() {
    let mut world = World::new();
    let past = add_board(&mut world, 1, 1901, Phase::Spring);
    add_board(&mut world, 1, 1901, Phase::Fall);
    add_board(&mut world, 5, 1901, Phase::Spring);
    add_unit(&mut world, Nation::Austria, UnitKind::Army, spring(1, "Vie"));
    add_unit(
        &mut world,
        Nation::Austria,
        UnitKind::Army,
        loc(1, 1901, Phase::Fall, "Vie"),
    );

    adjudicate(
        &mut world,
        vec![mv(
            Nation::Austria,
            UnitKind::Army,
            loc(1, 1901, Phase::Fall, "Vie"),
            spring(1, "Bud"),
        )],
        false,
    )
    .unwrap();

    // Highest timeline in play is 5, so the fork becomes 6.
    assert_eq!(world.boards[past].child_timelines, vec![6]);
    assert!(board_at(&world, 6, 1901, Phase::Fall).is_some());
}

// ---------------------------------------------------------------------------
// Parallel phases
// ---------------------------------------------------------------------------

#[test]
fn movement_and_adjustment_phases_advance_together() {
    let mut world = World::new();
    add_board(&mut world, 1, 1902, Phase::Spring);
    add_board(&mut world, 2, 1901, Phase::Winter);
    add_unit(
        &mut world,
        Nation::England,
        UnitKind::Fleet,
        loc(1, 1902, Phase::Spring, "Edi"),
    );
    add_centre(
        &mut world,
        Some(Nation::Germany),
        loc(2, 1901, Phase::Winter, "Ber"),
    );

    adjudicate(
        &mut world,
        vec![
            mv(
                Nation::England,
                UnitKind::Fleet,
                loc(1, 1902, Phase::Spring, "Edi"),
                loc(1, 1902, Phase::Spring, "Cly"),
            ),
            Order::new(
                Nation::Germany,
                UnitKind::Army,
                loc(2, 1901, Phase::Winter, "Ber"),
                OrderKind::Build,
            ),
        ],
        false,
    )
    .unwrap();

    assert_eq!(world.orders[0].status, OrderStatus::Success);
    assert_eq!(world.orders[1].status, OrderStatus::Success);
    assert!(board_at(&world, 1, 1902, Phase::Fall)
        .unwrap()
        .unit_at("Cly")
        .is_some());
    assert!(board_at(&world, 2, 1902, Phase::Spring)
        .unwrap()
        .unit_at("Ber")
        .is_some());
}

// ---------------------------------------------------------------------------
// Derived world state
// ---------------------------------------------------------------------------

#[test]
fn active_boards_follow_each_timeline_head() {
    let mut world = World::new();
    add_board(&mut world, 1, 1901, Phase::Spring);
    add_unit(&mut world, Nation::Austria, UnitKind::Army, spring(1, "Vie"));

    adjudicate(&mut world, Vec::new(), false).unwrap();

    let active = world.active_boards();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].phase, Phase::Fall);
}

#[test]
fn living_players_come_from_active_centres_only() {
    let mut world = World::new();
    add_board(&mut world, 1, 1901, Phase::Spring);
    add_centre(&mut world, Some(Nation::Austria), spring(1, "Vie"));
    add_centre(&mut world, Some(Nation::Russia), spring(1, "Mos"));
    add_unit(&mut world, Nation::Austria, UnitKind::Army, spring(1, "Vie"));

    adjudicate(&mut world, Vec::new(), false).unwrap();

    // The new active board carried both centres forward.
    assert_eq!(
        world.living_players(),
        vec![Nation::Austria, Nation::Russia]
    );
}
