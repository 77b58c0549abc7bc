use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chronopolitik::adjudicate;
use chronopolitik::world::factory::default_world;
use chronopolitik::{Location, Nation, Order, OrderKind, Phase, UnitKind};

fn loc(region: &str) -> Location {
    Location::new(1, 1901, Phase::Spring, region)
}

fn mv(owner: Nation, kind: UnitKind, from: &str, to: &str) -> Order {
    Order::new(
        owner,
        kind,
        loc(from),
        OrderKind::Move {
            destination: loc(to),
        },
    )
}

/// A realistic opening: every power moves, the rest hold implicitly.
fn opening_orders() -> Vec<Order> {
    vec![
        mv(Nation::Austria, UnitKind::Army, "Vie", "Gal"),
        mv(Nation::Austria, UnitKind::Fleet, "Tri", "Alb"),
        mv(Nation::England, UnitKind::Fleet, "Lon", "NTH"),
        mv(Nation::England, UnitKind::Fleet, "Edi", "NRG"),
        mv(Nation::France, UnitKind::Army, "Par", "Bur"),
        mv(Nation::France, UnitKind::Fleet, "Bre", "MAO"),
        mv(Nation::Germany, UnitKind::Army, "Mun", "Ruh"),
        mv(Nation::Germany, UnitKind::Fleet, "Kie", "Den"),
        mv(Nation::Italy, UnitKind::Army, "Ven", "Pie"),
        mv(Nation::Italy, UnitKind::Fleet, "Nap", "ION"),
        mv(Nation::Russia, UnitKind::Army, "Mos", "Ukr"),
        mv(Nation::Russia, UnitKind::Fleet, "Sev", "BLA"),
        mv(Nation::Turkey, UnitKind::Army, "Con", "Bul"),
        mv(Nation::Turkey, UnitKind::Fleet, "Ank", "BLA"),
    ]
}

fn bench_opening_adjudication(c: &mut Criterion) {
    c.bench_function("adjudicate_opening", |b| {
        b.iter(|| {
            let mut world = default_world().unwrap();
            adjudicate(black_box(&mut world), black_box(opening_orders()), false).unwrap();
            world
        })
    });
}

fn bench_hold_round(c: &mut Criterion) {
    c.bench_function("adjudicate_22_implicit_holds", |b| {
        b.iter(|| {
            let mut world = default_world().unwrap();
            adjudicate(black_box(&mut world), Vec::new(), false).unwrap();
            world
        })
    });
}

fn bench_two_year_game(c: &mut Criterion) {
    c.bench_function("adjudicate_six_phases", |b| {
        b.iter(|| {
            let mut world = default_world().unwrap();
            adjudicate(&mut world, opening_orders(), false).unwrap();
            for _ in 0..5 {
                adjudicate(&mut world, Vec::new(), false).unwrap();
            }
            world
        })
    });
}

criterion_group!(
    benches,
    bench_opening_adjudication,
    bench_hold_round,
    bench_two_year_game
);
criterion_main!(benches);
