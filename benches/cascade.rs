use criterion::{Criterion, black_box, criterion_group, criterion_main};
use geojewels::cascade::{CascadeController, CascadeTiming};
use geojewels::gravity;
use geojewels::{Board, Cell, JewelType, MatchRules, find_matches};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Full 10x16 board with the given number of jewel kinds and the top `holes` rows empty.
fn random_board(kinds: u8, holes: usize, seed: u64) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new(10, 16);
    for y in holes..16 {
        for x in 0..10 {
            board.set(x, y, Cell::Jewel(JewelType(rng.random_range(0..kinds))));
        }
    }
    board
}

fn bench_find_matches(c: &mut Criterion) {
    let board = random_board(5, 0, 1);
    let rules = MatchRules::default();
    c.bench_function("find_matches full board", |b| {
        b.iter(|| find_matches(black_box(&board), rules))
    });
}

fn bench_gravity_plan(c: &mut Criterion) {
    let mut board = random_board(5, 0, 2);
    let matches = find_matches(&board, MatchRules::default());
    for cell in matches.iter() {
        board.set(cell.x, cell.y, Cell::Empty);
    }
    c.bench_function("gravity plan after clear", |b| {
        b.iter(|| gravity::plan(black_box(&board)))
    });
}

fn bench_instant_cascade(c: &mut Criterion) {
    let board = random_board(3, 4, 3);
    let rules = MatchRules::default();
    let timing = CascadeTiming {
        clear: Duration::ZERO,
        fall: Duration::ZERO,
    };
    c.bench_function("instant cascade 3 kinds", |b| {
        b.iter(|| {
            let mut board = board.clone();
            let first = find_matches(&board, rules);
            CascadeController::new(timing).resolve_instantly(&mut board, rules, first, |_| {})
        })
    });
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_gravity_plan,
    bench_instant_cascade
);
criterion_main!(benches);
