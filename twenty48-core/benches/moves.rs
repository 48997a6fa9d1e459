//! Benchmark: cost of one slide/merge pass and of a full autoplayed game.
//!
//! Boards are generated from a seeded `StdRng` so every run measures the
//! same positions.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use twenty48::game::engine::{can_move, slide_and_merge};
use twenty48::{Board, Direction, GameConfig, GameSession, Position};

/// Random well-formed board with about a quarter of the cells empty.
fn random_board(rng: &mut StdRng) -> Board {
    let mut board = Board::EMPTY;
    for pos in Position::all() {
        if rng.gen_range(0..4) != 0 {
            board.set(pos, 1u32 << rng.gen_range(1u32..=10));
        }
    }
    board
}

fn bench_slide_and_merge(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2048);
    let boards: Vec<Board> = (0..256).map(|_| random_board(&mut rng)).collect();

    c.bench_function("slide_and_merge_all_directions", |b| {
        b.iter(|| {
            for board in &boards {
                for dir in Direction::ALL {
                    black_box(slide_and_merge(black_box(board), dir));
                }
            }
        });
    });
}

fn bench_can_move(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let boards: Vec<Board> = (0..256).map(|_| random_board(&mut rng)).collect();

    c.bench_function("can_move", |b| {
        b.iter(|| {
            for board in &boards {
                black_box(can_move(black_box(board)));
            }
        });
    });
}

/// Whole game with a cycling policy; fresh session per iteration.
fn bench_full_game(c: &mut Criterion) {
    c.bench_function("full_game_cycling_policy", |b| {
        b.iter_batched(
            || {
                let mut session = GameSession::new(GameConfig::default(), 99);
                session.start();
                session
            },
            |mut session| {
                let mut step = 0usize;
                while !session.phase().is_terminal() && step < 20_000 {
                    session.apply_move(Direction::ALL[step % 4]);
                    step += 1;
                }
                black_box(session.score());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_slide_and_merge, bench_can_move, bench_full_game);
criterion_main!(benches);
