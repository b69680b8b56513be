use criterion::{black_box, criterion_group, criterion_main, Criterion};
use guideline_tetris::core::board::FIXTURE_COLOR;
use guideline_tetris::core::session::detect_t_spin;
use guideline_tetris::core::{Board, ManualClock, Session, SessionConfig, Step, Tetromino};
use guideline_tetris::types::{PieceKind, Rotation};

fn new_session(clock: &ManualClock) -> Session<ManualClock> {
    Session::with_clock(SessionConfig::default().with_seed(12345), clock.clone()).unwrap()
}

fn bench_step(c: &mut Criterion) {
    let clock = ManualClock::new();
    let mut session = new_session(&clock);
    let mut latch = session.latch();

    c.bench_function("session_step_8ms", |b| {
        b.iter(|| {
            clock.advance_ms(8);
            if session.step().unwrap() == Step::Halted {
                // topped out
                session = new_session(&clock);
                latch = session.latch();
            }
            if session.board().is_grounded() {
                latch.hard_drop();
            }
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(FIXTURE_COLOR));
                }
            }
            black_box(board.clear_full_rows());
        })
    });
}

fn bench_spawn(c: &mut Criterion) {
    let mut board = Board::new();

    c.bench_function("spawn_piece", |b| {
        b.iter(|| {
            black_box(board.spawn(black_box(PieceKind::T)));
        })
    });
}

fn bench_move(c: &mut Criterion) {
    let mut board = Board::new();
    board.spawn(PieceKind::L);

    c.bench_function("move", |b| {
        b.iter(|| {
            if !board.move_right() {
                while board.move_left() {}
            }
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut board = Board::from_rows(&["#.########", "#..#######", "#.########"]);
    board.set_active(Tetromino::at(PieceKind::T, Rotation::North, 4, 10));

    c.bench_function("rotate", |b| {
        b.iter(|| {
            black_box(board.rotate(true));
        })
    });
}

fn bench_t_spin_detection(c: &mut Criterion) {
    let board = Board::from_rows(&["#...######", "##.#######"]);
    let piece = Tetromino::at(PieceKind::T, Rotation::South, 1, 17);

    c.bench_function("detect_t_spin", |b| {
        b.iter(|| black_box(detect_t_spin(&board, black_box(&piece), false, true)))
    });
}

criterion_group!(
    benches,
    bench_step,
    bench_line_clear,
    bench_spawn,
    bench_move,
    bench_rotate,
    bench_t_spin_detection
);
criterion_main!(benches);
