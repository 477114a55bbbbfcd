use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetros_engine::{Board, Engine, EngineConfig, Input, PieceKind, SevenBag};

fn bench_step(c: &mut Criterion) {
    c.bench_function("step_idle_16ms", |b| {
        let mut engine = Engine::new(EngineConfig::default(), Some(42)).unwrap();
        b.iter(|| {
            if engine.game_over() {
                engine.reset(None);
            }
            black_box(engine.step(black_box(16), &[]));
        });
    });

    c.bench_function("step_with_inputs", |b| {
        let mut engine = Engine::new(EngineConfig::default(), Some(42)).unwrap();
        let inputs = [Input::MoveLeft, Input::RotateCw, Input::SoftDrop];
        b.iter(|| {
            if engine.game_over() {
                engine.reset(None);
            }
            black_box(engine.step(black_box(16), black_box(&inputs)));
        });
    });

    c.bench_function("hard_drop_full_game", |b| {
        b.iter(|| {
            let mut engine = Engine::new(EngineConfig::default(), Some(7)).unwrap();
            while !engine.game_over() {
                engine.step(16, &[Input::HardDrop]);
            }
            black_box(engine.lines())
        });
    });
}

fn bench_snapshot(c: &mut Criterion) {
    c.bench_function("snapshot_into", |b| {
        let engine = Engine::new(EngineConfig::default(), Some(42)).unwrap();
        let mut snap = engine.snapshot();
        b.iter(|| {
            engine.snapshot_into(&mut snap);
            black_box(&snap);
        });
    });
}

fn bench_board(c: &mut Criterion) {
    c.bench_function("clear_four_rows", |b| {
        let mut template = Board::new();
        for y in 18..22 {
            template.fill_row_except(y, &[], PieceKind::I);
        }
        b.iter(|| {
            let mut board = template.clone();
            let rows = board.find_full_rows();
            board.clear_rows(&rows);
            black_box(board)
        });
    });

    c.bench_function("bag_draw", |b| {
        let mut bag = SevenBag::new(42);
        b.iter(|| black_box(bag.next()));
    });
}

criterion_group!(benches, bench_step, bench_snapshot, bench_board);
criterion_main!(benches);
