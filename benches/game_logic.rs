use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tile_match::core::{
    find_matches, generate, resolve_cascades, Board, GameConfig, Palette, Session, SimpleRng,
};
use tile_match::types::{Color, Position, BASE_POINTS, DEFAULT_GRID_SIZE, MAX_CASCADE_ROUNDS};

fn bench_generate(c: &mut Criterion) {
    let palette = Palette::full();
    let mut rng = SimpleRng::new(12345);

    c.bench_function("generate_8x8", |b| {
        b.iter(|| generate(black_box(DEFAULT_GRID_SIZE), &palette, &mut rng))
    });
}

fn bench_find_matches(c: &mut Criterion) {
    let board = generate(DEFAULT_GRID_SIZE, &Palette::full(), &mut SimpleRng::new(12345));

    c.bench_function("find_matches_8x8", |b| {
        b.iter(|| find_matches(black_box(&board)))
    });
}

fn bench_cascade(c: &mut Criterion) {
    // Every row holds a full run: worst case first round
    let rows: Vec<Vec<Color>> = (0..DEFAULT_GRID_SIZE as usize)
        .map(|r| vec![Color::ALL[r % Color::ALL.len()]; DEFAULT_GRID_SIZE as usize])
        .collect();
    let start = Board::from_rows(&rows).unwrap();
    let palette = Palette::full();
    let mut rng = SimpleRng::new(12345);

    c.bench_function("resolve_full_board", |b| {
        b.iter(|| {
            let mut board = start.clone();
            resolve_cascades(
                &mut board,
                &palette,
                &mut rng,
                BASE_POINTS,
                MAX_CASCADE_ROUNDS,
            )
        })
    });
}

fn bench_select(c: &mut Criterion) {
    let mut session = Session::new(GameConfig::default().with_seed(12345)).unwrap();

    c.bench_function("select_reselect", |b| {
        b.iter(|| {
            session.select(black_box(Position::new(0, 0)));
            session.select(black_box(Position::new(4, 4)))
        })
    });
}

criterion_group!(
    benches,
    bench_generate,
    bench_find_matches,
    bench_cascade,
    bench_select
);
criterion_main!(benches);
