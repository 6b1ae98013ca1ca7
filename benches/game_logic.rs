use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mind_pairs::core::{DeckRng, GameState, SymbolPool};
use mind_pairs::types::Difficulty;

fn bench_deal(c: &mut Criterion) {
    let pool = SymbolPool::default();
    let mut rng = DeckRng::new(12345);

    c.bench_function("deal_hard", |b| {
        b.iter(|| pool.deal(black_box(Difficulty::Hard), &mut rng))
    });
}

fn bench_play_through(c: &mut Criterion) {
    let pool = SymbolPool::default();
    let mut rng = DeckRng::new(12345);

    c.bench_function("perfect_game_hard", |b| {
        b.iter(|| {
            let cards = pool.deal(Difficulty::Hard, &mut rng);
            let mut state = GameState::new(Difficulty::Hard, cards, None, 1);
            for k in 0..state.total_pairs() {
                state.flip_card(2 * k);
                state.flip_card(2 * k + 1);
            }
            black_box(state.moves())
        })
    });
}

fn bench_mismatch_cycle(c: &mut Criterion) {
    let pool = SymbolPool::default();
    let cards = pool.deal(Difficulty::Hard, &mut DeckRng::new(12345));
    let mut state = GameState::new(Difficulty::Hard, cards, None, 1);

    c.bench_function("mismatch_and_resolve", |b| {
        b.iter(|| {
            state.flip_card(black_box(0));
            state.flip_card(black_box(2));
            state.resolve_mismatch([0, 2])
        })
    });
}

criterion_group!(benches, bench_deal, bench_play_through, bench_mismatch_cycle);
criterion_main!(benches);
