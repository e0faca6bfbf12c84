//! Benchmark suite for letterfall-algo
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

use letterfall_algo::{
    BktModel, BktParams, BktSpawner, SoftmaxSelector, Spawner, SpawnerConfig, Symbol, WorldView,
};

struct EmptyWorld;

impl WorldView for EmptyWorld {
    fn occupied_columns(&self) -> HashSet<usize> {
        HashSet::new()
    }
    fn active_symbols(&self) -> HashSet<Symbol> {
        HashSet::new()
    }
}

fn practiced_model() -> BktModel {
    let symbols: Vec<Symbol> = SpawnerConfig::default().symbols;
    let mut model = BktModel::new(symbols.clone(), BktParams::default()).unwrap();
    for (i, &symbol) in symbols.iter().enumerate() {
        for _ in 0..(i % 5) {
            model.update_correct(symbol);
        }
    }
    model
}

fn bench_bkt_update(c: &mut Criterion) {
    c.bench_function("BktModel::update_correct", |b| {
        let mut model = practiced_model();
        b.iter(|| model.update_correct(black_box('E')))
    });
}

fn bench_decay_full_alphabet(c: &mut Criterion) {
    c.bench_function("BktModel::apply_decay/26", |b| {
        let mut model = practiced_model();
        b.iter(|| model.apply_decay(black_box(0.016), 26))
    });
}

fn bench_softmax_probabilities(c: &mut Criterion) {
    let model = practiced_model();
    let eligible: Vec<Symbol> = SpawnerConfig::default().symbols;
    let selector = SoftmaxSelector::new(0.2);
    c.bench_function("SoftmaxSelector::probabilities/26", |b| {
        b.iter(|| selector.probabilities(black_box(&model), black_box(&eligible)))
    });
}

fn bench_softmax_select(c: &mut Criterion) {
    let model = practiced_model();
    let eligible: Vec<Symbol> = SpawnerConfig::default().symbols;
    let selector = SoftmaxSelector::new(0.2);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    c.bench_function("SoftmaxSelector::select/26", |b| {
        b.iter(|| selector.select(black_box(&model), black_box(&eligible), &mut rng))
    });
}

fn bench_spawner_tick(c: &mut Criterion) {
    c.bench_function("BktSpawner::tick", |b| {
        let mut spawner =
            BktSpawner::with_seed(SpawnerConfig::default(), BktParams::default(), 42).unwrap();
        let world = EmptyWorld;
        b.iter(|| spawner.tick(black_box(0.016), &world))
    });
}

criterion_group!(
    benches,
    bench_bkt_update,
    bench_decay_full_alphabet,
    bench_softmax_probabilities,
    bench_softmax_select,
    bench_spawner_tick
);
criterion_main!(benches);
