//! Property-Based Tests for the adaptive engine
//!
//! Tests the following invariants:
//! - Mastery stays within [0, 1] under arbitrary observation/decay mixes
//! - Decay never raises mastery
//! - The curriculum window only grows, by at most one symbol per check
//! - Softmax selection is a normalized distribution with full support
//! - Hint timing stays within its configured bounds
//! - Outcome routing applies at most one terminal update per target

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

use letterfall_algo::{
    BktModel, BktParams, Curriculum, HintTiming, OutcomeRouter, SoftmaxSelector, Spawner,
    SpawnerConfig, Symbol, TargetId, WorldView,
};

const SYMBOLS: [Symbol; 5] = ['A', 'B', 'C', 'D', 'E'];

fn fresh_model() -> BktModel {
    BktModel::new(SYMBOLS.to_vec(), BktParams::default()).unwrap()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

#[derive(Clone, Copy, Debug)]
enum Op {
    Correct(usize),
    Incorrect(usize),
    Decay(f64),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..SYMBOLS.len()).prop_map(Op::Correct),
        (0..SYMBOLS.len()).prop_map(Op::Incorrect),
        (1u64..=30_000u64).prop_map(|ms| Op::Decay(ms as f64 / 1000.0)),
    ]
}

fn apply(model: &mut BktModel, op: Op) {
    match op {
        Op::Correct(i) => model.update_correct(SYMBOLS[i]),
        Op::Incorrect(i) => model.update_incorrect(SYMBOLS[i]),
        Op::Decay(dt) => model.apply_decay(dt, SYMBOLS.len()),
    }
}

#[derive(Clone, Copy, Debug)]
enum Delivery {
    HintShown,
    DestroyedCorrect,
    DestroyedByBomb,
    HitGround,
}

fn arb_delivery() -> impl Strategy<Value = Delivery> {
    prop_oneof![
        Just(Delivery::HintShown),
        Just(Delivery::DestroyedCorrect),
        Just(Delivery::DestroyedByBomb),
        Just(Delivery::HitGround),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// PBT-1: Mastery stays within [0, 1] whatever the observation history
    #[test]
    fn mastery_stays_within_unit_interval(ops in prop::collection::vec(arb_op(), 0..200)) {
        let mut model = fresh_model();
        for op in ops {
            apply(&mut model, op);
            for (_, mastery) in model.all_knowledge(SYMBOLS.len(), true) {
                prop_assert!((0.0..=1.0).contains(&mastery));
                prop_assert!(mastery.is_finite());
            }
        }
    }

    /// PBT-2: Decay never raises any symbol's mastery
    #[test]
    fn decay_is_monotone_downward(
        ops in prop::collection::vec(arb_op(), 0..50),
        dt in 1u64..=60_000u64,
    ) {
        let mut model = fresh_model();
        for op in ops {
            apply(&mut model, op);
        }

        let before = model.all_knowledge(SYMBOLS.len(), true);
        model.apply_decay(dt as f64 / 1000.0, SYMBOLS.len());
        let after = model.all_knowledge(SYMBOLS.len(), true);

        for ((_, b), (_, a)) in before.iter().zip(after.iter()) {
            prop_assert!(a <= b);
            prop_assert!(*a >= 0.0);
        }
    }

    /// PBT-3: The curriculum window never shrinks and admits at most one
    /// symbol per check
    #[test]
    fn curriculum_grows_one_at_a_time(ops in prop::collection::vec(arb_op(), 0..150)) {
        let mut model = fresh_model();
        let mut curriculum = Curriculum::new(1, SYMBOLS.len(), 0.5);

        for op in ops {
            apply(&mut model, op);
            let before = curriculum.tested_count();
            curriculum.maybe_expand(&model);
            let after = curriculum.tested_count();

            prop_assert!(after >= before);
            prop_assert!(after - before <= 1);
            prop_assert!(after <= SYMBOLS.len());
        }
    }

    /// PBT-4: Softmax selection is a normalized distribution with strictly
    /// positive support over the whole eligible set
    #[test]
    fn softmax_is_a_distribution(
        ops in prop::collection::vec(arb_op(), 0..80),
        temperature in 0.01f64..=2.0f64,
        seed in any::<u64>(),
    ) {
        let mut model = fresh_model();
        for op in ops {
            apply(&mut model, op);
        }
        let selector = SoftmaxSelector::new(temperature);

        let probs = selector.probabilities(&model, &SYMBOLS);
        let total: f64 = probs.iter().map(|&(_, p)| p).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        for (_, p) in &probs {
            prop_assert!(*p > 0.0);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let picked = selector.select(&model, &SYMBOLS, &mut rng);
        prop_assert!(matches!(picked, Some(s) if SYMBOLS.contains(&s)));
    }

    /// PBT-5: Hint timing stays within its bounds for any mastery input
    #[test]
    fn hint_fraction_stays_within_bounds(
        min_millis in 0u64..=500u64,
        span_millis in 0u64..=500u64,
        mastery in -1.0f64..=2.0f64,
    ) {
        let hint_min = min_millis as f64 / 1000.0;
        let hint_max = hint_min + span_millis as f64 / 1000.0;
        let timing = HintTiming::new(hint_min, hint_max);

        let fraction = timing.reveal_fraction(mastery);
        prop_assert!(fraction >= hint_min);
        prop_assert!(fraction <= hint_max);
    }

    /// PBT-6: However events arrive for one target, at most one terminal
    /// update and at most one hint observation reach the model
    #[test]
    fn router_applies_at_most_one_terminal_update(
        deliveries in prop::collection::vec(arb_delivery(), 0..12),
    ) {
        let mut model = fresh_model();
        let mut router = OutcomeRouter::new(true);
        let id = TargetId(1);
        router.register(id, 'A');

        let mut terminal_updates = 0;
        let mut hint_updates = 0;
        for delivery in deliveries {
            let routed = match delivery {
                Delivery::HintShown => {
                    if router.on_hint_shown(id, &mut model).is_some() {
                        hint_updates += 1;
                    }
                    continue;
                }
                Delivery::DestroyedCorrect => router.on_destroyed_correct(id, &mut model),
                Delivery::DestroyedByBomb => router.on_destroyed_by_bomb(id, &mut model),
                Delivery::HitGround => router.on_hit_ground(id, &mut model),
            };
            if routed.is_some() {
                terminal_updates += 1;
            }
        }

        prop_assert!(terminal_updates <= 1);
        prop_assert!(hint_updates <= 1);
        // Score can only come from the single possible correct outcome.
        prop_assert!(model.success_score('A') <= 1);
    }

    /// PBT-7: success_score tracks the halving rule exactly
    #[test]
    fn success_score_follows_halving(ops in prop::collection::vec(arb_op(), 0..100)) {
        let mut model = fresh_model();
        let mut expected: [u32; 5] = [0; 5];

        for op in ops {
            apply(&mut model, op);
            match op {
                Op::Correct(i) => expected[i] += 1,
                Op::Incorrect(i) => expected[i] /= 2,
                Op::Decay(_) => {}
            }
        }

        for (i, &symbol) in SYMBOLS.iter().enumerate() {
            prop_assert_eq!(model.success_score(symbol), expected[i]);
        }
    }
}

// ============================================================================
// Additional Integration Tests
// ============================================================================

#[derive(Default)]
struct EmptyWorld;

impl WorldView for EmptyWorld {
    fn occupied_columns(&self) -> HashSet<usize> {
        HashSet::new()
    }
    fn active_symbols(&self) -> HashSet<Symbol> {
        HashSet::new()
    }
}

fn config() -> SpawnerConfig {
    SpawnerConfig {
        symbols: SYMBOLS.to_vec(),
        ..SpawnerConfig::default()
    }
}

#[test]
fn seeded_spawners_replay_identically() {
    let mut first =
        letterfall_algo::BktSpawner::with_seed(config(), BktParams::default(), 99).unwrap();
    let mut second =
        letterfall_algo::BktSpawner::with_seed(config(), BktParams::default(), 99).unwrap();
    let world = EmptyWorld;

    for step in 0..200 {
        let a = first.tick(0.25, &world);
        let b = second.tick(0.25, &world);
        assert_eq!(a, b, "divergence at step {}", step);
        if let Some(target) = a {
            first.on_destroyed_correct(target.id);
            second.on_destroyed_correct(target.id);
        }
    }
}

#[test]
fn long_session_drives_full_curriculum() {
    let mut spawner =
        letterfall_algo::BktSpawner::with_seed(config(), BktParams::default(), 7).unwrap();
    let world = EmptyWorld;

    // A player who always answers correctly unlocks every symbol.
    for _ in 0..10_000 {
        if let Some(target) = spawner.tick(0.5, &world) {
            spawner.on_destroyed_correct(target.id);
        }
        if spawner.tested_count() == SYMBOLS.len() {
            break;
        }
    }
    assert_eq!(spawner.tested_count(), SYMBOLS.len());
}

#[test]
fn failing_player_never_unlocks_new_symbols() {
    let mut spawner =
        letterfall_algo::BktSpawner::with_seed(config(), BktParams::default(), 7).unwrap();
    let world = EmptyWorld;

    for _ in 0..2_000 {
        if let Some(target) = spawner.tick(0.5, &world) {
            spawner.on_hit_ground(target.id);
        }
    }
    assert_eq!(spawner.tested_count(), 1);
}
