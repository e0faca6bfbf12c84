//! Spawn scheduling
//!
//! A fixed-interval clock that, each tick, applies knowledge decay, runs
//! the curriculum expansion check, and attempts to place a new target in a
//! free column. Two spawner variants share the scheduling skeleton:
//!
//! - [`RandomSpawner`] - uniform letter pick and uniform hint timing; no
//!   knowledge tracking
//! - [`BktSpawner`] - knowledge-tracking spawner: softmax letter selection
//!   over the curriculum window, mastery-driven hint timing, and outcome
//!   routing back into the BKT model
//!
//! The variant is chosen at construction; within a tick the order
//! decay -> curriculum -> spawn is load-bearing (decay can lower the
//! minimum mastery and prevent a spurious expansion in the same tick).

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bkt::BktModel;
use crate::curriculum::Curriculum;
use crate::error::ConfigError;
use crate::events::{EventSink, GameEvent, NullSink};
use crate::hint::HintTiming;
use crate::outcome::{OutcomeRouter, RoutedOutcome};
use crate::selection::SoftmaxSelector;
use crate::types::{BktParams, SpawnerConfig, Symbol, TargetDescriptor, TargetId};

// ==================== Collaborator Interfaces ====================

/// What the engine needs to know about the live game world each tick.
pub trait WorldView {
    /// Columns currently occupied by a live target.
    fn occupied_columns(&self) -> HashSet<usize>;
    /// Symbols currently represented by a live target.
    fn active_symbols(&self) -> HashSet<Symbol>;
}

/// Frame-driven spawner interface, implemented by both variants.
pub trait Spawner {
    /// Advance by `dt` seconds and return a new target when one was
    /// spawned this tick.
    fn tick(&mut self, dt: f64, world: &dyn WorldView) -> Option<TargetDescriptor>;
}

// ==================== Column Picking ====================

/// Pick a free column, preferring columns whose immediate neighbors are
/// also free so simultaneous hint sprites overlap less. Falls back to any
/// free column; `None` when the grid is saturated.
fn pick_free_column<R: Rng + ?Sized>(
    grid_columns: usize,
    occupied: &HashSet<usize>,
    rng: &mut R,
) -> Option<usize> {
    let free: Vec<usize> = (0..grid_columns).filter(|c| !occupied.contains(c)).collect();
    if free.is_empty() {
        return None;
    }

    let safe: Vec<usize> = free
        .iter()
        .copied()
        .filter(|&c| {
            let left_clear = c == 0 || !occupied.contains(&(c - 1));
            let right_clear = !occupied.contains(&(c + 1));
            left_clear && right_clear
        })
        .collect();

    let candidates = if safe.is_empty() { &free } else { &safe };
    candidates.choose(rng).copied()
}

fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

// ==================== Random Spawner ====================

/// Baseline spawner: uniform symbol pick among free symbols, uniform hint
/// timing within the configured bounds. Keeps no knowledge state.
pub struct RandomSpawner {
    config: SpawnerConfig,
    timer: f64,
    rng: ChaCha8Rng,
    next_id: u64,
    sink: Box<dyn EventSink>,
}

impl RandomSpawner {
    pub fn new(config: SpawnerConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, entropy_seed())
    }

    /// Deterministic variant for tests and replays.
    pub fn with_seed(config: SpawnerConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            timer: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 0,
            sink: Box::new(NullSink),
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Attempt one spawn immediately, independent of the interval clock.
    pub fn try_spawn(&mut self, world: &dyn WorldView) -> Option<TargetDescriptor> {
        let occupied = world.occupied_columns();
        let column = pick_free_column(self.config.grid_columns, &occupied, &mut self.rng)?;

        let active = world.active_symbols();
        let free: Vec<Symbol> = self
            .config
            .symbols
            .iter()
            .copied()
            .filter(|s| !active.contains(s))
            .collect();
        let symbol = free.choose(&mut self.rng).copied()?;

        let (fall_min, fall_max) = self.config.fall_duration_range_secs;
        let fall_duration_secs = self.rng.gen_range(fall_min..=fall_max);
        let hint_reveal_fraction = self.rng.gen_range(self.config.hint_min..=self.config.hint_max);

        let id = TargetId(self.next_id);
        self.next_id += 1;

        let descriptor = TargetDescriptor {
            id,
            symbol,
            column,
            fall_duration_secs,
            hint_reveal_fraction,
        };
        self.sink.record(&GameEvent::TargetSpawned {
            target_id: id,
            symbol,
            column,
            fall_duration_secs,
            hint_reveal_fraction,
        });
        Some(descriptor)
    }
}

impl Spawner for RandomSpawner {
    fn tick(&mut self, dt: f64, world: &dyn WorldView) -> Option<TargetDescriptor> {
        if !dt.is_finite() || dt < 0.0 {
            return None;
        }
        self.timer += dt;
        if self.timer >= self.config.spawn_interval_secs {
            // Keep the fractional overrun for fairness under variable
            // frame time.
            self.timer -= self.config.spawn_interval_secs;
            return self.try_spawn(world);
        }
        None
    }
}

// ==================== Knowledge-Tracking Spawner ====================

/// Adaptive spawner driven by the BKT knowledge model.
///
/// Owns the model, curriculum window, selection policy, hint policy and
/// outcome router; the game world drives it through [`Spawner::tick`] and
/// the outcome entry points.
pub struct BktSpawner {
    config: SpawnerConfig,
    model: BktModel,
    curriculum: Curriculum,
    selector: SoftmaxSelector,
    hint: HintTiming,
    router: OutcomeRouter,
    rng: ChaCha8Rng,
    spawn_timer: f64,
    snapshot_timer: f64,
    next_id: u64,
    sink: Box<dyn EventSink>,
}

impl BktSpawner {
    pub fn new(config: SpawnerConfig, params: BktParams) -> Result<Self, ConfigError> {
        Self::with_seed(config, params, entropy_seed())
    }

    /// Deterministic variant for tests and replays.
    pub fn with_seed(
        config: SpawnerConfig,
        params: BktParams,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let model = BktModel::new(config.symbols.clone(), params)?;
        let curriculum = Curriculum::new(
            config.initial_tested_count,
            config.symbols.len(),
            config.overall_knowledge_threshold,
        );
        Ok(Self {
            selector: SoftmaxSelector::new(config.temperature),
            hint: HintTiming::new(config.hint_min, config.hint_max),
            router: OutcomeRouter::new(config.ignore_correct_after_hint),
            model,
            curriculum,
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawn_timer: 0.0,
            snapshot_timer: 0.0,
            next_id: 0,
            sink: Box::new(NullSink),
            config,
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    // ==================== Spawning ====================

    /// Attempt one spawn immediately, independent of the interval clock.
    ///
    /// Transient unavailability (no free column, empty eligible set) is
    /// not an error: the attempt is skipped and retried on the next
    /// qualifying tick.
    pub fn try_spawn(&mut self, world: &dyn WorldView) -> Option<TargetDescriptor> {
        let occupied = world.occupied_columns();
        let column = pick_free_column(self.config.grid_columns, &occupied, &mut self.rng)?;

        let eligible = self.eligible_symbols(&world.active_symbols());
        let symbol = self.selector.select(&self.model, &eligible, &mut self.rng)?;

        let (fall_min, fall_max) = self.config.fall_duration_range_secs;
        let fall_duration_secs = self.rng.gen_range(fall_min..=fall_max);
        let hint_reveal_fraction = self.hint.reveal_fraction(self.model.knowledge(symbol));

        let id = TargetId(self.next_id);
        self.next_id += 1;

        self.router.register(id, symbol);
        self.sink.record(&GameEvent::TargetSpawned {
            target_id: id,
            symbol,
            column,
            fall_duration_secs,
            hint_reveal_fraction,
        });
        Some(TargetDescriptor {
            id,
            symbol,
            column,
            fall_duration_secs,
            hint_reveal_fraction,
        })
    }

    fn eligible_symbols(&self, active: &HashSet<Symbol>) -> Vec<Symbol> {
        self.config.symbols[..self.curriculum.tested_count()]
            .iter()
            .copied()
            .filter(|s| !active.contains(s))
            .collect()
    }

    // ==================== Outcome Entry Points ====================

    /// The player destroyed the target with the right answer.
    pub fn on_destroyed_correct(&mut self, id: TargetId) -> Option<RoutedOutcome> {
        let routed = self.router.on_destroyed_correct(id, &mut self.model)?;
        self.sink.record(&GameEvent::TargetDestroyed {
            target_id: id,
            symbol: routed.symbol,
            by_bomb: false,
        });
        self.record_knowledge(&routed);
        Some(routed)
    }

    /// The target was cleared by a bomb.
    pub fn on_destroyed_by_bomb(&mut self, id: TargetId) -> Option<RoutedOutcome> {
        let routed = self.router.on_destroyed_by_bomb(id, &mut self.model)?;
        self.sink.record(&GameEvent::TargetDestroyed {
            target_id: id,
            symbol: routed.symbol,
            by_bomb: true,
        });
        self.record_knowledge(&routed);
        Some(routed)
    }

    /// The target's hint was revealed.
    pub fn on_hint_shown(&mut self, id: TargetId) -> Option<RoutedOutcome> {
        let routed = self.router.on_hint_shown(id, &mut self.model)?;
        self.sink.record(&GameEvent::HintShown {
            target_id: id,
            symbol: routed.symbol,
        });
        self.record_knowledge(&routed);
        Some(routed)
    }

    /// The target reached the ground or a building.
    pub fn on_hit_ground(&mut self, id: TargetId) -> Option<RoutedOutcome> {
        let routed = self.router.on_hit_ground(id, &mut self.model)?;
        self.sink.record(&GameEvent::TargetHitGround {
            target_id: id,
            symbol: routed.symbol,
        });
        self.record_knowledge(&routed);
        Some(routed)
    }

    /// A target was removed externally (e.g. screen cleared on player
    /// death); drop any pending outcome for it.
    pub fn discard_target(&mut self, id: TargetId) {
        self.router.discard(id);
    }

    /// Drop every tracked target.
    pub fn clear_targets(&mut self) {
        self.router.discard_all();
    }

    fn record_knowledge(&mut self, routed: &RoutedOutcome) {
        self.sink.record(&GameEvent::KnowledgeUpdate {
            symbol: routed.symbol,
            outcome: routed.outcome,
            mastery: routed.mastery,
        });
    }

    // ==================== Introspection ====================

    /// Current mastery of one symbol.
    pub fn current_mastery(&self, symbol: Symbol) -> f64 {
        self.model.knowledge(symbol)
    }

    /// Current success score of one symbol (debug overlays).
    pub fn success_score(&self, symbol: Symbol) -> u32 {
        self.model.success_score(symbol)
    }

    /// Mastery of every symbol in curriculum order.
    pub fn all_mastery(&self, include_untested: bool) -> Vec<(Symbol, f64)> {
        self.model
            .all_knowledge(self.curriculum.tested_count(), include_untested)
    }

    pub fn weakest(&self, n: usize) -> Vec<(Symbol, f64)> {
        self.model.weakest(n, Some(self.curriculum.tested_count()))
    }

    pub fn strongest(&self, n: usize) -> Vec<(Symbol, f64)> {
        self.model.strongest(n, Some(self.curriculum.tested_count()))
    }

    /// Number of symbols currently in play.
    pub fn tested_count(&self) -> usize {
        self.curriculum.tested_count()
    }

    /// The live softmax selection distribution, for display and testing.
    pub fn selection_probabilities(&self, world: &dyn WorldView) -> Vec<(Symbol, f64)> {
        let eligible = self.eligible_symbols(&world.active_symbols());
        self.selector.probabilities(&self.model, &eligible)
    }

    /// Read-only access to the underlying knowledge model.
    pub fn model(&self) -> &BktModel {
        &self.model
    }
}

impl Spawner for BktSpawner {
    fn tick(&mut self, dt: f64, world: &dyn WorldView) -> Option<TargetDescriptor> {
        if !dt.is_finite() || dt < 0.0 {
            return None;
        }

        // Decay before the expansion check, expansion before the spawn
        // attempt.
        self.model.apply_decay(dt, self.curriculum.tested_count());
        self.curriculum.maybe_expand(&self.model);

        self.snapshot_timer += dt;
        if self.snapshot_timer >= self.config.snapshot_interval_secs {
            self.snapshot_timer = 0.0;
            let mastery = self.all_mastery(true);
            self.sink.record(&GameEvent::KnowledgeSnapshot { mastery });
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.config.spawn_interval_secs {
            // Keep the fractional overrun for fairness under variable
            // frame time.
            self.spawn_timer -= self.config.spawn_interval_secs;
            return self.try_spawn(world);
        }
        None
    }
}

// ==================== Unit Tests ====================
