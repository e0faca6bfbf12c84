//! # letterfall-algo - Adaptive difficulty engine for the LetterFall game
//!
//! This crate provides the pure-Rust decision core of an arcade reaction
//! game in which falling targets tagged with letters must be cleared before
//! they strike the ground. The engine decides, tick by tick, which letter
//! to spawn next, how long it falls, and when its hint is revealed, based
//! on a continuously updated per-letter knowledge estimate:
//!
//! - **Bayesian Knowledge Tracing (BKT)** - per-letter mastery probability,
//!   updated by correct/incorrect observations and continuous exponential
//!   decay modulated by a per-letter success score
//! - **Softmax selection** - spawn sampling biased toward weakly-known
//!   letters, with every eligible letter keeping non-zero probability
//! - **Progressive curriculum** - the letter pool grows as mastery crosses
//!   a threshold, and never shrinks
//! - **Outcome routing** - at most one terminal knowledge update per
//!   spawned target, with hint-assisted answers optionally discounted
//!
//! ## Design goals
//!
//! - **Pure Rust** - no binding or rendering dependencies; the game loop,
//!   UI and input recognition are external collaborators
//! - **Deterministic** - all sampling runs on a seedable ChaCha RNG
//! - **Fully tested** - scenario tests per module plus property-based
//!   invariant tests
//!
//! ## Module structure
//!
//! - [`bkt`] - BKT knowledge model (Bayes updates, decay, queries)
//! - [`curriculum`] - tested-letter-pool ratchet
//! - [`selection`] - softmax-weighted spawn selection
//! - [`hint`] - mastery-driven hint reveal timing
//! - [`spawner`] - fixed-interval spawn scheduler and spawner variants
//! - [`outcome`] - per-target terminal outcome routing
//! - [`events`] - fire-and-forget gameplay event observer
//! - [`types`] - public types, configuration and constants
//! - [`error`] - construction-time configuration errors

pub mod bkt;
pub mod curriculum;
pub mod error;
pub mod events;
pub mod hint;
pub mod outcome;
pub mod selection;
pub mod spawner;
pub mod types;

pub use bkt::BktModel;
pub use curriculum::Curriculum;
pub use error::ConfigError;
pub use events::{EventSink, GameEvent, NullSink, TracingSink};
pub use hint::HintTiming;
pub use outcome::{KnowledgeOutcome, OutcomeRouter, RoutedOutcome};
pub use selection::SoftmaxSelector;
pub use spawner::{BktSpawner, RandomSpawner, Spawner, WorldView};
pub use types::{BktParams, SpawnerConfig, Symbol, TargetDescriptor, TargetId};
