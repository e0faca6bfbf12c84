//! Per-target outcome routing
//!
//! The game world reports what happened to each spawned target: destroyed
//! by the right answer, destroyed by a bomb, hint revealed, or ground
//! impact. Several of these can fire for the same target (a target can be
//! destroyed in the same tick it would register a ground hit), but each
//! target must contribute exactly one terminal knowledge update. The
//! router keys every delivery by [`TargetId`] and absorbs duplicates and
//! stale deliveries as no-ops.

use std::collections::HashMap;

use serde::Serialize;

use crate::bkt::BktModel;
use crate::types::{Symbol, TargetId};

/// How a routed outcome affected the knowledge model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeOutcome {
    /// Counted as evidence of unaided recall
    Correct,
    /// Counted as evidence the symbol was not recalled
    Incorrect,
    /// Bomb kill: a free pass, recorded for analytics only
    BombIgnore,
    /// Correct answer after the hint was shown, discounted by policy
    AssistedIgnore,
}

/// Result of routing one outcome delivery.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoutedOutcome {
    pub symbol: Symbol,
    pub outcome: KnowledgeOutcome,
    /// Mastery of the symbol after the update (unchanged for the ignore
    /// outcomes)
    pub mastery: f64,
}

#[derive(Clone, Debug)]
struct TargetRecord {
    symbol: Symbol,
    hint_shown: bool,
}

/// Routes terminal target events to the knowledge model, at most one
/// terminal update per registered target.
///
/// A target's record is removed as soon as a terminal outcome is recorded,
/// so the map only ever holds targets that are still live on screen; later
/// deliveries for a removed id fall through as no-ops.
#[derive(Clone, Debug)]
pub struct OutcomeRouter {
    records: HashMap<TargetId, TargetRecord>,
    ignore_correct_after_hint: bool,
}

impl OutcomeRouter {
    pub fn new(ignore_correct_after_hint: bool) -> Self {
        Self {
            records: HashMap::new(),
            ignore_correct_after_hint,
        }
    }

    /// Start tracking a freshly spawned target.
    pub fn register(&mut self, id: TargetId, symbol: Symbol) {
        self.records.insert(
            id,
            TargetRecord {
                symbol,
                hint_shown: false,
            },
        );
    }

    /// Whether a target is registered and still awaiting its terminal
    /// outcome.
    pub fn is_pending(&self, id: TargetId) -> bool {
        self.records.contains_key(&id)
    }

    /// Number of targets still awaiting a terminal outcome.
    pub fn pending_count(&self) -> usize {
        self.records.len()
    }

    /// The player destroyed the target with the right answer.
    ///
    /// Counts as a correct observation unless the ignore-correct-after-hint
    /// policy applies; either way the target is resolved.
    pub fn on_destroyed_correct(
        &mut self,
        id: TargetId,
        model: &mut BktModel,
    ) -> Option<RoutedOutcome> {
        let record = self.records.remove(&id)?;
        let symbol = record.symbol;

        if self.ignore_correct_after_hint && record.hint_shown {
            // The answer was assisted, not evidence of unaided recall; the
            // hint already counted as an incorrect observation.
            return Some(RoutedOutcome {
                symbol,
                outcome: KnowledgeOutcome::AssistedIgnore,
                mastery: model.knowledge(symbol),
            });
        }

        model.update_correct(symbol);
        Some(RoutedOutcome {
            symbol,
            outcome: KnowledgeOutcome::Correct,
            mastery: model.knowledge(symbol),
        })
    }

    /// The target was cleared by a bomb: a free pass with no knowledge
    /// update.
    pub fn on_destroyed_by_bomb(
        &mut self,
        id: TargetId,
        model: &mut BktModel,
    ) -> Option<RoutedOutcome> {
        let record = self.records.remove(&id)?;
        let symbol = record.symbol;
        Some(RoutedOutcome {
            symbol,
            outcome: KnowledgeOutcome::BombIgnore,
            mastery: model.knowledge(symbol),
        })
    }

    /// The target's hint was revealed: implicit evidence the player did
    /// not recall the symbol unaided.
    ///
    /// Non-terminal (the target stays live) and applied at most once per
    /// target.
    pub fn on_hint_shown(&mut self, id: TargetId, model: &mut BktModel) -> Option<RoutedOutcome> {
        let record = self.records.get_mut(&id)?;
        if record.hint_shown {
            return None;
        }
        record.hint_shown = true;
        let symbol = record.symbol;

        model.update_incorrect(symbol);
        Some(RoutedOutcome {
            symbol,
            outcome: KnowledgeOutcome::Incorrect,
            mastery: model.knowledge(symbol),
        })
    }

    /// The target reached the ground (or a building): an incorrect
    /// observation, unless a terminal outcome was already recorded.
    pub fn on_hit_ground(&mut self, id: TargetId, model: &mut BktModel) -> Option<RoutedOutcome> {
        let record = self.records.remove(&id)?;
        let symbol = record.symbol;

        model.update_incorrect(symbol);
        Some(RoutedOutcome {
            symbol,
            outcome: KnowledgeOutcome::Incorrect,
            mastery: model.knowledge(symbol),
        })
    }

    /// Stop tracking a target that was removed externally (e.g. the whole
    /// screen cleared on player death); later deliveries for it are
    /// dropped.
    pub fn discard(&mut self, id: TargetId) {
        self.records.remove(&id);
    }

    /// Drop every tracked target.
    pub fn discard_all(&mut self) {
        self.records.clear();
    }
}

// ==================== Unit Tests ====================
