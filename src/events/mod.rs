//! Gameplay event observer
//!
//! The engine emits a structured event for every spawn, hint reveal,
//! destruction, ground hit, knowledge update and periodic full-mastery
//! snapshot. Delivery is fire-and-forget: the engine never blocks on a
//! sink and never depends on delivery succeeding. Durable persistence
//! (the append-only session log) lives outside this crate and subscribes
//! through [`EventSink`].

use serde::Serialize;

use crate::outcome::KnowledgeOutcome;
use crate::types::{Symbol, TargetId};

/// One gameplay event, serializable as a tagged JSON object.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    TargetSpawned {
        target_id: TargetId,
        symbol: Symbol,
        column: usize,
        fall_duration_secs: f64,
        hint_reveal_fraction: f64,
    },
    HintShown {
        target_id: TargetId,
        symbol: Symbol,
    },
    TargetDestroyed {
        target_id: TargetId,
        symbol: Symbol,
        by_bomb: bool,
    },
    TargetHitGround {
        target_id: TargetId,
        symbol: Symbol,
    },
    /// A knowledge update routed for one target outcome, with the mastery
    /// value after the update.
    KnowledgeUpdate {
        symbol: Symbol,
        outcome: KnowledgeOutcome,
        mastery: f64,
    },
    /// Periodic full-mastery snapshot over the symbol sequence, in
    /// curriculum order.
    KnowledgeSnapshot {
        mastery: Vec<(Symbol, f64)>,
    },
}

/// Fire-and-forget event observer.
pub trait EventSink {
    fn record(&mut self, event: &GameEvent);
}

/// Discards every event; the default sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: &GameEvent) {}
}

/// Emits each event as a structured `tracing` record with a JSON payload,
/// for consumption by whatever subscriber the host application installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: &GameEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => tracing::info!(target: "letterfall::events", %payload, "game event"),
            Err(err) => tracing::warn!(target: "letterfall::events", %err, "unserializable event"),
        }
    }
}

/// Collects events in order; test support for this crate's modules.
///
/// Clones share the same buffer, so a test can keep a handle after moving
/// the sink into a spawner.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    pub(crate) events: std::rc::Rc<std::cell::RefCell<Vec<GameEvent>>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn snapshot(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn record(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

// ==================== Unit Tests ====================
