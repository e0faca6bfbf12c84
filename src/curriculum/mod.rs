//! Progressive curriculum window
//!
//! Tracks how many symbols of the ordered sequence are currently in play.
//! The pool grows by one symbol whenever the minimum mastery over the
//! tested prefix crosses the configured threshold, and never shrinks: the
//! curriculum is a ratchet, so difficulty does not regress even when
//! mastery later decays back below the threshold.

use crate::bkt::BktModel;

/// Tested-prefix ratchet over an ordered symbol sequence.
#[derive(Clone, Debug)]
pub struct Curriculum {
    tested_count: usize,
    total: usize,
    threshold: f64,
}

impl Curriculum {
    /// Callers validate `initial_tested_count` and `threshold` as part of
    /// the spawner configuration.
    pub fn new(initial_tested_count: usize, total: usize, threshold: f64) -> Self {
        Self {
            tested_count: initial_tested_count.min(total),
            total,
            threshold,
        }
    }

    /// Number of symbols currently eligible for spawning.
    pub fn tested_count(&self) -> usize {
        self.tested_count
    }

    /// Run the once-per-tick expansion check; returns true when a new
    /// symbol was admitted.
    ///
    /// At most one symbol is admitted per call, even when the threshold
    /// check would also pass for the enlarged window.
    pub fn maybe_expand(&mut self, model: &BktModel) -> bool {
        if self.tested_count >= self.total {
            return false;
        }
        if model.min_knowledge(self.tested_count) >= self.threshold {
            self.tested_count += 1;
            return true;
        }
        false
    }
}

// ==================== Unit Tests ====================
