//! Mastery-driven hint timing
//!
//! Converts a symbol's current mastery into the fraction of the target's
//! transit after which the visual hint appears: the less the player knows
//! a symbol, the earlier help arrives.

/// Linear interpolation between the configured hint bounds.
#[derive(Clone, Copy, Debug)]
pub struct HintTiming {
    hint_min: f64,
    hint_max: f64,
}

impl HintTiming {
    /// Bounds are validated as part of the spawner configuration.
    pub fn new(hint_min: f64, hint_max: f64) -> Self {
        Self { hint_min, hint_max }
    }

    /// Reveal point for the given mastery, always within
    /// `[hint_min, hint_max]` and non-decreasing in mastery.
    pub fn reveal_fraction(&self, mastery: f64) -> f64 {
        let base = self.hint_min + mastery * (self.hint_max - self.hint_min);
        base.clamp(self.hint_min, self.hint_max)
    }
}

// ==================== Unit Tests ====================
