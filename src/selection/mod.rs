//! Softmax spawn selection biased toward weakness
//!
//! Given the symbols eligible for spawning (inside the curriculum window
//! and not currently on screen), each symbol is weighted by
//! `exp((1 - mastery) / T)` and one is sampled proportionally.
//!
//! Unlike a hard weakest-k filter this keeps every eligible symbol at
//! strictly positive probability, so a nearly-mastered symbol is never
//! starved of review, while a small temperature concentrates practice on
//! weak symbols exponentially.

use rand::Rng;

use crate::bkt::BktModel;
use crate::types::Symbol;

/// Softmax sampler over `1 - mastery`.
#[derive(Clone, Copy, Debug)]
pub struct SoftmaxSelector {
    temperature: f64,
}

impl SoftmaxSelector {
    /// Temperature is validated as part of the spawner configuration.
    pub fn new(temperature: f64) -> Self {
        Self { temperature }
    }

    /// Normalized selection distribution over the eligible set, in the
    /// order given. Empty for an empty eligible set.
    pub fn probabilities(&self, model: &BktModel, eligible: &[Symbol]) -> Vec<(Symbol, f64)> {
        if eligible.is_empty() {
            return Vec::new();
        }

        // Shift by the maximum exponent before exponentiating so tiny
        // temperatures cannot overflow.
        let exponents: Vec<f64> = eligible
            .iter()
            .map(|&s| (1.0 - model.knowledge(s)) / self.temperature)
            .collect();
        let max_exponent = exponents.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        let weights: Vec<f64> = exponents
            .iter()
            .map(|e| (e - max_exponent).exp())
            .collect();
        let total: f64 = weights.iter().sum();

        eligible
            .iter()
            .zip(&weights)
            .map(|(&symbol, &weight)| (symbol, weight / total))
            .collect()
    }

    /// Sample one symbol proportionally to the softmax weights.
    ///
    /// Returns `None` for an empty eligible set ("no spawn this tick").
    pub fn select<R: Rng + ?Sized>(
        &self,
        model: &BktModel,
        eligible: &[Symbol],
        rng: &mut R,
    ) -> Option<Symbol> {
        let distribution = self.probabilities(model, eligible);
        if distribution.is_empty() {
            return None;
        }

        let roll: f64 = rng.gen();
        let mut cumulative = 0.0;
        for &(symbol, probability) in &distribution {
            cumulative += probability;
            if roll < cumulative {
                return Some(symbol);
            }
        }
        // Floating point slack: fall back to the last symbol.
        distribution.last().map(|&(symbol, _)| symbol)
    }
}

// ==================== Unit Tests ====================
