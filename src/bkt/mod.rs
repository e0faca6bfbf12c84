//! Bayesian Knowledge Tracing with time-based decay
//!
//! Core theory:
//! - Classic two-state BKT: each symbol is either known or not known, and
//!   P(K) is the current probability the player knows it
//! - Every observation applies Bayes' rule with slip/guess likelihoods,
//!   then the learning transition P(T)
//! - Between observations, mastery erodes continuously; a per-symbol
//!   success score slows the erosion, so knowledge earned through repeated
//!   correct answers decays more gracefully than freshly-guessed knowledge
//!
//! Mathematical formulas:
//! - Correct:   P(K|obs) = (1-P(S))·P(K) / [(1-P(S))·P(K) + P(G)·(1-P(K))]
//! - Incorrect: P(K|obs) = P(S)·P(K) / [P(S)·P(K) + (1-P(G))·(1-P(K))]
//! - Learning:  P(K) ← P(K|obs) + (1 - P(K|obs))·P(T)
//! - Decay:     P(K) ← P(K)·exp(-r·dt),  r = base_rate / (1 + c·score)
//!
//! References:
//! - Corbett, A. T., & Anderson, J. R. (1994). Knowledge tracing: Modeling
//!   the acquisition of procedural knowledge.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{BktParams, Symbol};

// ==================== Data Structures ====================

/// Per-symbol knowledge state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeState {
    /// P(K): probability the player knows the symbol, always in [0, 1]
    pub mastery: f64,
    /// Decaying counter of recent correct responses; modulates decay speed
    /// only, never mastery itself
    pub success_score: u32,
}

/// BKT knowledge model over an ordered symbol set.
///
/// Symbol order matters: the prefix of the sequence is the curriculum
/// window, and decay and pool-expansion checks run over that prefix.
#[derive(Clone, Debug, PartialEq)]
pub struct BktModel {
    params: BktParams,
    symbols: Vec<Symbol>,
    states: HashMap<Symbol, KnowledgeState>,
}

enum Observation {
    Correct,
    Incorrect,
}

impl BktModel {
    /// Create a model with every symbol at `p_l0` and success score 0.
    ///
    /// Fails fast on an empty or duplicated symbol set or degenerate
    /// parameters.
    pub fn new(symbols: Vec<Symbol>, params: BktParams) -> Result<Self, ConfigError> {
        params.validate()?;
        if symbols.is_empty() {
            return Err(ConfigError::EmptySymbolSet);
        }
        let mut states = HashMap::with_capacity(symbols.len());
        for &symbol in &symbols {
            let previous = states.insert(
                symbol,
                KnowledgeState {
                    mastery: params.p_l0,
                    success_score: 0,
                },
            );
            if previous.is_some() {
                return Err(ConfigError::DuplicateSymbol(symbol));
            }
        }
        Ok(Self {
            params,
            symbols,
            states,
        })
    }

    pub fn params(&self) -> &BktParams {
        &self.params
    }

    /// The ordered symbol sequence this model was built over.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    // ==================== Observation Updates ====================

    /// Apply a correct observation: Bayes update, learning transition, and
    /// a success score increment.
    ///
    /// Unknown symbols are ignored (caller bug, not a domain error).
    pub fn update_correct(&mut self, symbol: Symbol) {
        let Some(state) = self.observe(symbol, Observation::Correct) else {
            return;
        };
        state.success_score += 1;
    }

    /// Apply an incorrect observation: symmetric Bayes update, learning
    /// transition, and success score halving (integer floor).
    ///
    /// The halving is deliberately asymmetric with the +1 on correct:
    /// decay stability drops fast on a miss and rebuilds slowly.
    pub fn update_incorrect(&mut self, symbol: Symbol) {
        let Some(state) = self.observe(symbol, Observation::Incorrect) else {
            return;
        };
        state.success_score /= 2;
    }

    fn observe(&mut self, symbol: Symbol, observation: Observation) -> Option<&mut KnowledgeState> {
        let params = self.params;
        let state = self.states.get_mut(&symbol)?;
        let prior = state.mastery;

        let (likelihood_known, likelihood_unknown) = match observation {
            Observation::Correct => (1.0 - params.p_s, params.p_g),
            Observation::Incorrect => (params.p_s, 1.0 - params.p_g),
        };

        let evidence = likelihood_known * prior + likelihood_unknown * (1.0 - prior);

        // Degenerate parameters can zero the evidence; skip the Bayes step
        // and apply only the learning transition.
        let posterior = if evidence > 0.0 {
            (likelihood_known * prior) / evidence
        } else {
            prior
        };

        state.mastery = (posterior + (1.0 - posterior) * params.p_t).clamp(0.0, 1.0);
        Some(state)
    }

    // ==================== Decay ====================

    /// Apply continuous decay to every symbol in the curriculum window
    /// (the first `tested_count` symbols of the sequence).
    ///
    /// Effective rate per symbol:
    /// `base_decay_rate / (1 + stability_factor · success_score)`.
    /// Runs every tick regardless of spawn activity.
    pub fn apply_decay(&mut self, dt: f64, tested_count: usize) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }
        let tested = tested_count.min(self.symbols.len());
        for &symbol in &self.symbols[..tested] {
            if let Some(state) = self.states.get_mut(&symbol) {
                let rate = self.params.base_decay_rate
                    / (1.0 + self.params.stability_factor * f64::from(state.success_score));
                state.mastery = (state.mastery * (-rate * dt).exp()).clamp(0.0, 1.0);
            }
        }
    }

    // ==================== Queries ====================

    /// Current mastery, or `p_l0` for a symbol unknown to the model.
    pub fn knowledge(&self, symbol: Symbol) -> f64 {
        self.states
            .get(&symbol)
            .map(|s| s.mastery)
            .unwrap_or(self.params.p_l0)
    }

    /// Current success score, or 0 for a symbol unknown to the model.
    pub fn success_score(&self, symbol: Symbol) -> u32 {
        self.states
            .get(&symbol)
            .map(|s| s.success_score)
            .unwrap_or(0)
    }

    /// Minimum mastery over the first `tested_count` symbols.
    ///
    /// Returns `p_l0` when the window is empty.
    pub fn min_knowledge(&self, tested_count: usize) -> f64 {
        let tested = tested_count.min(self.symbols.len());
        if tested == 0 {
            return self.params.p_l0;
        }
        self.symbols[..tested]
            .iter()
            .map(|&s| self.knowledge(s))
            .fold(f64::INFINITY, f64::min)
    }

    /// The `n` weakest symbols, ascending by mastery.
    ///
    /// `tested_count` restricts the query to the curriculum window; pass
    /// `None` for the full symbol set.
    pub fn weakest(&self, n: usize, tested_count: Option<usize>) -> Vec<(Symbol, f64)> {
        let mut ranked = self.ranked(tested_count);
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }

    /// The `n` strongest symbols, descending by mastery.
    pub fn strongest(&self, n: usize, tested_count: Option<usize>) -> Vec<(Symbol, f64)> {
        let mut ranked = self.ranked(tested_count);
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }

    /// Mastery of every symbol in sequence order.
    ///
    /// With `include_untested = false`, only the first `tested_count`
    /// symbols are returned.
    pub fn all_knowledge(&self, tested_count: usize, include_untested: bool) -> Vec<(Symbol, f64)> {
        let limit = if include_untested {
            self.symbols.len()
        } else {
            tested_count.min(self.symbols.len())
        };
        self.symbols[..limit]
            .iter()
            .map(|&s| (s, self.knowledge(s)))
            .collect()
    }

    fn ranked(&self, tested_count: Option<usize>) -> Vec<(Symbol, f64)> {
        let limit = tested_count
            .unwrap_or(self.symbols.len())
            .min(self.symbols.len());
        self.symbols[..limit]
            .iter()
            .map(|&s| (s, self.knowledge(s)))
            .collect()
    }
}

// ==================== Unit Tests ====================
