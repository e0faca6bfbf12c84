//! Public types, configuration and shared constants.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ==================== Constants ====================

/// Numerical tolerance for probability comparisons
pub const EPSILON: f64 = 1e-10;

/// Default initial probability of knowing a symbol, P(L0)
pub const DEFAULT_P_L0: f64 = 0.0;

/// Default learning transition probability, P(T)
pub const DEFAULT_P_T: f64 = 0.1;

/// Default slip probability (wrong answer despite knowing), P(S)
pub const DEFAULT_P_S: f64 = 0.1;

/// Default guess probability (right answer despite not knowing), P(G)
pub const DEFAULT_P_G: f64 = 0.25;

/// Default knowledge decay rate per second at success score 0
pub const DEFAULT_BASE_DECAY_RATE: f64 = 0.05;

/// Default stability factor: how strongly the success score slows decay
pub const DEFAULT_STABILITY_FACTOR: f64 = 0.8;

/// Default softmax temperature for spawn selection
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Default earliest hint reveal point (fraction of the fall)
pub const DEFAULT_HINT_MIN: f64 = 0.3;

/// Default latest hint reveal point (fraction of the fall)
pub const DEFAULT_HINT_MAX: f64 = 0.8;

/// Letters of the default curriculum, ordered by teaching priority
/// (roughly by frequency in text, easiest first)
pub const DEFAULT_SYMBOL_ORDER: &str = "EAISNRTOLUDCMPGBVHFQYXJKWZ";

// ==================== Core Types ====================

/// A symbol the player has to produce; the shipped game uses letters.
pub type Symbol = char;

/// Identity of a spawned target, issued by the engine.
///
/// Outcome deliveries are keyed by this id so that each target contributes
/// at most one terminal knowledge update, even when several world events
/// fire for the same target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

/// Everything the game world needs to place a new falling target.
///
/// The engine only decides what to spawn and when; position, velocity and
/// lifetime belong to the world, which reports back terminal outcomes
/// keyed by `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub id: TargetId,
    pub symbol: Symbol,
    /// Grid column the target falls in
    pub column: usize,
    /// Total transit time from spawn to ground impact
    pub fall_duration_secs: f64,
    /// Fraction of the transit after which the hint is revealed
    /// (0 = spawn instant, 1 = ground impact)
    pub hint_reveal_fraction: f64,
}

// ==================== Configuration ====================

/// Bayesian Knowledge Tracing parameters, shared by all symbols.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BktParams {
    /// P(L0): initial probability of knowing a symbol
    pub p_l0: f64,
    /// P(T): probability of learning on each observation
    pub p_t: f64,
    /// P(S): slip probability
    pub p_s: f64,
    /// P(G): guess probability
    pub p_g: f64,
    /// Decay rate per second at success score 0
    pub base_decay_rate: f64,
    /// How strongly the success score slows decay
    pub stability_factor: f64,
}

impl Default for BktParams {
    fn default() -> Self {
        Self {
            p_l0: DEFAULT_P_L0,
            p_t: DEFAULT_P_T,
            p_s: DEFAULT_P_S,
            p_g: DEFAULT_P_G,
            base_decay_rate: DEFAULT_BASE_DECAY_RATE,
            stability_factor: DEFAULT_STABILITY_FACTOR,
        }
    }
}

impl BktParams {
    /// Validate all parameters; fatal at construction, never at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("p_l0", self.p_l0)?;
        check_probability("p_t", self.p_t)?;
        check_probability("p_s", self.p_s)?;
        check_probability("p_g", self.p_g)?;
        check_non_negative("base_decay_rate", self.base_decay_rate)?;
        check_non_negative("stability_factor", self.stability_factor)?;
        Ok(())
    }
}

/// Configuration of the adaptive spawner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnerConfig {
    /// Ordered symbol sequence; index 0 is taught first
    pub symbols: Vec<Symbol>,
    /// Number of spawn columns in the game grid
    pub grid_columns: usize,
    /// How many symbols are in play at the start
    pub initial_tested_count: usize,
    /// Minimum mastery over the tested pool required to admit a new symbol
    pub overall_knowledge_threshold: f64,
    /// Seconds between spawn attempts
    pub spawn_interval_secs: f64,
    /// Fall duration is sampled uniformly from this range (min, max)
    pub fall_duration_range_secs: (f64, f64),
    /// Earliest hint reveal point
    pub hint_min: f64,
    /// Latest hint reveal point
    pub hint_max: f64,
    /// Softmax temperature for spawn selection
    pub temperature: f64,
    /// When true, a correct answer given after the hint was shown does not
    /// count as evidence of unaided recall
    pub ignore_correct_after_hint: bool,
    /// Seconds between full-mastery snapshot events
    pub snapshot_interval_secs: f64,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOL_ORDER.chars().collect(),
            grid_columns: 10,
            initial_tested_count: 1,
            overall_knowledge_threshold: 0.5,
            spawn_interval_secs: 4.0,
            fall_duration_range_secs: (12.5, 12.5),
            hint_min: DEFAULT_HINT_MIN,
            hint_max: DEFAULT_HINT_MAX,
            temperature: DEFAULT_TEMPERATURE,
            ignore_correct_after_hint: true,
            snapshot_interval_secs: 5.0,
        }
    }
}

impl SpawnerConfig {
    /// Validate the full configuration; fatal at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::EmptySymbolSet);
        }
        let mut seen = std::collections::HashSet::new();
        for &symbol in &self.symbols {
            if !seen.insert(symbol) {
                return Err(ConfigError::DuplicateSymbol(symbol));
            }
        }
        if self.grid_columns == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.initial_tested_count == 0 || self.initial_tested_count > self.symbols.len() {
            return Err(ConfigError::InvalidTestedCount {
                got: self.initial_tested_count,
                max: self.symbols.len(),
            });
        }
        check_probability(
            "overall_knowledge_threshold",
            self.overall_knowledge_threshold,
        )?;
        check_positive("spawn_interval_secs", self.spawn_interval_secs)?;
        check_positive("snapshot_interval_secs", self.snapshot_interval_secs)?;
        check_positive("temperature", self.temperature)?;
        let (fall_min, fall_max) = self.fall_duration_range_secs;
        if !(fall_min.is_finite() && fall_max.is_finite()) || fall_min <= 0.0 || fall_max < fall_min
        {
            return Err(ConfigError::InvalidFallDurationRange {
                min: fall_min,
                max: fall_max,
            });
        }
        if !(self.hint_min.is_finite() && self.hint_max.is_finite())
            || self.hint_min < 0.0
            || self.hint_max > 1.0
            || self.hint_min > self.hint_max
        {
            return Err(ConfigError::InvalidHintBounds {
                min: self.hint_min,
                max: self.hint_max,
            });
        }
        Ok(())
    }
}

// ==================== Validation Helpers ====================

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ProbabilityOutOfRange { name, value });
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::NegativeParameter { name, value });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NonPositiveParameter { name, value });
    }
    Ok(())
}

// ==================== Unit Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bkt_params_are_valid() {
        assert!(BktParams::default().validate().is_ok());
    }

    #[test]
    fn test_default_spawner_config_is_valid() {
        assert!(SpawnerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let params = BktParams {
            p_g: 1.5,
            ..BktParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::ProbabilityOutOfRange {
                name: "p_g",
                value: 1.5
            })
        );
    }

    #[test]
    fn test_nan_parameter_rejected() {
        let params = BktParams {
            base_decay_rate: f64::NAN,
            ..BktParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_empty_symbol_set_rejected() {
        let config = SpawnerConfig {
            symbols: vec![],
            initial_tested_count: 1,
            ..SpawnerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptySymbolSet));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let config = SpawnerConfig {
            symbols: vec!['A', 'B', 'A'],
            ..SpawnerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DuplicateSymbol('A')));
    }

    #[test]
    fn test_tested_count_bounds() {
        let config = SpawnerConfig {
            symbols: vec!['A', 'B'],
            initial_tested_count: 3,
            ..SpawnerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTestedCount { got: 3, max: 2 })
        );
    }

    #[test]
    fn test_inverted_hint_bounds_rejected() {
        let config = SpawnerConfig {
            hint_min: 0.8,
            hint_max: 0.3,
            ..SpawnerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHintBounds { .. })
        ));
    }

    #[test]
    fn test_target_id_display() {
        assert_eq!(TargetId(7).to_string(), "target-7");
    }
}
