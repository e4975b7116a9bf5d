//! Tunable simulation parameters.
//!
//! Every field has a serde default, so a partial JSON document overrides
//! only what it names:
//!
//! ```
//! use habsim_logic::config::SimConfig;
//! let cfg = SimConfig::from_json(r#"{ "base_step_days": 0.25 }"#).unwrap();
//! assert_eq!(cfg.base_step_days, 0.25);
//! assert_eq!(cfg.tick_period_ms, 1000);
//! ```

use serde::{Deserialize, Serialize};

use crate::collision::PlacementSearch;

/// Per-crew-member, per-day consumption of each resource pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumptionRates {
    /// kg/day
    pub oxygen: f64,
    /// L/day
    pub water: f64,
    /// kWh/day
    pub power: f64,
    /// kg/day
    pub food: f64,
}

impl Default for ConsumptionRates {
    fn default() -> Self {
        Self {
            oxygen: 0.84,
            water: 3.6,
            power: 2.5,
            food: 1.8,
        }
    }
}

/// Weights of compliance and happiness in the per-tick score increment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub compliance: f64,
    pub happiness: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            compliance: 0.5,
            happiness: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Wall-clock period of one simulation tick.
    pub tick_period_ms: u64,
    /// Simulated days per tick at 1× speed.
    pub base_step_days: f64,
    /// Crew movement period at 1×; divided by the speed multiplier.
    pub movement_base_ms: u64,
    pub consumption: ConsumptionRates,
    pub score_weights: ScoreWeights,
    pub placement: PlacementSearch,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1000,
            base_step_days: 0.1,
            movement_base_ms: 400,
            consumption: ConsumptionRates::default(),
            score_weights: ScoreWeights::default(),
            placement: PlacementSearch::default(),
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Simulated days advanced by one tick at `speed`.
    pub fn step_days(&self, speed: u32) -> f64 {
        self.base_step_days * speed as f64
    }

    /// Crew movement period at `speed`, never below 1 ms.
    pub fn movement_period_ms(&self, speed: u32) -> u64 {
        (self.movement_base_ms / u64::from(speed.max(1))).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.tick_period_ms, 1000);
        assert_eq!(cfg.movement_base_ms, 400);
        assert_eq!(cfg.consumption.oxygen, 0.84);
        assert_eq!(cfg.score_weights.compliance, 0.5);
        assert_eq!(cfg.placement.max_attempts, 100);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let cfg = SimConfig::from_json(
            r#"{ "consumption": { "water": 2.0 }, "placement": { "max_attempts": 10 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.consumption.water, 2.0);
        assert_eq!(cfg.consumption.food, 1.8);
        assert_eq!(cfg.placement.max_attempts, 10);
        assert_eq!(cfg.placement.grid_step, 1.0);
        assert_eq!(cfg.base_step_days, 0.1);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(SimConfig::from_json("{ tick_period_ms: }").is_err());
    }

    #[test]
    fn test_step_and_movement_scale_with_speed() {
        let cfg = SimConfig::default();
        assert!((cfg.step_days(12) - 1.2).abs() < 1e-12);
        assert_eq!(cfg.movement_period_ms(1), 400);
        assert_eq!(cfg.movement_period_ms(8), 50);
        assert_eq!(cfg.movement_period_ms(0), 400);
    }
}
