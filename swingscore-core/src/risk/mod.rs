//! RiskLevelCalculator: ATR-multiple stop and target levels for a long entry.

mod trailing;

pub use trailing::TrailingStop;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    #[error("invalid risk input: {0}")]
    InvalidInput(String),
}

/// ATR multipliers and the partial-exit convention attached to each target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub stop_multiple: f64,
    pub target_1_multiple: f64,
    pub target_2_multiple: f64,
    pub trailing_multiple: f64,
    /// Share of the position closed at the first target.
    pub target_1_exit_fraction: f64,
    /// Further share closed at the second target.
    pub target_2_exit_fraction: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            stop_multiple: 1.5,
            target_1_multiple: 1.5,
            target_2_multiple: 3.0,
            trailing_multiple: 2.5,
            target_1_exit_fraction: 0.5,
            target_2_exit_fraction: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLevels {
    pub entry: f64,
    pub atr20: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub trailing_stop: f64,
}

impl RiskLevels {
    /// Zero ATR collapses every level onto the entry.
    pub fn is_tradeable(&self) -> bool {
        self.atr20 > 0.0
    }

    /// Loss per share if the initial stop is hit.
    pub fn risk_per_share(&self) -> f64 {
        self.entry - self.stop_loss
    }
}

#[derive(Debug, Clone, Default)]
pub struct RiskLevelCalculator {
    config: RiskConfig,
}

impl RiskLevelCalculator {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn compute(&self, entry_price: f64, atr20: f64) -> Result<RiskLevels, RiskError> {
        if !entry_price.is_finite() || entry_price <= 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "entry price must be positive, got {entry_price}"
            )));
        }
        if !atr20.is_finite() || atr20 < 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "atr20 must be non-negative, got {atr20}"
            )));
        }
        let c = &self.config;
        Ok(RiskLevels {
            entry: entry_price,
            atr20,
            stop_loss: entry_price - c.stop_multiple * atr20,
            take_profit_1: entry_price + c.target_1_multiple * atr20,
            take_profit_2: entry_price + c.target_2_multiple * atr20,
            trailing_stop: entry_price - c.trailing_multiple * atr20,
        })
    }

    /// Start a ratchet at the initial trailing level of `levels`.
    pub fn trailing_stop(&self, levels: &RiskLevels) -> TrailingStop {
        TrailingStop::new(levels.trailing_stop, self.config.trailing_multiple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_from_multiples() {
        let levels = RiskLevelCalculator::default().compute(100.0, 2.0).unwrap();
        assert_eq!(levels.stop_loss, 97.0);
        assert_eq!(levels.take_profit_1, 103.0);
        assert_eq!(levels.take_profit_2, 106.0);
        assert_eq!(levels.trailing_stop, 95.0);
        assert_eq!(levels.risk_per_share(), 3.0);
        assert!(levels.is_tradeable());
    }

    #[test]
    fn zero_atr_is_degenerate_but_valid() {
        let levels = RiskLevelCalculator::default().compute(50.0, 0.0).unwrap();
        assert_eq!(levels.stop_loss, 50.0);
        assert_eq!(levels.take_profit_2, 50.0);
        assert!(!levels.is_tradeable());
    }

    #[test]
    fn rejects_bad_input() {
        let calc = RiskLevelCalculator::default();
        assert!(matches!(calc.compute(0.0, 1.0), Err(RiskError::InvalidInput(_))));
        assert!(matches!(calc.compute(-5.0, 1.0), Err(RiskError::InvalidInput(_))));
        assert!(matches!(calc.compute(10.0, -0.1), Err(RiskError::InvalidInput(_))));
        assert!(matches!(calc.compute(f64::NAN, 1.0), Err(RiskError::InvalidInput(_))));
        assert!(matches!(calc.compute(10.0, f64::INFINITY), Err(RiskError::InvalidInput(_))));
    }

    #[test]
    fn custom_multiples() {
        let config = RiskConfig {
            stop_multiple: 1.0,
            target_2_multiple: 4.0,
            ..RiskConfig::default()
        };
        let levels = RiskLevelCalculator::new(config).compute(10.0, 1.0).unwrap();
        assert_eq!(levels.stop_loss, 9.0);
        assert_eq!(levels.take_profit_2, 14.0);
    }

    #[test]
    fn trailing_stop_starts_at_initial_level() {
        let calc = RiskLevelCalculator::default();
        let levels = calc.compute(100.0, 2.0).unwrap();
        let stop = calc.trailing_stop(&levels);
        assert_eq!(stop.level(), 95.0);
    }
}
