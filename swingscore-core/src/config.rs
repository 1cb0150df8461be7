//! Screening configuration: every calibration knob in one TOML document.
//!
//! Each section defaults independently, so a file only needs the values it
//! changes:
//!
//! ```toml
//! blacklist = ["SCAMCO"]
//!
//! [alpha.gates]
//! alpha_min = 65.0
//!
//! [news]
//! synthetic_markers = ["[PLACEHOLDER]"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::alpha::AlphaConfig;
use crate::features::FeatureConfig;
use crate::news::{CatalystType, NewsConfig};
use crate::risk::RiskConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.into(),
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub features: FeatureConfig,
    pub news: NewsConfig,
    pub alpha: AlphaConfig,
    pub risk: RiskConfig,
    /// Tickers never screened, compared case-insensitively.
    pub blacklist: Vec<String>,
}

impl ScreenConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn is_blacklisted(&self, ticker: &str) -> bool {
        self.blacklist
            .iter()
            .any(|b| b.trim().eq_ignore_ascii_case(ticker.trim()))
    }

    /// BLAKE3 of the canonical JSON form, hex encoded.
    ///
    /// Struct fields serialize in declaration order and maps are BTreeMaps,
    /// so equal configs always hash equal.
    pub fn fingerprint(&self) -> String {
        // Serialization of plain structs and string-keyed maps cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&json).to_hex().to_string()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_features()?;
        self.validate_news()?;
        self.validate_alpha()?;
        self.validate_risk()
    }

    fn validate_features(&self) -> Result<(), ConfigError> {
        let f = &self.features;
        let periods = [
            ("features.momentum_horizons", f.momentum_horizons.iter().copied().min().unwrap_or(0)),
            ("features.atr_period", f.atr_period),
            ("features.volume_period", f.volume_period),
            ("features.band_period", f.band_period),
            ("features.keltner_ema_period", f.keltner_ema_period),
            ("features.keltner_atr_period", f.keltner_atr_period),
            ("features.breakout_period", f.breakout_period),
            ("features.sma_fast", f.sma_fast),
            ("features.sma_slow", f.sma_slow),
            ("features.rsi_period", f.rsi_period),
        ];
        for (field, period) in periods {
            if period == 0 {
                return Err(invalid(field, "period must be at least 1"));
            }
        }
        for (field, value) in [
            ("features.momentum_scale", f.momentum_scale),
            ("features.band_stddev", f.band_stddev),
            ("features.keltner_multiplier", f.keltner_multiplier),
        ] {
            positive(field, value)?;
        }
        Ok(())
    }

    fn validate_news(&self) -> Result<(), ConfigError> {
        let n = &self.news;
        positive("news.fx.usd_to_local", n.fx.usd_to_local)?;
        positive("news.fx.eur_to_local", n.fx.eur_to_local)?;

        let w = &n.certainty;
        for (field, value) in [
            ("news.certainty.base", w.base),
            ("news.certainty.per_numeric", w.per_numeric),
            ("news.certainty.per_percentage", w.per_percentage),
            ("news.certainty.per_currency_amount", w.per_currency_amount),
            ("news.certainty.specificity_cap", w.specificity_cap),
            ("news.certainty.per_date", w.per_date),
            ("news.certainty.per_fiscal_period", w.per_fiscal_period),
            ("news.certainty.per_year", w.per_year),
            ("news.certainty.temporal_cap", w.temporal_cap),
            ("news.certainty.per_confirmed_action", w.per_confirmed_action),
            ("news.certainty.per_speculation", w.per_speculation),
            ("news.certainty.action_cap", w.action_cap),
            ("news.certainty.per_catalyst_mention", w.per_catalyst_mention),
            ("news.certainty.catalyst_cap", w.catalyst_cap),
            ("news.certainty.parsed_deal_value", w.parsed_deal_value),
            ("news.certainty.money_language", w.money_language),
            ("news.certainty.synthetic_penalty", w.synthetic_penalty),
        ] {
            non_negative(field, value)?;
        }
        fraction("news.certainty.speculative_catalyst_factor", w.speculative_catalyst_factor)?;
        if !(0.0..=100.0).contains(&w.floor) {
            return Err(invalid("news.certainty.floor", "must lie in [0, 100]"));
        }

        for name in n.extra_keywords.keys() {
            match name.parse::<CatalystType>() {
                Ok(CatalystType::None) | Err(_) => {
                    return Err(invalid(
                        format!("news.extra_keywords.{name}"),
                        "not a catalyst category",
                    ))
                }
                Ok(_) => {}
            }
        }
        Ok(())
    }

    fn validate_alpha(&self) -> Result<(), ConfigError> {
        let a = &self.alpha;
        for (name, value) in a.weights.named() {
            non_negative(&format!("alpha.weights.{name}"), value)?;
        }
        if a.weights.total() <= 0.0 {
            return Err(invalid("alpha.weights", "at least one weight must be positive"));
        }
        for (catalyst, value) in a.catalyst_weights.all() {
            non_negative(&format!("alpha.catalyst_weights.{catalyst}"), value)?;
        }
        positive("alpha.relative_volume_saturation", a.relative_volume_saturation)?;
        fraction("alpha.negative_sentiment_factor", a.negative_sentiment_factor)?;
        if !(0.0..=100.0).contains(&a.gates.alpha_min) {
            return Err(invalid("alpha.gates.alpha_min", "must lie in [0, 100]"));
        }
        non_negative("alpha.gates.relative_volume_min", a.gates.relative_volume_min)
    }

    fn validate_risk(&self) -> Result<(), ConfigError> {
        let r = &self.risk;
        positive("risk.stop_multiple", r.stop_multiple)?;
        positive("risk.target_1_multiple", r.target_1_multiple)?;
        positive("risk.trailing_multiple", r.trailing_multiple)?;
        if r.target_2_multiple.is_nan() || r.target_2_multiple < r.target_1_multiple {
            return Err(invalid(
                "risk.target_2_multiple",
                "must be at least target_1_multiple",
            ));
        }
        fraction("risk.target_1_exit_fraction", r.target_1_exit_fraction)?;
        fraction("risk.target_2_exit_fraction", r.target_2_exit_fraction)?;
        if r.target_1_exit_fraction + r.target_2_exit_fraction > 1.0 {
            return Err(invalid("risk", "exit fractions sum past the whole position"));
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite and non-negative, got {value}")))
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite and positive, got {value}")))
    }
}

fn fraction(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must lie in [0, 1], got {value}")))
    }
}
