//! AlphaGateEngine: one saturated conviction score plus four hard gates.
//!
//! Seven sub-scores in [0, 1] are weighted, rescaled to 0–100 by the total
//! weight, and passed through `50 + 50·tanh(x/50 − 1)`. The gates are
//! evaluated independently and a ticker is a pick only when all four pass.

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;
use crate::news::{CatalystType, NewsMetrics, Sentiment};

/// Weights of the seven sub-scores. Defaults sum to 95.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaWeights {
    pub momentum_20: f64,
    pub momentum_60: f64,
    pub relative_volume: f64,
    pub setup: f64,
    pub band_position: f64,
    pub news: f64,
    pub trend_bonus: f64,
}

impl Default for AlphaWeights {
    fn default() -> Self {
        Self {
            momentum_20: 25.0,
            momentum_60: 15.0,
            relative_volume: 10.0,
            setup: 10.0,
            band_position: 10.0,
            news: 20.0,
            trend_bonus: 5.0,
        }
    }
}

impl AlphaWeights {
    pub fn total(&self) -> f64 {
        self.momentum_20
            + self.momentum_60
            + self.relative_volume
            + self.setup
            + self.band_position
            + self.news
            + self.trend_bonus
    }

    pub(crate) fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("momentum_20", self.momentum_20),
            ("momentum_60", self.momentum_60),
            ("relative_volume", self.relative_volume),
            ("setup", self.setup),
            ("band_position", self.band_position),
            ("news", self.news),
            ("trend_bonus", self.trend_bonus),
        ]
    }
}

/// Gate thresholds. Relaxing `require_uptrend` or `require_setup` makes
/// that gate always pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub alpha_min: f64,
    pub relative_volume_min: f64,
    pub require_uptrend: bool,
    pub require_setup: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            alpha_min: 70.0,
            relative_volume_min: 1.5,
            require_uptrend: true,
            require_setup: true,
        }
    }
}

/// How much a catalyst of each kind counts toward the news sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalystWeights {
    pub earnings: f64,
    pub acquisition: f64,
    pub ipo: f64,
    pub investment: f64,
    pub expansion: f64,
    pub contract: f64,
    pub strategic: f64,
    pub regulatory: f64,
    pub dividend: f64,
    pub product: f64,
    pub none: f64,
}

impl Default for CatalystWeights {
    fn default() -> Self {
        Self {
            earnings: 1.0,
            acquisition: 1.0,
            ipo: 0.8,
            investment: 0.8,
            expansion: 0.7,
            contract: 0.9,
            strategic: 0.7,
            regulatory: 0.8,
            dividend: 0.6,
            product: 0.7,
            none: 0.25,
        }
    }
}

impl CatalystWeights {
    pub fn weight(&self, catalyst: CatalystType) -> f64 {
        match catalyst {
            CatalystType::Earnings => self.earnings,
            CatalystType::Acquisition => self.acquisition,
            CatalystType::Ipo => self.ipo,
            CatalystType::Investment => self.investment,
            CatalystType::Expansion => self.expansion,
            CatalystType::Contract => self.contract,
            CatalystType::Strategic => self.strategic,
            CatalystType::Regulatory => self.regulatory,
            CatalystType::Dividend => self.dividend,
            CatalystType::Product => self.product,
            CatalystType::None => self.none,
        }
    }

    pub(crate) fn all(&self) -> impl Iterator<Item = (CatalystType, f64)> + '_ {
        CatalystType::PRIORITY
            .iter()
            .chain(std::iter::once(&CatalystType::None))
            .map(move |&c| (c, self.weight(c)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaConfig {
    pub weights: AlphaWeights,
    pub gates: GateConfig,
    pub catalyst_weights: CatalystWeights,
    /// Relative volume at which the volume sub-score saturates.
    pub relative_volume_saturation: f64,
    /// Multiplier on the news sub-score for negative sentiment.
    pub negative_sentiment_factor: f64,
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            weights: AlphaWeights::default(),
            gates: GateConfig::default(),
            catalyst_weights: CatalystWeights::default(),
            relative_volume_saturation: 3.0,
            negative_sentiment_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaResult {
    /// Saturated score in [0, 100].
    pub alpha: f64,
    /// Weighted sum rescaled to 0–100, before saturation.
    pub raw_score: f64,
    /// News sub-score scaled to 0–100.
    pub news_score: f64,
    pub gate_alpha: bool,
    pub gate_volume: bool,
    pub gate_trend: bool,
    pub gate_setup: bool,
    pub final_pick: bool,
}

/// `50 + 50·tanh(x/50 − 1)`; continuous, increasing, bounded in (0, 100).
pub fn saturate(x: f64) -> f64 {
    50.0 + 50.0 * (x / 50.0 - 1.0).tanh()
}

#[derive(Debug, Clone, Default)]
pub struct AlphaGateEngine {
    config: AlphaConfig,
}

impl AlphaGateEngine {
    pub fn new(config: AlphaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlphaConfig {
        &self.config
    }

    /// News sub-score in [0, 1].
    pub fn news_score(&self, news: &NewsMetrics) -> f64 {
        let mut score = unit(news.certainty / 100.0)
            * self.config.catalyst_weights.weight(news.catalyst_type).max(0.0);
        if news.sentiment == Sentiment::Negative {
            score *= self.config.negative_sentiment_factor;
        }
        unit(score)
    }

    pub fn evaluate(&self, features: &FeatureVector, news: &NewsMetrics) -> AlphaResult {
        let cfg = &self.config;
        let w = &cfg.weights;

        let rvol_score = if cfg.relative_volume_saturation > 0.0 {
            unit(features.relative_volume / cfg.relative_volume_saturation)
        } else {
            1.0
        };
        let setup_score = if features.is_squeeze || features.breakout_direction > 0 {
            1.0
        } else if features.breakout_direction < 0 {
            0.0
        } else {
            0.5
        };
        let news_score = self.news_score(news);
        let trend_bonus = if features.above_sma50 && features.above_sma200 {
            1.0
        } else {
            0.0
        };

        let weighted = w.momentum_20 * unit(features.momentum_20 / 100.0)
            + w.momentum_60 * unit(features.momentum_60 / 100.0)
            + w.relative_volume * rvol_score
            + w.setup * setup_score
            + w.band_position * unit(features.price_band_position / 100.0)
            + w.news * news_score
            + w.trend_bonus * trend_bonus;
        let total = w.total();
        let raw_score = if total > 0.0 {
            (weighted / total * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let alpha = saturate(raw_score);

        let gate_alpha = alpha >= cfg.gates.alpha_min;
        let gate_volume = features.relative_volume >= cfg.gates.relative_volume_min;
        let gate_trend = !cfg.gates.require_uptrend || features.above_sma50;
        let gate_setup =
            !cfg.gates.require_setup || features.is_squeeze || features.breakout_direction != 0;

        AlphaResult {
            alpha,
            raw_score,
            news_score: news_score * 100.0,
            gate_alpha,
            gate_volume,
            gate_trend,
            gate_setup,
            final_pick: gate_alpha && gate_volume && gate_trend && gate_setup,
        }
    }
}

/// Clamp to [0, 1], mapping NaN to 0.
fn unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
