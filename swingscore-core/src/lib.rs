//! SwingScore Core: scoring and gating engine for short-horizon equity screens.
//!
//! This crate holds everything that turns data into numbers:
//! - Domain types (price bars)
//! - Full-series indicator primitives (SMA, EMA, ATR, RSI, ROC, bands, channels)
//! - FeatureEngine: price series to a fixed feature vector
//! - NewsCertaintyScorer: raw text to catalyst, sentiment, deal value and certainty
//! - AlphaGateEngine: saturated alpha score and four conjunctive gates
//! - RiskLevelCalculator: ATR-based stop, targets and trailing-stop ratchet
//! - ScreenConfig: the TOML calibration surface
//!
//! Everything here is pure and synchronous. The only I/O is reading a config file.

pub mod alpha;
pub mod config;
pub mod domain;
pub mod features;
pub mod indicators;
pub mod news;
pub mod risk;

pub use alpha::{AlphaConfig, AlphaGateEngine, AlphaResult};
pub use config::{ConfigError, ScreenConfig};
pub use domain::PriceBar;
pub use features::{FeatureEngine, FeatureError, FeatureVector};
pub use news::{CatalystType, NewsCertaintyScorer, NewsMetrics, Sentiment};
pub use risk::{RiskError, RiskLevelCalculator, RiskLevels, TrailingStop};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engines and their outputs are Send + Sync.
    ///
    /// The runner shares one set of engines across rayon workers.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceBar>();
        require_sync::<PriceBar>();
        require_send::<FeatureVector>();
        require_sync::<FeatureVector>();
        require_send::<NewsMetrics>();
        require_sync::<NewsMetrics>();
        require_send::<AlphaResult>();
        require_sync::<AlphaResult>();
        require_send::<RiskLevels>();
        require_sync::<RiskLevels>();

        require_send::<FeatureEngine>();
        require_sync::<FeatureEngine>();
        require_send::<NewsCertaintyScorer>();
        require_sync::<NewsCertaintyScorer>();
        require_send::<AlphaGateEngine>();
        require_sync::<AlphaGateEngine>();
        require_send::<RiskLevelCalculator>();
        require_sync::<RiskLevelCalculator>();
        require_send::<ScreenConfig>();
        require_sync::<ScreenConfig>();
    }

    /// Scoring a news snippet never needs price data and vice versa.
    #[test]
    fn components_are_independent() {
        fn _features_only(engine: &FeatureEngine, bars: &[PriceBar]) {
            let _ = engine.compute(bars);
        }
        fn _news_only(scorer: &NewsCertaintyScorer, text: &[&str]) -> NewsMetrics {
            scorer.score(text, "T")
        }
    }
}
