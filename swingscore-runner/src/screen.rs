//! Per-ticker screening pipeline.
//!
//! For each ticker: blacklist check → FeatureEngine → NewsCertaintyScorer →
//! AlphaGateEngine → RiskLevelCalculator. Tickers are independent, so the
//! batch runs either sequentially or on the rayon pool; rows always come
//! back in input order.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use swingscore_core::features::FeatureError;
use swingscore_core::news::{CatalystType, Sentiment};
use swingscore_core::{
    AlphaGateEngine, FeatureEngine, NewsCertaintyScorer, PriceBar, RiskLevelCalculator,
    ScreenConfig,
};
use tracing::{info, warn};

/// Everything the pipeline needs for one ticker.
#[derive(Debug, Clone)]
pub struct TickerInput {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
    pub news: Vec<String>,
    /// Prices were generated, not loaded.
    pub synthetic_prices: bool,
    /// News is the placeholder snippet, not collected text.
    pub placeholder_news: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    Blacklisted,
    InsufficientData { required: usize, actual: usize },
    LoadFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Blacklisted => f.write_str("blacklisted"),
            SkipReason::InsufficientData { required, actual } => {
                write!(f, "insufficient data: {actual} bars, {required} required")
            }
            SkipReason::LoadFailed(e) => write!(f, "load failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

/// One flat output record. Risk columns are empty when risk levels could
/// not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenRow {
    pub ticker: String,
    pub as_of: NaiveDate,
    pub close: f64,

    pub momentum_3: f64,
    pub momentum_20: f64,
    pub momentum_60: f64,
    pub relative_volume: f64,
    pub is_squeeze: bool,
    pub breakout_direction: i8,
    pub price_band_position: f64,
    pub above_sma50: bool,
    pub above_sma200: bool,
    pub rsi14: f64,
    pub atr20: f64,

    pub catalyst_type: CatalystType,
    pub catalyst_count: usize,
    pub deal_value_local_currency: f64,
    pub sentiment: Sentiment,
    pub certainty: f64,

    pub alpha: f64,
    pub raw_score: f64,
    pub news_score: f64,
    pub gate_alpha: bool,
    pub gate_volume: bool,
    pub gate_trend: bool,
    pub gate_setup: bool,
    pub final_pick: bool,

    pub stop_loss: Option<f64>,
    pub take_profit_1: Option<f64>,
    pub take_profit_2: Option<f64>,
    pub trailing_stop: Option<f64>,
    pub tradeable: bool,

    pub synthetic_prices: bool,
    pub placeholder_news: bool,
    pub config_fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    pub config_fingerprint: String,
    pub rows: Vec<ScreenRow>,
    pub skipped: Vec<SkippedTicker>,
}

impl ScreenReport {
    pub fn pick_count(&self) -> usize {
        self.rows.iter().filter(|r| r.final_pick).count()
    }

    pub fn picks(&self) -> impl Iterator<Item = &ScreenRow> {
        self.rows.iter().filter(|r| r.final_pick)
    }

    /// Fraction of screened (not skipped) tickers that passed every gate.
    pub fn pass_rate(&self) -> f64 {
        if self.rows.is_empty() {
            0.0
        } else {
            self.pick_count() as f64 / self.rows.len() as f64
        }
    }
}

/// The four engines built from one configuration.
#[derive(Debug)]
pub struct Screener {
    config: ScreenConfig,
    fingerprint: String,
    features: FeatureEngine,
    news: NewsCertaintyScorer,
    alpha: AlphaGateEngine,
    risk: RiskLevelCalculator,
}

impl Screener {
    pub fn new(config: ScreenConfig) -> Self {
        Self {
            fingerprint: config.fingerprint(),
            features: FeatureEngine::new(config.features.clone()),
            news: NewsCertaintyScorer::new(config.news.clone()),
            alpha: AlphaGateEngine::new(config.alpha.clone()),
            risk: RiskLevelCalculator::new(config.risk.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Run the pipeline for one ticker.
    pub fn evaluate(&self, input: &TickerInput) -> Result<ScreenRow, SkipReason> {
        let ticker = input.ticker.as_str();
        if self.config.is_blacklisted(ticker) {
            info!(ticker, "skipping blacklisted ticker");
            return Err(SkipReason::Blacklisted);
        }

        let f = self.features.compute(&input.bars).map_err(|e| {
            warn!(ticker, error = %e, "skipping ticker");
            match e {
                FeatureError::InsufficientData { required, actual } => {
                    SkipReason::InsufficientData { required, actual }
                }
            }
        })?;

        let n = self.news.score(&input.news, ticker);
        let a = self.alpha.evaluate(&f, &n);

        let risk = match self.risk.compute(f.close, f.atr20) {
            Ok(levels) => Some(levels),
            Err(e) => {
                warn!(ticker, error = %e, "risk levels unavailable");
                None
            }
        };

        Ok(ScreenRow {
            ticker: input.ticker.clone(),
            as_of: f.as_of,
            close: f.close,
            momentum_3: f.momentum_3,
            momentum_20: f.momentum_20,
            momentum_60: f.momentum_60,
            relative_volume: f.relative_volume,
            is_squeeze: f.is_squeeze,
            breakout_direction: f.breakout_direction,
            price_band_position: f.price_band_position,
            above_sma50: f.above_sma50,
            above_sma200: f.above_sma200,
            rsi14: f.rsi14,
            atr20: f.atr20,
            catalyst_type: n.catalyst_type,
            catalyst_count: n.catalyst_count,
            deal_value_local_currency: n.deal_value_local_currency,
            sentiment: n.sentiment,
            certainty: n.certainty,
            alpha: a.alpha,
            raw_score: a.raw_score,
            news_score: a.news_score,
            gate_alpha: a.gate_alpha,
            gate_volume: a.gate_volume,
            gate_trend: a.gate_trend,
            gate_setup: a.gate_setup,
            final_pick: a.final_pick,
            stop_loss: risk.as_ref().map(|r| r.stop_loss),
            take_profit_1: risk.as_ref().map(|r| r.take_profit_1),
            take_profit_2: risk.as_ref().map(|r| r.take_profit_2),
            trailing_stop: risk.as_ref().map(|r| r.trailing_stop),
            tradeable: risk.as_ref().is_some_and(|r| r.is_tradeable()),
            synthetic_prices: input.synthetic_prices,
            placeholder_news: input.placeholder_news,
            config_fingerprint: self.fingerprint.clone(),
        })
    }

    /// Screen a batch. Output rows follow input order in both modes.
    pub fn screen(&self, inputs: &[TickerInput], parallel: bool) -> ScreenReport {
        let outcomes: Vec<Result<ScreenRow, SkipReason>> = if parallel {
            inputs.par_iter().map(|i| self.evaluate(i)).collect()
        } else {
            inputs.iter().map(|i| self.evaluate(i)).collect()
        };

        let mut rows = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for (input, outcome) in inputs.iter().zip(outcomes) {
            match outcome {
                Ok(row) => rows.push(row),
                Err(reason) => skipped.push(SkippedTicker {
                    ticker: input.ticker.clone(),
                    reason,
                }),
            }
        }

        let report = ScreenReport {
            config_fingerprint: self.fingerprint.clone(),
            rows,
            skipped,
        };
        let synthetic = report.rows.iter().filter(|r| r.synthetic_prices).count();
        if synthetic > 0 {
            warn!(synthetic, "screen includes tickers on synthetic prices");
        }
        info!(
            screened = report.rows.len(),
            skipped = report.skipped.len(),
            picks = report.pick_count(),
            "screen complete"
        );
        report
    }
}

/// Build a [`Screener`] from `config` and run it over `inputs`.
pub fn screen(inputs: &[TickerInput], config: &ScreenConfig, parallel: bool) -> ScreenReport {
    Screener::new(config.clone()).screen(inputs, parallel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::synthetic_bars;

    fn input(ticker: &str, n: usize) -> TickerInput {
        TickerInput {
            ticker: ticker.to_string(),
            bars: synthetic_bars(ticker, n),
            news: vec!["Company announced quarterly results".to_string()],
            synthetic_prices: true,
            placeholder_news: false,
        }
    }

    #[test]
    fn skip_reasons_display() {
        assert_eq!(SkipReason::Blacklisted.to_string(), "blacklisted");
        let r = SkipReason::InsufficientData {
            required: 60,
            actual: 10,
        };
        assert_eq!(r.to_string(), "insufficient data: 10 bars, 60 required");
    }

    #[test]
    fn blacklisted_ticker_is_skipped() {
        let config = ScreenConfig {
            blacklist: vec!["bad".into()],
            ..ScreenConfig::default()
        };
        let screener = Screener::new(config);
        assert_eq!(screener.evaluate(&input("BAD", 100)), Err(SkipReason::Blacklisted));
        assert!(screener.evaluate(&input("GOOD", 100)).is_ok());
    }

    #[test]
    fn short_history_is_skipped_with_counts() {
        let screener = Screener::new(ScreenConfig::default());
        assert_eq!(
            screener.evaluate(&input("SHORT", 30)),
            Err(SkipReason::InsufficientData {
                required: 60,
                actual: 30
            })
        );
    }

    #[test]
    fn row_carries_fingerprint_and_risk() {
        let screener = Screener::new(ScreenConfig::default());
        let row = screener.evaluate(&input("ABC", 120)).unwrap();
        assert_eq!(row.config_fingerprint, ScreenConfig::default().fingerprint());
        assert!(row.stop_loss.is_some());
        assert!(row.tradeable);
        assert_eq!(row.catalyst_type, CatalystType::Earnings);
    }

    #[test]
    fn pass_rate_of_empty_report_is_zero() {
        let report = ScreenReport {
            config_fingerprint: String::new(),
            rows: vec![],
            skipped: vec![],
        };
        assert_eq!(report.pass_rate(), 0.0);
        assert_eq!(report.pick_count(), 0);
    }
}
