//! FeatureEngine: technical features for one ticker at its latest bar.
//!
//! All outputs are pure functions of the bar series. Degenerate arithmetic
//! (zero volume, zero band width, flat prices, NaN warmup) resolves to the
//! neutral value of the affected feature instead of propagating NaN.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceBar;
use crate::indicators::{self, last_valid};

/// Neutral midpoint for every 0–100 feature.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Relative volume reported when the average volume is zero.
pub const NEUTRAL_RELATIVE_VOLUME: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("insufficient price history: {actual} bars supplied, {required} required")]
    InsufficientData { required: usize, actual: usize },
}

/// Lookbacks and multipliers for feature computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Minimum bars before a ticker can be scored.
    pub min_bars: usize,
    /// Momentum horizons (short, medium, long) in bars.
    pub momentum_horizons: [usize; 3],
    /// ROC (percent) that maps to tanh(1) in the momentum squash.
    pub momentum_scale: f64,
    pub atr_period: usize,
    pub volume_period: usize,
    pub band_period: usize,
    pub band_stddev: f64,
    pub keltner_ema_period: usize,
    pub keltner_atr_period: usize,
    pub keltner_multiplier: f64,
    pub breakout_period: usize,
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub rsi_period: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            min_bars: 60,
            momentum_horizons: [3, 20, 60],
            momentum_scale: 20.0,
            atr_period: 20,
            volume_period: 20,
            band_period: 20,
            band_stddev: 2.0,
            keltner_ema_period: 20,
            keltner_atr_period: 20,
            keltner_multiplier: 1.5,
            breakout_period: 20,
            sma_fast: 50,
            sma_slow: 200,
            rsi_period: 14,
        }
    }
}

impl FeatureConfig {
    /// Longest lookback any feature other than the slow SMA needs.
    ///
    /// The slow SMA is allowed to be unavailable; its flag then reads false.
    pub fn longest_lookback(&self) -> usize {
        let [_, _, long] = self.momentum_horizons;
        [
            long,
            self.atr_period + 1,
            self.volume_period,
            self.band_period,
            self.keltner_ema_period,
            self.keltner_atr_period + 1,
            self.breakout_period + 1,
            self.sma_fast,
            self.rsi_period + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// Fixed feature vector for one ticker at one bar. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub as_of: NaiveDate,
    pub close: f64,
    pub momentum_3: f64,
    pub momentum_20: f64,
    pub momentum_60: f64,
    pub relative_volume: f64,
    pub is_squeeze: bool,
    /// +1 above the prior channel high, -1 below the prior low, else 0.
    pub breakout_direction: i8,
    pub price_band_position: f64,
    pub above_sma50: bool,
    pub above_sma200: bool,
    pub rsi14: f64,
    pub atr20: f64,
}

/// Computes [`FeatureVector`]s. Stateless apart from its configuration,
/// so one engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngine {
    config: FeatureConfig,
}

impl FeatureEngine {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Compute the feature vector at the last bar of `bars`.
    pub fn compute(&self, bars: &[PriceBar]) -> Result<FeatureVector, FeatureError> {
        let cfg = &self.config;
        let required = cfg.min_bars.max(cfg.longest_lookback()).max(2);
        let Some(last) = bars.last().filter(|_| bars.len() >= required) else {
            return Err(FeatureError::InsufficientData {
                required,
                actual: bars.len(),
            });
        };

        let closes = indicators::closes(bars);
        let close = last.close;
        let [short, medium, long] = cfg.momentum_horizons;

        Ok(FeatureVector {
            as_of: last.date,
            close,
            momentum_3: momentum_score(&closes, short, cfg.momentum_scale),
            momentum_20: momentum_score(&closes, medium, cfg.momentum_scale),
            momentum_60: momentum_score(&closes, long, cfg.momentum_scale),
            relative_volume: relative_volume(bars, cfg.volume_period),
            is_squeeze: is_squeeze(bars, &closes, cfg),
            breakout_direction: breakout_direction(bars, cfg.breakout_period),
            price_band_position: band_position(&closes, cfg.band_period, cfg.band_stddev),
            above_sma50: above_sma(&closes, cfg.sma_fast),
            above_sma200: above_sma(&closes, cfg.sma_slow),
            rsi14: last_valid(&indicators::rsi(&closes, cfg.rsi_period))
                .unwrap_or(NEUTRAL_SCORE),
            atr20: last_valid(&indicators::atr(bars, cfg.atr_period))
                .unwrap_or(0.0)
                .max(0.0),
        })
    }
}

/// Map a rate of change into [0,100]: `50 + 50·tanh(roc/scale)`.
///
/// Saturates smoothly so a single outsized move cannot pin the score.
pub fn squash_momentum(roc_pct: f64, scale: f64) -> f64 {
    if !roc_pct.is_finite() || scale <= 0.0 {
        return NEUTRAL_SCORE;
    }
    NEUTRAL_SCORE + NEUTRAL_SCORE * (roc_pct / scale).tanh()
}

/// Momentum over `horizon` bars. A series shorter than the horizon measures
/// from its first bar.
fn momentum_score(closes: &[f64], horizon: usize, scale: f64) -> f64 {
    let period = horizon.min(closes.len().saturating_sub(1));
    if period == 0 {
        return NEUTRAL_SCORE;
    }
    let roc = last_valid(&indicators::roc(closes, period)).unwrap_or(0.0);
    squash_momentum(roc, scale)
}

/// Latest volume over the mean of the trailing `period` volumes (latest included).
fn relative_volume(bars: &[PriceBar], period: usize) -> f64 {
    let window = &bars[bars.len().saturating_sub(period.max(1))..];
    let avg = window.iter().map(|b| b.volume as f64).sum::<f64>() / window.len() as f64;
    let latest = window.last().map_or(0.0, |b| b.volume as f64);
    if avg > 0.0 && avg.is_finite() {
        latest / avg
    } else {
        NEUTRAL_RELATIVE_VOLUME
    }
}

/// Bollinger full width strictly inside the Keltner full width.
fn is_squeeze(bars: &[PriceBar], closes: &[f64], cfg: &FeatureConfig) -> bool {
    let last = bars.len() - 1;
    let bb = indicators::bollinger(closes, cfg.band_period, cfg.band_stddev);
    let kc = indicators::keltner(
        bars,
        cfg.keltner_ema_period,
        cfg.keltner_atr_period,
        cfg.keltner_multiplier,
    );
    let (bb_width, kc_width) = (bb.width_at(last), kc.width_at(last));
    bb_width.is_finite() && kc_width.is_finite() && bb_width < kc_width
}

/// Latest close against the channel of the `period` bars before it.
fn breakout_direction(bars: &[PriceBar], period: usize) -> i8 {
    let Some((latest, prior)) = bars.split_last() else {
        return 0;
    };
    let channel = indicators::donchian(prior, period);
    let (Some(high), Some(low)) = (last_valid(&channel.upper), last_valid(&channel.lower)) else {
        return 0;
    };
    if latest.close > high {
        1
    } else if latest.close < low {
        -1
    } else {
        0
    }
}

/// `50 + 50·(close − mid)/half_width`, clipped to [0,100]; zero width → 50.
fn band_position(closes: &[f64], period: usize, stddev: f64) -> f64 {
    let bands = indicators::bollinger(closes, period, stddev);
    let (Some(&close), Some(mid), Some(upper)) = (
        closes.last(),
        last_valid(&bands.middle),
        last_valid(&bands.upper),
    ) else {
        return NEUTRAL_SCORE;
    };
    let half_width = upper - mid;
    if half_width <= 0.0 {
        return NEUTRAL_SCORE;
    }
    (NEUTRAL_SCORE + NEUTRAL_SCORE * (close - mid) / half_width).clamp(0.0, 100.0)
}

fn above_sma(closes: &[f64], period: usize) -> bool {
    match (closes.last(), last_valid(&indicators::sma(closes, period))) {
        (Some(&close), Some(avg)) => close > avg,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    fn trending(n: usize, start: f64, step: f64) -> Vec<PriceBar> {
        let closes: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
        make_bars(&closes)
    }

    #[test]
    fn rejects_short_series() {
        let engine = FeatureEngine::default();
        let err = engine.compute(&trending(59, 100.0, 1.0)).unwrap_err();
        assert_eq!(
            err,
            FeatureError::InsufficientData {
                required: 60,
                actual: 59
            }
        );
    }

    #[test]
    fn accepts_exactly_min_bars() {
        let fv = FeatureEngine::default().compute(&trending(60, 100.0, 1.0)).unwrap();
        assert!(fv.momentum_60 > NEUTRAL_SCORE);
        assert!(!fv.above_sma200);
    }

    #[test]
    fn squash_is_centered_and_bounded() {
        assert_approx(squash_momentum(0.0, 20.0), 50.0, 1e-12);
        assert_approx(squash_momentum(20.0, 20.0), 50.0 + 50.0 * 1f64.tanh(), 1e-12);
        assert!(squash_momentum(1e6, 20.0) <= 100.0);
        assert!(squash_momentum(-1e6, 20.0) >= 0.0);
        assert_eq!(squash_momentum(f64::NAN, 20.0), NEUTRAL_SCORE);
    }

    #[test]
    fn uptrend_reads_bullish() {
        let fv = FeatureEngine::default().compute(&trending(220, 100.0, 2.0)).unwrap();
        assert!(fv.momentum_20 > 50.0 && fv.momentum_60 > 50.0);
        assert!(fv.above_sma50 && fv.above_sma200);
        assert_eq!(fv.breakout_direction, 1);
        assert!(fv.rsi14 > 70.0);
        assert!(fv.atr20 > 0.0);
    }

    #[test]
    fn downtrend_breaks_down() {
        let fv = FeatureEngine::default().compute(&trending(80, 400.0, -2.0)).unwrap();
        assert_eq!(fv.breakout_direction, -1);
        assert!(fv.momentum_20 < 50.0);
        assert!(!fv.above_sma50);
    }

    #[test]
    fn volume_spike_raises_relative_volume() {
        let mut bars = trending(80, 100.0, 0.1);
        bars.last_mut().unwrap().volume = 20_000;
        let fv = FeatureEngine::default().compute(&bars).unwrap();
        // mean = (19 * 1000 + 20000) / 20 = 1950
        assert_approx(fv.relative_volume, 20_000.0 / 1950.0, 1e-9);
    }

    #[test]
    fn zero_volume_is_neutral() {
        let mut bars = trending(80, 100.0, 0.1);
        for b in &mut bars {
            b.volume = 0;
        }
        let fv = FeatureEngine::default().compute(&bars).unwrap();
        assert_eq!(fv.relative_volume, NEUTRAL_RELATIVE_VOLUME);
    }

    #[test]
    fn band_position_stays_in_range() {
        let mut closes: Vec<f64> = vec![100.0; 79];
        closes.push(150.0);
        let fv = FeatureEngine::default().compute(&make_bars(&closes)).unwrap();
        assert!((0.0..=100.0).contains(&fv.price_band_position));
        assert!(fv.price_band_position > 50.0);
    }

    #[test]
    fn tight_range_after_wide_range_squeezes() {
        // Alternating ±0.05 closes with wide intraday ranges: small σ, large ATR.
        let data: Vec<(f64, f64, f64, f64)> = (0..80)
            .map(|i| {
                let c = if i % 2 == 0 { 100.0 } else { 100.05 };
                (c, c + 3.0, c - 3.0, c)
            })
            .collect();
        let bars = crate::indicators::make_ohlc_bars(&data);
        let fv = FeatureEngine::default().compute(&bars).unwrap();
        assert!(fv.is_squeeze);
    }
}
