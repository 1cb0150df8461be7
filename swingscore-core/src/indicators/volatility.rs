//! Volatility measures: true range, ATR, Bollinger Bands, Keltner Channel.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR uses Wilder smoothing (alpha = 1/period) seeded with a simple mean.
//! Bollinger uses population standard deviation (divide by N).

use crate::domain::PriceBar;
use crate::indicators::moving_average::{ema, sma};

/// Upper, middle, and lower band series of an envelope indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl Bands {
    fn empty(n: usize) -> Self {
        Self {
            upper: vec![f64::NAN; n],
            middle: vec![f64::NAN; n],
            lower: vec![f64::NAN; n],
        }
    }

    /// Full width (upper - lower) at index `i`; NaN when either band is missing.
    pub fn width_at(&self, i: usize) -> f64 {
        match (self.upper.get(i), self.lower.get(i)) {
            (Some(u), Some(l)) => u - l,
            _ => f64::NAN,
        }
    }
}

/// True Range series. TR[0] = high[0] - low[0] (no previous close).
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let range = bar.high - bar.low;
        let value = match i.checked_sub(1).map(|p| bars[p].close) {
            None => range,
            Some(pc) => range.max((bar.high - pc).abs()).max((bar.low - pc).abs()),
        };
        // f64::max drops NaN operands, so propagate explicitly.
        let poisoned = bar.high.is_nan()
            || bar.low.is_nan()
            || (i > 0 && bars[i - 1].close.is_nan());
        tr.push(if poisoned { f64::NAN } else { value });
    }
    tr
}

/// Wilder smoothing (alpha = 1/period).
///
/// The seed is the mean of the first run of `period` consecutive non-NaN
/// values; a NaN after the seed poisons the remainder.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let Some(seed_start) =
        (0..=n - period).find(|&s| values[s..s + period].iter().all(|v| !v.is_nan()))
    else {
        return result;
    };
    let seed_end = seed_start + period;

    let mut prev = values[seed_start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = prev;

    let alpha = 1.0 / period as f64;
    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }

    result
}

/// Average True Range. The first TR has no previous close, so it is left out
/// of the seed window and the first valid ATR sits at index `period`.
pub fn atr(bars: &[PriceBar], period: usize) -> Vec<f64> {
    let mut tr = true_range(bars);
    if let Some(first) = tr.first_mut() {
        *first = f64::NAN;
    }
    wilder_smooth(&tr, period)
}

/// Bollinger Bands: SMA(period) ± multiplier × population σ.
pub fn bollinger(values: &[f64], period: usize, multiplier: f64) -> Bands {
    let n = values.len();
    let mut bands = Bands::empty(n);
    if period == 0 || n < period {
        return bands;
    }

    let middle = sma(values, period);
    for i in (period - 1)..n {
        let mean = middle[i];
        if mean.is_nan() {
            continue;
        }
        let window = &values[(i + 1 - period)..=i];
        let variance =
            window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
        let offset = multiplier * variance.sqrt();
        bands.upper[i] = mean + offset;
        bands.lower[i] = mean - offset;
    }
    bands.middle = middle;
    bands
}

/// Keltner Channel: EMA(close, ema_period) ± multiplier × ATR(atr_period).
pub fn keltner(bars: &[PriceBar], ema_period: usize, atr_period: usize, multiplier: f64) -> Bands {
    let n = bars.len();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let middle = ema(&closes, ema_period);
    let atr_values = atr(bars, atr_period);

    let mut bands = Bands::empty(n);
    for i in 0..n {
        if middle[i].is_nan() || atr_values[i].is_nan() {
            continue;
        }
        bands.upper[i] = middle[i] + multiplier * atr_values[i];
        bands.lower[i] = middle[i] - multiplier * atr_values[i];
    }
    bands.middle = middle;
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, make_ohlc_bars, DEFAULT_EPSILON};

    fn five_bars() -> Vec<PriceBar> {
        make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 10
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = 6
        ])
    }

    #[test]
    fn true_range_basic() {
        let tr = true_range(&five_bars());
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bars = make_ohlc_bars(&[(98.0, 102.0, 97.0, 100.0), (110.0, 115.0, 108.0, 112.0)]);
        assert_approx(true_range(&bars)[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_propagates_nan() {
        let mut bars = five_bars();
        bars[1].close = f64::NAN;
        let tr = true_range(&bars);
        assert!(tr[2].is_nan());
    }

    #[test]
    fn atr_period_3() {
        let result = atr(&five_bars(), 3);
        assert!(result[..3].iter().all(|v| v.is_nan()));
        // Seed from TR[1..=3] = [8, 9, 6]
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        // (1/3)*6 + (2/3)*(23/3) = 64/9
        assert_approx(result[4], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_of_flat_bars_is_zero() {
        let bars = make_ohlc_bars(&[(100.0, 100.0, 100.0, 100.0); 30]);
        let result = atr(&bars, 20);
        assert_approx(result[29], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_middle_is_sma_and_bands_symmetric() {
        let bands = bollinger(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, 2.0);
        assert!(bands.middle[1].is_nan());
        assert_approx(bands.middle[2], 11.0, DEFAULT_EPSILON);
        for i in 2..5 {
            assert_approx(
                bands.upper[i] - bands.middle[i],
                bands.middle[i] - bands.lower[i],
                DEFAULT_EPSILON,
            );
        }
    }

    #[test]
    fn bollinger_constant_series_has_zero_width() {
        let bands = bollinger(&[100.0; 4], 3, 2.0);
        assert_approx(bands.width_at(3), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn keltner_bands_are_ordered() {
        let bars = make_bars(&[11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let bands = keltner(&bars, 3, 3, 1.5);
        for i in 0..bars.len() {
            if bands.upper[i].is_nan() {
                continue;
            }
            assert!(bands.upper[i] > bands.middle[i] && bands.middle[i] > bands.lower[i]);
        }
        assert!(!bands.upper[5].is_nan());
    }
}
