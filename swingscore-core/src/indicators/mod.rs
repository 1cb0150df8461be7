//! Indicator primitives.
//!
//! Every function returns a series the same length as its input. Values
//! before the warmup window is filled are `f64::NAN`, and a NaN input
//! poisons every window that contains it. The feature engine only reads
//! the final element of each series.

pub mod channel;
pub mod moving_average;
pub mod oscillators;
pub mod volatility;

pub use channel::{donchian, Channel};
pub use moving_average::{ema, sma};
pub use oscillators::{roc, rsi};
pub use volatility::{atr, bollinger, keltner, true_range, wilder_smooth, Bands};

use crate::domain::PriceBar;

/// Final element of a series, if it is finite.
pub fn last_valid(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| v.is_finite())
}

/// Close prices of a bar series.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Synthetic bars from close prices for tests.
///
/// open = prev_close (or close for the first bar), high/low one unit outside
/// the open/close range, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Bars from explicit (open, high, low, close) tuples for tests.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| PriceBar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000,
        })
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_valid_skips_nan_tail() {
        assert_eq!(last_valid(&[1.0, 2.0]), Some(2.0));
        assert_eq!(last_valid(&[1.0, f64::NAN]), None);
        assert_eq!(last_valid(&[1.0, f64::INFINITY]), None);
        assert_eq!(last_valid(&[]), None);
    }
}
