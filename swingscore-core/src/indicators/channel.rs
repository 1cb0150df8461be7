//! Donchian Channel: highest high / lowest low over a trailing window.

use crate::domain::PriceBar;

/// Upper (highest high) and lower (lowest low) series.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Donchian channel over `period` bars, current bar included.
/// First valid value at index `period - 1`.
pub fn donchian(bars: &[PriceBar], period: usize) -> Channel {
    let n = bars.len();
    let mut channel = Channel {
        upper: vec![f64::NAN; n],
        lower: vec![f64::NAN; n],
    };
    if period == 0 || n < period {
        return channel;
    }

    for i in (period - 1)..n {
        let window = &bars[(i + 1 - period)..=i];
        if window.iter().any(|b| b.high.is_nan() || b.low.is_nan()) {
            continue;
        }
        channel.upper[i] = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        channel.lower[i] = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    }

    channel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    fn bars() -> Vec<PriceBar> {
        make_ohlc_bars(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 15.0, 10.0, 14.0),
            (14.0, 14.0, 13.0, 13.5),
            (13.5, 16.0, 12.0, 15.0),
            (15.0, 15.5, 14.0, 14.5),
        ])
    }

    #[test]
    fn donchian_3() {
        let ch = donchian(&bars(), 3);
        assert!(ch.upper[1].is_nan());
        assert_approx(ch.upper[2], 15.0, DEFAULT_EPSILON);
        assert_approx(ch.upper[3], 16.0, DEFAULT_EPSILON);
        assert_approx(ch.upper[4], 16.0, DEFAULT_EPSILON);
        assert_approx(ch.lower[2], 9.0, DEFAULT_EPSILON);
        assert_approx(ch.lower[3], 10.0, DEFAULT_EPSILON);
        assert_approx(ch.lower[4], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn donchian_nan_window() {
        let mut b = bars();
        b[1].high = f64::NAN;
        let ch = donchian(&b, 3);
        assert!(ch.upper[2].is_nan());
        assert!(ch.lower[2].is_nan());
        assert!(!ch.upper[4].is_nan());
    }
}
