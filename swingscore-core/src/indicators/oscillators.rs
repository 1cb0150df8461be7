//! Momentum oscillators: Relative Strength Index and Rate of Change.

/// Wilder RSI over a close series. First valid value at index `period`.
///
/// Flat windows (no gains, no losses) read 50; pure gains read 100 and pure
/// losses read 0.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let seed = &changes[..period];
    if seed.iter().any(|c| c.is_nan()) {
        return result;
    }
    let mut avg_gain = seed.iter().map(|&c| c.max(0.0)).sum::<f64>() / period as f64;
    let mut avg_loss = seed.iter().map(|&c| (-c).max(0.0)).sum::<f64>() / period as f64;
    result[period] = rsi_from_averages(avg_gain, avg_loss);

    let alpha = 1.0 / period as f64;
    for i in (period + 1)..n {
        let change = changes[i - 1];
        if change.is_nan() {
            return result;
        }
        avg_gain = alpha * change.max(0.0) + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * (-change).max(0.0) + (1.0 - alpha) * avg_loss;
        result[i] = rsi_from_averages(avg_gain, avg_loss);
    }

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// Percentage change over `period` bars. A zero or NaN base yields NaN.
pub fn roc(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 {
        return result;
    }
    for i in period..n {
        let prev = closes[i - period];
        let curr = closes[i];
        if prev.is_nan() || curr.is_nan() || prev == 0.0 {
            continue;
        }
        result[i] = (curr - prev) / prev * 100.0;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rsi_all_gains() {
        let result = rsi(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0], 3);
        assert_approx(result[3], 100.0, 1e-6);
        assert_approx(result[5], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let result = rsi(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0], 3);
        assert_approx(result[3], 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_is_fifty() {
        let result = rsi(&[100.0; 20], 14);
        assert_approx(result[19], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_mixed_seed_value() {
        // Changes: +0.34, -0.25, -0.48 → RSI = 100 - 100/(1 + 0.34/0.73)
        let result = rsi(&[44.0, 44.34, 44.09, 43.61, 44.33], 3);
        assert!(result[2].is_nan());
        assert_approx(result[3], 100.0 - 100.0 / (1.0 + 0.34 / 0.73), 1e-9);
    }

    #[test]
    fn rsi_stays_bounded() {
        let result = rsi(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0], 3);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_nan_in_seed_gives_all_nan() {
        let result = rsi(&[100.0, 101.0, f64::NAN, 103.0, 104.0], 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn roc_basic() {
        let result = roc(&[100.0, 110.0, 121.0], 1);
        assert!(result[0].is_nan());
        assert_approx(result[1], 10.0, DEFAULT_EPSILON);
        assert_approx(result[2], 10.0, DEFAULT_EPSILON);
        assert_approx(roc(&[100.0, 110.0, 121.0], 2)[2], 21.0, DEFAULT_EPSILON);
    }

    #[test]
    fn roc_zero_base_is_nan() {
        assert!(roc(&[0.0, 10.0], 1)[1].is_nan());
    }
}
