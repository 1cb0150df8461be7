//! Simple and exponential moving averages over an arbitrary series.

/// Rolling mean over `period` values. First valid output at index `period - 1`.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let mut sum: f64 = values[..period].iter().sum();
    let mut nan_count = values[..period].iter().filter(|v| v.is_nan()).count();
    let mut stale = nan_count > 0;
    if !stale {
        result[period - 1] = sum / period as f64;
    }

    for i in period..n {
        let leaving = values[i - period];
        let entering = values[i];
        if leaving.is_nan() {
            nan_count -= 1;
        }
        if entering.is_nan() {
            nan_count += 1;
        }
        if nan_count > 0 {
            stale = true;
            continue;
        }
        if stale {
            // Running sum skipped the poisoned windows; rebuild it.
            sum = values[(i + 1 - period)..=i].iter().sum();
            stale = false;
        } else {
            sum = sum - leaving + entering;
        }
        result[i] = sum / period as f64;
    }

    result
}

/// EMA with alpha = 2/(period+1), seeded with the SMA of the first `period`
/// values. A NaN after the seed poisons the remainder of the series.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let seed_window = &values[..period];
    if seed_window.iter().any(|v| v.is_nan()) {
        return result;
    }
    let seed = seed_window.iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            return result;
        }
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }

    result
}
