//! Rolling-window statistics over daily price columns
//!
//! Undefined positions are reported as `f64::NAN`, matching the convention
//! used by the feature builder when it discards incomplete rows.

/// Forward-fill gaps, leaving leading gaps as NaN
pub fn forward_fill(values: &[Option<f64>]) -> Vec<f64> {
    let mut last = f64::NAN;
    values
        .iter()
        .map(|v| {
            if let Some(x) = v.filter(|x| x.is_finite()) {
                last = x;
            }
            last
        })
        .collect()
}

/// Simple Moving Average over a trailing window
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return vec![f64::NAN; values.len()];
    }

    let mut result = vec![f64::NAN; period - 1];

    for i in (period - 1)..values.len() {
        let sum: f64 = values[(i + 1 - period)..=i].iter().sum();
        result.push(sum / period as f64);
    }

    result
}

/// Fractional change between consecutive values
///
/// A zero predecessor yields NaN rather than infinity, so the feature
/// builder discards that row along with the other undefined ones.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return vec![];
    }

    let mut result = vec![f64::NAN];

    for i in 1..values.len() {
        if values[i - 1] != 0.0 {
            result.push((values[i] - values[i - 1]) / values[i - 1]);
        } else {
            result.push(f64::NAN);
        }
    }

    result
}

/// Sample standard deviation over a trailing window of `period` rows
///
/// NaN entries inside the window are skipped, so the leading undefined
/// change of a `pct_change` series does not poison the first full window.
/// A position is defined once the window is complete and holds at least
/// two values.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if period == 0 {
        return result;
    }

    for i in (period - 1)..values.len() {
        let window = &values[(i + 1 - period)..=i];
        let valid: Vec<f64> = window.iter().filter(|x| !x.is_nan()).copied().collect();

        if valid.len() >= 2 {
            let mean: f64 = valid.iter().sum::<f64>() / valid.len() as f64;
            let variance: f64 =
                valid.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (valid.len() - 1) as f64;
            result[i] = variance.sqrt();
        }
    }

    result
}
