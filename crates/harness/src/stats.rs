//! Aggregation over duration series.
//!
//! All series are kept in microseconds end to end; conversion to
//! milliseconds happens only at render time, so no mixed-unit rounding
//! creeps into the statistics.

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Population standard deviation: `sqrt(mean((x - mean(x))^2))`.
pub fn population_stddev(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / xs.len() as f64;
    var.sqrt()
}
