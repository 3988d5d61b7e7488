//! Mean and standard deviation of a sample vector.

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let sum: f64 = samples.iter().sum();
    Some(sum / samples.len() as f64)
}

/// Population standard deviation (divisor `n`) around a precomputed mean.
///
/// A single sample has a standard deviation of zero.
pub fn population_std_dev(samples: &[f64], mean: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let squared_diffs: f64 = samples.iter().map(|&x| (x - mean).powi(2)).sum();
    (squared_diffs / samples.len() as f64).sqrt()
}
