//! Outlier detection for per-column trial samples.
//!
//! This module filters samples by z-score: a sample is an outlier when its
//! distance from the mean, measured in population standard deviations, is
//! at least the threshold.

use super::moments::{mean, population_std_dev};
use crate::error::{HarnessError, Result};

/// Default z-score threshold.
pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// Z-score outlier detection over one sample vector.
///
/// When every sample is identical the standard deviation is zero and every
/// z-score is defined as `0.0`, so nothing is flagged. Identity is checked
/// on the samples themselves, since a rounded mean can leave a tiny nonzero
/// deviation behind.
#[derive(Debug, Clone)]
pub struct OutlierResult {
    /// Indices of detected outliers in the original sample array, ascending
    pub outlier_indices: Vec<usize>,
    /// Mean of all samples
    pub mean: f64,
    /// Population standard deviation of all samples
    pub std_dev: f64,
    /// Threshold the samples were tested against
    pub threshold: f64,
    /// Every sample equal to the first
    uniform: bool,
}

impl OutlierResult {
    /// Detect outliers in samples using the z-score method.
    ///
    /// Samples with `|z| >= threshold` are outliers.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidInput`] if `samples` is empty or holds
    /// a non-finite value.
    ///
    /// # Examples
    ///
    /// ```
    /// use trial_harness::stats::outliers::OutlierResult;
    ///
    /// let data = vec![10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 1000.0];
    /// let result = OutlierResult::detect(&data, 2.0).unwrap();
    /// assert!(result.has_outliers());
    /// assert_eq!(result.outlier_indices, vec![9]);
    /// ```
    pub fn detect(samples: &[f64], threshold: f64) -> Result<Self> {
        let mean = mean(samples)
            .ok_or_else(|| HarnessError::InvalidInput("cannot filter an empty sample vector".into()))?;

        if let Some(bad) = samples.iter().find(|v| !v.is_finite()) {
            return Err(HarnessError::InvalidInput(format!(
                "sample vector contains non-finite value {bad}"
            )));
        }

        let uniform = samples.iter().all(|&v| v == samples[0]);
        let (mean, std_dev) = if uniform {
            (samples[0], 0.0)
        } else {
            (mean, population_std_dev(samples, mean))
        };

        let mut result = OutlierResult {
            outlier_indices: Vec::new(),
            mean,
            std_dev,
            threshold,
            uniform,
        };

        result.outlier_indices = samples
            .iter()
            .enumerate()
            .filter_map(|(i, &value)| {
                if result.z_score(value).abs() < threshold {
                    None
                } else {
                    Some(i)
                }
            })
            .collect();

        Ok(result)
    }

    /// Z-score of `value` against the detected mean and standard deviation.
    ///
    /// Zero-variance vectors score every value as `0.0`.
    pub fn z_score(&self, value: f64) -> f64 {
        if self.uniform || self.std_dev == 0.0 {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }

    /// Get the clean samples (outliers removed), in their original order.
    pub fn clean_samples(&self, samples: &[f64]) -> Vec<f64> {
        samples
            .iter()
            .enumerate()
            .filter_map(|(i, &value)| {
                if self.outlier_indices.binary_search(&i).is_ok() {
                    None
                } else {
                    Some(value)
                }
            })
            .collect()
    }

    /// Check if any outliers were detected.
    pub fn has_outliers(&self) -> bool {
        !self.outlier_indices.is_empty()
    }
}

/// Keep the samples whose absolute z-score is strictly below `threshold`.
///
/// # Examples
///
/// ```
/// use trial_harness::stats::filter;
///
/// let kept = filter(&[5.0, 5.0, 5.0], 2.0).unwrap();
/// assert_eq!(kept, vec![5.0, 5.0, 5.0]);
/// ```
pub fn filter(samples: &[f64], threshold: f64) -> Result<Vec<f64>> {
    let result = OutlierResult::detect(samples, threshold)?;
    Ok(result.clean_samples(samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_empty_is_invalid_input() {
        let err = OutlierResult::detect(&[], DEFAULT_THRESHOLD).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidInput(_)));
    }

    #[test]
    fn test_detect_rejects_nan() {
        let err = OutlierResult::detect(&[1.0, f64::NAN], DEFAULT_THRESHOLD).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_variance_retains_all() {
        let samples = vec![42.0; 6];
        let result = OutlierResult::detect(&samples, DEFAULT_THRESHOLD).unwrap();

        assert!(!result.has_outliers());
        assert_eq!(result.std_dev, 0.0);
        assert_eq!(result.z_score(42.0), 0.0);
        assert_eq!(result.clean_samples(&samples), samples);
    }

    #[test]
    fn test_identical_fractional_samples_retained_at_low_threshold() {
        // Summing 0.1 three times rounds the mean away from 0.1.
        let samples = vec![0.1; 3];
        let result = OutlierResult::detect(&samples, 0.5).unwrap();

        assert!(!result.has_outliers());
        assert_eq!(result.mean, 0.1);
        assert_eq!(result.std_dev, 0.0);
        assert_eq!(result.z_score(0.1), 0.0);
        assert_eq!(filter(&samples, 0.5).unwrap(), samples);
        assert_eq!(filter(&[2.7; 7], 0.01).unwrap(), vec![2.7; 7]);
    }

    #[test]
    fn test_single_sample_retained() {
        assert_eq!(filter(&[9.0], DEFAULT_THRESHOLD).unwrap(), vec![9.0]);
    }

    #[test]
    fn test_three_sample_outlier_needs_lower_threshold() {
        // With three samples no population z-score can reach sqrt(2).
        let samples = [10.0, 11.0, 1000.0];
        assert_eq!(filter(&samples, DEFAULT_THRESHOLD).unwrap().len(), 3);
        assert_eq!(filter(&samples, 1.4).unwrap(), vec![10.0, 11.0]);
    }

    #[test]
    fn test_high_outlier_default_threshold() {
        let samples = [10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 1000.0];
        let result = OutlierResult::detect(&samples, DEFAULT_THRESHOLD).unwrap();

        assert_eq!(result.outlier_indices, vec![9]);
        assert!(result.z_score(1000.0) >= DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_low_outlier_detected() {
        let samples = [500.0, 501.0, 500.0, 502.0, 499.0, 500.0, 501.0, 500.0, 1.0];
        let result = OutlierResult::detect(&samples, DEFAULT_THRESHOLD).unwrap();

        assert_eq!(result.outlier_indices, vec![8]);
        assert!(result.z_score(1.0) <= -DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_boundary_is_discarded() {
        // mean 0, population std 1, so +-1 sit exactly on z = 1.
        let samples = [-1.0, 1.0];
        let result = OutlierResult::detect(&samples, 1.0).unwrap();
        assert_eq!(result.outlier_indices, vec![0, 1]);

        let result = OutlierResult::detect(&samples, 1.0 + 1e-9).unwrap();
        assert!(!result.has_outliers());
    }

    #[test]
    fn test_clean_samples_preserves_order() {
        let samples = [3.0, 1.0, 2.0, 2.0, 1.0, 3.0, 2.0, 1.0, 3.0, 2.0, 90.0, 2.0];
        let clean = filter(&samples, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(clean, vec![3.0, 1.0, 2.0, 2.0, 1.0, 3.0, 2.0, 1.0, 3.0, 2.0, 2.0]);
    }

    #[test]
    fn test_aggressive_threshold_discards_everything() {
        let samples = [1.0, 1.0, 1_000_000.0];
        assert!(filter(&samples, 0.5).unwrap().is_empty());
    }
}
