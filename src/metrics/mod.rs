//! Surprisal-based sequence metrics
//!
//! Computes aggregate and successive-difference statistics over an ordered
//! sequence of per-token surprisal values: UID deviation (mean absolute
//! successive difference, after Collins 2014) and information fluctuation
//! complexity sigma_gamma (population standard deviation of the successive
//! differences).

/// How to report metrics for sequences too short to carry a transition
/// signal.
///
/// The two corpus pipelines never agreed on a threshold: the span extractor
/// reports NaN below three values, the entity-level calculator reports 0.0
/// below two. Both behaviors are kept as explicit modes; which one is
/// canonical is an open question for the data owner (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortSequencePolicy {
    /// Fewer than 3 values: `uid_dev` and `sigma_gamma` are NaN.
    ///
    /// NaN is an "insufficient data" sentinel, distinct from the 0.0 of a
    /// genuinely flat sequence, and must propagate into the output.
    #[default]
    NanBelowThree,
    /// Fewer than 2 values: both metrics are 0.0. Two or more values compute
    /// normally (a single difference yields `sigma_gamma = 0`).
    ZeroBelowTwo,
}

/// Metrics over one ordered surprisal sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurprisalMetrics {
    pub mean: f64,
    pub sum: f64,
    /// Mean absolute successive difference.
    pub uid_dev: f64,
    /// Population standard deviation of the successive differences.
    pub sigma_gamma: f64,
}

/// Calculator for [`SurprisalMetrics`].
///
/// A pure function of its input: the same sequence always yields
/// bit-identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurprisalCalculator {
    short_seq: ShortSequencePolicy,
}

impl SurprisalCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the short-sequence reporting mode.
    pub fn with_short_sequence_policy(mut self, policy: ShortSequencePolicy) -> Self {
        self.short_seq = policy;
        self
    }

    pub fn short_sequence_policy(&self) -> ShortSequencePolicy {
        self.short_seq
    }

    /// Compute metrics over `values`, in order.
    ///
    /// Returns `None` for an empty sequence; mean and sum are undefined
    /// there and the caller must guard.
    pub fn compute(&self, values: &[f64]) -> Option<SurprisalMetrics> {
        if values.is_empty() {
            return None;
        }

        let sum: f64 = values.iter().sum();
        let mean = sum / values.len() as f64;

        let degenerate = match self.short_seq {
            ShortSequencePolicy::NanBelowThree => values.len() < 3,
            ShortSequencePolicy::ZeroBelowTwo => values.len() < 2,
        };
        if degenerate {
            let sentinel = match self.short_seq {
                ShortSequencePolicy::NanBelowThree => f64::NAN,
                ShortSequencePolicy::ZeroBelowTwo => 0.0,
            };
            return Some(SurprisalMetrics {
                mean,
                sum,
                uid_dev: sentinel,
                sigma_gamma: sentinel,
            });
        }

        let diffs = successive_differences(values);
        let n = diffs.len() as f64;
        let uid_dev = diffs.iter().map(|d| d.abs()).sum::<f64>() / n;
        let diff_mean = diffs.iter().sum::<f64>() / n;
        let sigma_gamma =
            (diffs.iter().map(|d| (d - diff_mean).powi(2)).sum::<f64>() / n).sqrt();

        Some(SurprisalMetrics {
            mean,
            sum,
            uid_dev,
            sigma_gamma,
        })
    }
}

/// Root-mean-square of the raw successive differences.
///
/// Unlike [`SurprisalMetrics::sigma_gamma`] the differences are not centered,
/// so this is a distinct metric and the two are never interchangeable.
/// Returns NaN when fewer than 2 values.
pub fn quadratic_mean_transitions(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let diffs = successive_differences(values);
    (diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64).sqrt()
}

/// `values[i+1] - values[i]` for each adjacent pair.
fn successive_differences(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compute(values: &[f64]) -> SurprisalMetrics {
        SurprisalCalculator::new().compute(values).unwrap()
    }

    #[test]
    fn test_linear_sequence_exact_values() {
        // Successive differences are all exactly 1.
        let metrics = compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(metrics.uid_dev, 1.0);
        assert_eq!(metrics.sigma_gamma, 0.0);
        assert_eq!(metrics.sum, 15.0);
        assert_eq!(metrics.mean, 3.0);
    }

    #[test]
    fn test_constant_sequence_is_flat() {
        let metrics = compute(&[5.5, 5.5, 5.5, 5.5]);
        assert_eq!(metrics.uid_dev, 0.0);
        assert_eq!(metrics.sigma_gamma, 0.0);
    }

    #[test]
    fn test_idempotent_bit_identical() {
        let values = [22.23, 3.47, 23.90, 0.96, 21.90, 5.46, 18.80];
        let calc = SurprisalCalculator::new();
        let a = calc.compute(&values).unwrap();
        let b = calc.compute(&values).unwrap();
        assert_eq!(a.uid_dev.to_bits(), b.uid_dev.to_bits());
        assert_eq!(a.sigma_gamma.to_bits(), b.sigma_gamma.to_bits());
        assert_eq!(a.mean.to_bits(), b.mean.to_bits());
        assert_eq!(a.sum.to_bits(), b.sum.to_bits());
    }

    #[test]
    fn test_short_sequences_are_nan_by_default() {
        for values in [&[1.0][..], &[1.0, 2.0][..]] {
            let metrics = compute(values);
            assert!(metrics.uid_dev.is_nan(), "uid_dev must stay NaN, not 0");
            assert!(metrics.sigma_gamma.is_nan());
            // Aggregates are still defined.
            assert!(metrics.mean.is_finite());
        }
    }

    #[test]
    fn test_zero_below_two_mode() {
        let calc =
            SurprisalCalculator::new().with_short_sequence_policy(ShortSequencePolicy::ZeroBelowTwo);

        let single = calc.compute(&[4.0]).unwrap();
        assert_eq!(single.uid_dev, 0.0);
        assert_eq!(single.sigma_gamma, 0.0);

        // Two values compute normally under this mode.
        let pair = calc.compute(&[1.0, 3.0]).unwrap();
        assert_eq!(pair.uid_dev, 2.0);
        assert_eq!(pair.sigma_gamma, 0.0);
    }

    #[test]
    fn test_empty_sequence_is_none() {
        assert!(SurprisalCalculator::new().compute(&[]).is_none());
    }

    #[test]
    fn test_uid_dev_known_value() {
        // diffs: [2, -1, 3] -> |diffs| mean = 2.0
        let metrics = compute(&[1.0, 3.0, 2.0, 5.0]);
        assert!((metrics.uid_dev - 2.0).abs() < 1e-12);
        // mean(diffs) = 4/3; centered squares: (2/3)^2, (-7/3)^2, (5/3)^2
        let expected = ((4.0 / 9.0 + 49.0 / 9.0 + 25.0 / 9.0) / 3.0_f64).sqrt();
        assert!((metrics.sigma_gamma - expected).abs() < 1e-12);
    }

    #[test]
    fn test_quadratic_mean_is_not_sigma_gamma() {
        let values = [1.0, 2.0, 4.0];
        // diffs [1, 2]: rms = sqrt(2.5), sigma_gamma = 0.5
        let qmt = quadratic_mean_transitions(&values);
        assert!((qmt - 2.5_f64.sqrt()).abs() < 1e-12);
        let metrics = compute(&values);
        assert!((metrics.sigma_gamma - 0.5).abs() < 1e-12);
        assert!((qmt - metrics.sigma_gamma).abs() > 1.0);
    }

    #[test]
    fn test_quadratic_mean_short_input_is_nan() {
        assert!(quadratic_mean_transitions(&[]).is_nan());
        assert!(quadratic_mean_transitions(&[1.0]).is_nan());
    }
}
