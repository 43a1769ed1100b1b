use statrs::distribution::{ContinuousCDF, StudentsT};

use super::{mean, variance, StatisticalTest, TestResult};
use crate::compare::Faster;

/// Welch's t-test for comparing two independent samples with potentially unequal variances.
///
/// The two delivery paths are measured independently and their latency spreads
/// rarely match, so equal variances are not assumed.
#[derive(Debug, Clone)]
pub struct WelchTTest {
    /// The confidence level for determining statistical significance (default: 0.95).
    pub confidence_level: f64,
}

impl Default for WelchTTest {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

impl WelchTTest {
    /// Create a new Welch's t-test with the specified confidence level.
    ///
    /// # Panics
    /// Panics if confidence_level is not in the range (0, 1).
    pub fn new(confidence_level: f64) -> Self {
        assert!(
            confidence_level > 0.0 && confidence_level < 1.0,
            "confidence_level must be between 0 and 1 (exclusive)"
        );
        Self { confidence_level }
    }

    /// Degrees of freedom from the Welch-Satterthwaite equation.
    ///
    /// df = (var1/n1 + var2/n2)^2 / ((var1/n1)^2/(n1-1) + (var2/n2)^2/(n2-1))
    fn welch_satterthwaite_df(var1: f64, n1: usize, var2: f64, n2: usize) -> f64 {
        let s1 = var1 / n1 as f64;
        let s2 = var2 / n2 as f64;
        let numerator = (s1 + s2).powi(2);
        let denominator = (s1.powi(2) / (n1 - 1) as f64) + (s2.powi(2) / (n2 - 1) as f64);

        if denominator == 0.0 {
            return (n1.min(n2) - 1) as f64;
        }

        numerator / denominator
    }

    fn lower_mean(mean_a: f64, mean_b: f64) -> Option<Faster> {
        if mean_a < mean_b {
            Some(Faster::A)
        } else if mean_b < mean_a {
            Some(Faster::B)
        } else {
            None
        }
    }

    fn mean_or_zero(values: &[f64]) -> f64 {
        if values.is_empty() {
            0.0
        } else {
            mean(values)
        }
    }
}

impl StatisticalTest for WelchTTest {
    fn analyze(&self, a: &[f64], b: &[f64]) -> TestResult {
        let n1 = a.len();
        let n2 = b.len();
        let mean_a = Self::mean_or_zero(a);
        let mean_b = Self::mean_or_zero(b);

        let inconclusive = TestResult {
            p_value: 1.0,
            statistically_significant: false,
            confidence_level: self.confidence_level,
            winner: None,
            mean_a_ms: mean_a,
            mean_b_ms: mean_b,
        };

        let (Some(var1), Some(var2)) = (variance(a, mean_a), variance(b, mean_b)) else {
            return inconclusive;
        };

        let se = (var1 / n1 as f64 + var2 / n2 as f64).sqrt();

        // Both samples constant: any difference in means is exact
        if se == 0.0 {
            let winner = Self::lower_mean(mean_a, mean_b);
            return TestResult {
                p_value: if winner.is_some() { 0.0 } else { 1.0 },
                statistically_significant: winner.is_some(),
                winner,
                ..inconclusive
            };
        }

        let t_statistic = (mean_a - mean_b) / se;
        let df = Self::welch_satterthwaite_df(var1, n1, var2, n2);

        // Two-tailed: p = 2 * P(T > |t|)
        let p_value = match StudentsT::new(0.0, 1.0, df) {
            Ok(t_dist) => 2.0 * (1.0 - t_dist.cdf(t_statistic.abs())),
            Err(_) => 1.0,
        };

        let alpha = 1.0 - self.confidence_level;
        let statistically_significant = p_value < alpha;

        TestResult {
            p_value,
            statistically_significant,
            winner: if statistically_significant {
                Self::lower_mean(mean_a, mean_b)
            } else {
                None
            },
            ..inconclusive
        }
    }
}
