//! Summary statistics over per-node and per-request values.

/// Quantile of an ascending-sorted sample using the R8 estimator.
///
/// `q` is in `[0, 1]`. The estimator places the `k`-th order statistic at
/// `idx = 1/3 + q * (n + 1/3)` and interpolates linearly between neighbors;
/// indices outside the sample clamp to its minimum or maximum. An empty
/// sample has no quantile and yields NaN.
pub fn percentile(sorted: &[u64], q: f64) -> f64 {
    let Some((&first, &last)) = sorted.first().zip(sorted.last()) else {
        return f64::NAN;
    };

    let n = sorted.len() as f64;
    let idx = 1.0 / 3.0 + q * (n + 1.0 / 3.0);
    let k = idx.floor();
    let frac = idx - k;

    if k <= 0.0 {
        return first as f64;
    }
    if k >= n {
        return last as f64;
    }

    let k = k as usize;
    let lower = sorted[k - 1] as f64;
    let upper = sorted[k] as f64;
    lower + frac * (upper - lower)
}

/// Distribution summary written for bandwidth, storage and hops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Sum over the whole sample
    pub total: u64,
    /// Largest value
    pub max: u64,
    /// Smallest value
    pub min: u64,
    /// `total` over the averaging population
    pub avg: f64,
    /// 50th percentile
    pub median: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

impl Summary {
    /// Summarizes a sample; `avg_divisor` is the population the mean is taken over.
    ///
    /// Returns `None` for an empty sample.
    pub fn of(mut values: Vec<u64>, avg_divisor: usize) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_unstable();

        let total: u64 = values.iter().sum();
        Some(Self {
            total,
            max: values[values.len() - 1],
            min: values[0],
            avg: total as f64 / avg_divisor as f64,
            median: percentile(&values, 0.50),
            p95: percentile(&values, 0.95),
            p99: percentile(&values, 0.99),
        })
    }

    /// All-zero summary for steps without any sample.
    pub fn zero() -> Self {
        Self {
            total: 0,
            max: 0,
            min: 0,
            avg: 0.0,
            median: 0.0,
            p95: 0.0,
            p99: 0.0,
        }
    }

    /// Summary of an empty sample whose mean and quantiles are undefined.
    pub fn undefined() -> Self {
        Self {
            avg: f64::NAN,
            median: f64::NAN,
            p95: f64::NAN,
            p99: f64::NAN,
            ..Self::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let values = [1, 2, 3, 4];
        // idx = 1/3 + 0.5 * 13/3 = 2.5
        assert!((percentile(&values, 0.5) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[7], 0.0), 7.0);
        assert_eq!(percentile(&[7], 0.5), 7.0);
        assert_eq!(percentile(&[7], 1.0), 7.0);
    }

    #[test]
    fn test_percentile_of_empty_sample_is_nan() {
        assert!(percentile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_summary_of_values() {
        let summary = Summary::of(vec![30, 10, 20], 3).unwrap();

        assert_eq!(summary.total, 60);
        assert_eq!(summary.max, 30);
        assert_eq!(summary.min, 10);
        assert_eq!(summary.avg, 20.0);
        assert!((summary.median - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_of_empty_sample() {
        assert!(Summary::of(Vec::new(), 0).is_none());
        assert!(Summary::undefined().avg.is_nan());
        assert_eq!(Summary::zero().avg, 0.0);
    }

    proptest! {
        #[test]
        fn prop_percentile_bounds(mut values in proptest::collection::vec(0u64..1_000_000, 1..200)) {
            values.sort_unstable();
            let min = values[0] as f64;
            let max = values[values.len() - 1] as f64;

            prop_assert_eq!(percentile(&values, 0.0), min);
            prop_assert_eq!(percentile(&values, 1.0), max);

            for q in [0.5, 0.95, 0.99] {
                let p = percentile(&values, q);
                prop_assert!(p >= min && p <= max);
            }
        }
    }
}
