use rand::Rng;

/// Observed statistic with its bootstrap bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub stat: f64,
    pub low: f64,
    pub high: f64,
}

/// Arithmetic mean as a running average, so constant input yields exactly
/// that constant. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values
        .iter()
        .enumerate()
        .fold(0.0, |acc, (i, &v)| acc + (v - acc) / (i + 1) as f64)
}

/// Percentile `q` (in `[0, 1]`) of ascending `sorted`, interpolating
/// linearly between the two nearest order statistics.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            if lo == hi {
                sorted[lo]
            } else {
                sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
            }
        }
    }
}

/// Percentile bootstrap interval of `stat` over `values`.
///
/// Draws `resamples` samples of `values.len()` with replacement, applies
/// `stat` to each and returns the `alpha / 2` and `1 - alpha / 2`
/// percentiles of the results next to `stat(values)`.
/// Returns `None` when `values` is empty or `resamples` is zero.
pub fn bootstrap_ci<R, F>(
    values: &[f64],
    stat: F,
    alpha: f64,
    resamples: usize,
    rng: &mut R,
) -> Option<Interval>
where
    R: Rng + ?Sized,
    F: Fn(&[f64]) -> f64,
{
    if values.is_empty() || resamples == 0 {
        return None;
    }

    let n = values.len();
    let mut sample = vec![0.0; n];
    let mut stats = Vec::with_capacity(resamples);
    for _ in 0..resamples {
        for slot in sample.iter_mut() {
            *slot = values[rng.random_range(0..n)];
        }
        stats.push(stat(&sample));
    }
    stats.sort_by(|a, b| a.total_cmp(b));

    let low = percentile(&stats, alpha / 2.0);
    let high = percentile(&stats, 1.0 - alpha / 2.0);
    if low == high {
        // Degenerate distribution, e.g. a constant group.
        log::trace!("bootstrap interval collapsed to {low} over {n} values");
    }

    Some(Interval {
        stat: stat(values),
        low,
        high,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn mean_of_constant_is_exact() {
        assert_eq!(mean(&[0.1; 100]), 0.1);
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 0.5), 3.0);
        assert_eq!(percentile(&sorted, 1.0), 5.0);
        assert!((percentile(&sorted, 0.1) - 1.4).abs() < 1e-12);
        assert_eq!(percentile(&[7.0], 0.3), 7.0);
    }

    #[test]
    fn constant_values_collapse_to_a_point() {
        let mut rng = StdRng::seed_from_u64(1);
        let ci = bootstrap_ci(&[0.1; 100], mean, 0.05, 200, &mut rng).unwrap();
        assert_eq!(ci, Interval { stat: 0.1, low: 0.1, high: 0.1 });
    }

    #[test]
    fn interval_brackets_the_mean() {
        let values: Vec<f64> = (0..50).map(f64::from).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let ci = bootstrap_ci(&values, mean, 0.05, 500, &mut rng).unwrap();
        assert_eq!(ci.stat, 24.5);
        assert!(ci.low < ci.stat && ci.stat < ci.high);
        assert!(ci.low > 15.0 && ci.high < 34.0);
    }

    #[test]
    fn same_seed_same_interval() {
        let values = [1.0, 5.0, 2.0, 8.0, 3.0];
        let a = bootstrap_ci(&values, mean, 0.1, 100, &mut StdRng::seed_from_u64(3));
        let b = bootstrap_ci(&values, mean, 0.1, 100, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_has_no_interval() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(bootstrap_ci(&[], mean, 0.05, 200, &mut rng), None);
        assert_eq!(bootstrap_ci(&[1.0], mean, 0.05, 0, &mut rng), None);
    }

    #[test]
    fn custom_statistic() {
        let max = |v: &[f64]| v.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut rng = StdRng::seed_from_u64(11);
        let ci = bootstrap_ci(&[1.0, 2.0, 3.0], max, 0.05, 200, &mut rng).unwrap();
        assert_eq!(ci.stat, 3.0);
        assert!(ci.high <= 3.0 && ci.low >= 1.0);
    }
}
