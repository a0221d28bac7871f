//! Quantiles over posterior sample sets
//!
//! Quantiles use linear interpolation between the two order statistics that
//! bracket position `(n - 1) * q`. For `q = 0.5` this is the conventional
//! median for both odd and even sample counts.

/// Compute the `q`-quantile of `samples`, `q` in `[0, 1]`
///
/// Sorts a copy of the input; the input slice is left untouched.
/// Returns `None` for an empty slice or a `q` outside `[0, 1]`.
///
/// Time complexity: O(n log n)
pub fn quantile(samples: &[f64], q: f64) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let sorted = sorted_copy(samples);
    quantile_sorted(&sorted, q)
}

/// Compute the `q`-quantile of an already ascending slice
///
/// Use this when several quantiles are read from the same sample set so the
/// sort happens once.
///
/// Time complexity: O(1)
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let pos = (sorted.len() - 1) as f64 * q;
    let base = pos.floor() as usize;
    let rest = pos - base as f64;

    match sorted.get(base + 1) {
        Some(next) => Some(sorted[base] + rest * (next - sorted[base])),
        None => Some(sorted[base]),
    }
}

/// Return an ascending copy of `samples`
pub fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Lower and upper bounds of the central credible interval at `level`
///
/// A `level` of 0.95 reads the 2.5th and 97.5th percentiles.
pub fn central_interval_sorted(sorted: &[f64], level: f64) -> Option<(f64, f64)> {
    let tail = (1.0 - level) / 2.0;
    Some((quantile_sorted(sorted, tail)?, quantile_sorted(sorted, 1.0 - tail)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_even() {
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5), Some(2.5));
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(quantile(&[5.0, 1.0, 3.0], 0.5), Some(3.0));
    }

    #[test]
    fn test_extremes() {
        let data = [4.0, 2.0, 9.0, 1.0];
        assert_eq!(quantile(&data, 0.0), Some(1.0));
        assert_eq!(quantile(&data, 1.0), Some(9.0));
    }

    #[test]
    fn test_interpolation() {
        let data: Vec<f64> = (0..=10).map(|x| x as f64).collect();
        let q = quantile(&data, 0.25).unwrap();
        assert!((q - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_out_of_range() {
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[1.0], -0.1), None);
        assert_eq!(quantile(&[1.0], 1.5), None);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(quantile(&[42.0], 0.975), Some(42.0));
    }

    #[test]
    fn test_input_not_mutated() {
        let data = vec![3.0, 1.0, 2.0];
        let _ = quantile(&data, 0.5);
        assert_eq!(data, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_central_interval() {
        let sorted: Vec<f64> = (0..=1000).map(|x| x as f64 / 1000.0).collect();
        let (lo, hi) = central_interval_sorted(&sorted, 0.95).unwrap();
        assert!((lo - 0.025).abs() < 1e-9);
        assert!((hi - 0.975).abs() < 1e-9);
    }
}
