//! Zero-safe summary statistics. Empty inputs yield `None` (means) or `0.0`
//! (percentages), never NaN.

/// Arithmetic mean, `None` for an empty input.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values.iter().copied())?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// `part / whole * 100`, or `0.0` when `whole` is zero.
pub fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_of_empty_is_none() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_relative_eq!(mean([1.0, 2.0, 6.0]).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[]), None);
        assert_relative_eq!(median(&[7.0, 1.0, 3.0]).unwrap(), 3.0);
        assert_relative_eq!(median(&[4.0, 1.0, 3.0, 10.0]).unwrap(), 3.5);
    }

    #[test]
    fn test_sample_std_matches_hand_computation() {
        assert_eq!(sample_std(&[5.0]), None);
        // mean 5, squared deviations 9+1+1+9 = 20, / 3
        let sd = sample_std(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_relative_eq!(sd, (20.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_pct_with_zero_denominator_is_zero() {
        assert_eq!(pct(0, 0), 0.0);
        assert_eq!(pct(3, 0), 0.0);
        assert_relative_eq!(pct(1, 4), 25.0);
    }
}
