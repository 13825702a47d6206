//! Five-number box statistics.
use crate::error::{Error, Result};

/// Box-plot statistics for one group of values.
///
/// Whiskers extend to the most extreme data point within 1.5 IQR of the
/// box; everything beyond is a flier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub fliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::Processing(
                "box statistics require at least one value".to_string(),
            ));
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let fliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Ok(Self {
            median,
            q1,
            q3,
            whisker_low,
            whisker_high,
            fliers,
        })
    }
}

/// Percentile with linear interpolation between closest ranks.
/// `sorted` must be ascending and non-empty.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::Processing(
            "median of an empty set is undefined".to_string(),
        ));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(percentile(&sorted, 50.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
        assert_eq!(percentile(&sorted, 50.0), 2.5);
        assert_eq!(percentile(&sorted, 25.0), 1.75);
    }

    #[test]
    fn median_of_odd_and_even_sets() {
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]).unwrap(), 2.5);
        assert!(median(&[]).is_err());
    }

    #[test]
    fn whiskers_stay_within_fences() {
        let mut values: Vec<f64> = (1..=9).map(|v| v as f64).collect();
        values.push(100.0); // flier
        let stats = BoxStats::from_values(&values).unwrap();
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 9.0);
        assert_eq!(stats.fliers, vec![100.0]);
        assert!(stats.q1 < stats.median && stats.median < stats.q3);
    }

    #[test]
    fn single_value_collapses_box() {
        let stats = BoxStats::from_values(&[5.0]).unwrap();
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.q1, 5.0);
        assert_eq!(stats.q3, 5.0);
        assert!(stats.fliers.is_empty());
    }
}
