//! Grouping and summary statistics used by the chart views.

use std::collections::BTreeMap;

/// Mean of the values for each key, ordered by key.
pub fn mean_by<K: Ord>(pairs: impl IntoIterator<Item = (K, f64)>) -> Vec<(K, f64)> {
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for (key, value) in pairs {
        let entry = groups.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Sorted distinct values.
pub fn distinct_sorted<T: Ord + Copy>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = values.into_iter().collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Five-number summary with Tukey whiskers.
///
/// Quartiles use linear interpolation between closest ranks. Whiskers reach
/// the most extreme observations within 1.5 IQR of the box; anything beyond
/// is an outlier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    const WHISKER_IQR: f64 = 1.5;

    /// Summarize a sample. Returns `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - Self::WHISKER_IQR * iqr;
        let high_fence = q3 + Self::WHISKER_IQR * iqr;

        let (within, outliers): (Vec<f64>, Vec<f64>) = sorted
            .iter()
            .partition(|v| **v >= low_fence && **v <= high_fence);
        let whisker_low = within.iter().copied().fold(f64::INFINITY, f64::min).min(q1);
        let whisker_high = within.iter().copied().fold(f64::NEG_INFINITY, f64::max).max(q3);

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Smallest and largest value drawn for this box, outliers included.
    pub fn extent(&self) -> (f64, f64) {
        let low = self.outliers.iter().copied().fold(self.whisker_low, f64::min);
        let high = self.outliers.iter().copied().fold(self.whisker_high, f64::max);
        (low, high)
    }
}

/// Quantile of sorted data by linear interpolation.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_by_groups_and_orders() {
        let means = mean_by(vec![(10u64, 2.0), (1, 5.0), (10, 4.0), (1, 1.0), (5, 7.0)]);
        assert_eq!(means, vec![(1, 3.0), (5, 7.0), (10, 3.0)]);
    }

    #[test]
    fn test_mean_by_empty() {
        let means: Vec<(u64, f64)> = mean_by(Vec::new());
        assert!(means.is_empty());
    }

    #[test]
    fn test_distinct_sorted() {
        assert_eq!(distinct_sorted(vec![4u64, 0, 4, 2, 0]), vec![0, 2, 4]);
    }

    #[test]
    fn test_box_stats_quartiles() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_box_stats_interpolates() {
        let stats = BoxStats::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
    }

    #[test]
    fn test_box_stats_outliers() {
        let stats = BoxStats::from_values(&[10.0, 11.0, 12.0, 13.0, 100.0]).unwrap();
        assert_eq!(stats.q1, 11.0);
        assert_eq!(stats.q3, 13.0);
        assert_eq!(stats.whisker_high, 13.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.extent(), (10.0, 100.0));
    }

    #[test]
    fn test_box_stats_single_value() {
        let stats = BoxStats::from_values(&[7.0]).unwrap();
        assert_eq!(stats.q1, 7.0);
        assert_eq!(stats.median, 7.0);
        assert_eq!(stats.whisker_low, 7.0);
        assert_eq!(stats.whisker_high, 7.0);
        assert!(BoxStats::from_values(&[]).is_none());
    }
}
