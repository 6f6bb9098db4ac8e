pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Mean over every value of a `[user][step]` series.
    pub fn mean_nested(series: &[Vec<f64>]) -> f64 {
        let count: usize = series.iter().map(Vec::len).sum();
        if count == 0 {
            return 0.0;
        }
        series.iter().flatten().sum::<f64>() / count as f64
    }

    pub fn sum_nested(series: &[Vec<f64>]) -> f64 {
        series.iter().flatten().sum()
    }

    pub fn min_max(samples: &[f64]) -> Option<(f64, f64)> {
        samples.iter().fold(None, |acc, &value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
    }

    /// Number of times consecutive samples differ.
    pub fn transitions(samples: &[f64]) -> usize {
        samples.windows(2).filter(|pair| pair[0] != pair[1]).count()
    }
}
