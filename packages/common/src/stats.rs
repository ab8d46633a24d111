use std::fmt;

/// Reduced statistics of one telemetry column.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub lowest: f64,
    pub low_1_percent: f64,
    pub mean: f64,
    pub median: f64,
    pub top_97_percent: f64,
    pub highest: f64,
    pub std_dev: f64,
    pub variance: f64,
}

impl ColumnStats {
    /// Compute statistics for `data`, sorting it in place.
    ///
    /// An empty slice yields the all-zero value.
    pub fn compute(data: &mut [f64]) -> Self {
        if data.is_empty() {
            return Self::default();
        }

        data.sort_unstable_by(f64::total_cmp);
        let count = data.len();
        let n = count as f64;

        let percentile_index =
            |fraction: f64| ((fraction * n).ceil() as usize).saturating_sub(1);

        let mean = data.iter().sum::<f64>() / n;
        let median = if count % 2 == 0 {
            (data[count / 2 - 1] + data[count / 2]) / 2.0
        } else {
            data[count / 2]
        };
        let variance = data.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        Self {
            count,
            lowest: data[0],
            low_1_percent: data[percentile_index(0.01)],
            mean,
            median,
            top_97_percent: data[percentile_index(0.97)],
            highest: data[count - 1],
            std_dev: variance.sqrt(),
            variance,
        }
    }
}

impl fmt::Display for ColumnStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Count: {}, Lowest: {}, Low1Percent: {}, Mean: {}, Median: {}, \
             Top97Percent: {}, Highest: {}, StdDev: {}, Variance: {}",
            self.count,
            self.lowest,
            self.low_1_percent,
            self.mean,
            self.median,
            self.top_97_percent,
            self.highest,
            self.std_dev,
            self.variance,
        )
    }
}
