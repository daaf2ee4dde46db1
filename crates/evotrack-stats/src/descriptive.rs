/// Summary measures for a sample of `f64` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes the summary from unsorted values.
    ///
    /// Returns `None` for an empty sample.
    ///
    /// # Examples
    ///
    /// ```
    /// # use evotrack_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Like [`Self::new`], but skips the sort for pre-sorted input.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        debug_assert!(sorted.is_sorted_by(|a, b| a <= b));

        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let median = sorted[sorted.len() / 2];
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
