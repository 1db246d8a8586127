//! Scoring primitives for the evaluation harness.

use serde::{Deserialize, Serialize};

/// Fraction of positions where truth and prediction agree.
///
/// Pairs are compared in lock-step; the denominator is the truth length.
/// An empty truth slice scores 0.0.
#[must_use]
pub fn accuracy<T: PartialEq>(truth: &[T], pred: &[T]) -> f64 {
    debug_assert_eq!(truth.len(), pred.len());
    if truth.is_empty() {
        return 0.0;
    }
    let matches = truth.iter().zip(pred).filter(|(t, p)| t == p).count();
    matches as f64 / truth.len() as f64
}

/// Confusion matrix over a fixed label axis.
///
/// Rows are truth, columns are prediction. Pairs whose truth or prediction
/// is not on the axis are ignored, so the axis fully determines the matrix
/// shape regardless of what the pairs contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: Vec<usize>,
}

impl ConfusionMatrix {
    /// Build a matrix over `labels` from (truth, prediction) pairs.
    #[must_use]
    pub fn from_pairs<'a>(
        labels: &[&str],
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let labels: Vec<String> = labels.iter().map(|&l| l.to_string()).collect();
        let n = labels.len();
        let mut counts = vec![0usize; n * n];

        let index_of = |label: &str| labels.iter().position(|l| l == label);
        for (truth, pred) in pairs {
            if let (Some(i), Some(j)) = (index_of(truth), index_of(pred)) {
                counts[i * n + j] += 1;
            }
        }

        Self { labels, counts }
    }

    /// The label axis.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels on the axis.
    #[must_use]
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Count at (truth row `i`, prediction column `j`).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> usize {
        assert!(i < self.size() && j < self.size(), "index out of range");
        self.counts[i * self.size() + j]
    }

    /// Count for a (truth, prediction) label pair, `None` if either label
    /// is not on the axis.
    #[must_use]
    pub fn count(&self, truth: &str, pred: &str) -> Option<usize> {
        let i = self.labels.iter().position(|l| l == truth)?;
        let j = self.labels.iter().position(|l| l == pred)?;
        Some(self.counts[i * self.size() + j])
    }

    /// Total count in truth row `i`.
    #[must_use]
    pub fn row_total(&self, i: usize) -> usize {
        (0..self.size()).map(|j| self.get(i, j)).sum()
    }

    /// The diagonal (correct predictions per class).
    #[must_use]
    pub fn diagonal(&self) -> Vec<usize> {
        (0..self.size()).map(|i| self.get(i, i)).collect()
    }

    /// Total number of counted pairs.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert!((accuracy(&["a", "b", "a"], &["a", "a", "a"]) - 2.0 / 3.0).abs() < 1e-12);
        assert!((accuracy(&["a"], &["a"]) - 1.0).abs() < f64::EPSILON);
        assert!(accuracy::<&str>(&[], &[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_confusion_counts_land_in_cells() {
        let cf = ConfusionMatrix::from_pairs(
            &["a", "b", "c"],
            vec![("a", "a"), ("a", "b"), ("b", "b"), ("c", "a")],
        );
        assert_eq!(cf.count("a", "a"), Some(1));
        assert_eq!(cf.count("a", "b"), Some(1));
        assert_eq!(cf.count("b", "b"), Some(1));
        assert_eq!(cf.count("c", "a"), Some(1));
        assert_eq!(cf.count("c", "c"), Some(0));
        assert_eq!(cf.total(), 4);
        assert_eq!(cf.diagonal(), vec![1, 1, 0]);
    }

    #[test]
    fn test_pairs_off_axis_are_ignored() {
        let cf = ConfusionMatrix::from_pairs(&["a", "b"], vec![("a", "a"), ("z", "a"), ("a", "z")]);
        assert_eq!(cf.total(), 1);
    }

    #[test]
    fn test_row_total() {
        let cf = ConfusionMatrix::from_pairs(&["a", "b"], vec![("a", "a"), ("a", "b"), ("b", "a")]);
        assert_eq!(cf.row_total(0), 2);
        assert_eq!(cf.row_total(1), 1);
    }
}
