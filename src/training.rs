//! Training-set collaborator interface consumed by the evaluation harness.

use crate::classes::{ClassLevel, ClassTag};
use crate::features::FeatureBundle;

/// A training set with a held-out test split.
///
/// The harness walks `features_test` and `labels_test` in lock-step, so
/// both iterators must enumerate the same stars in the same order. Each
/// label list carries at least one tag; additional tags mark multi-labelled
/// stars.
pub trait TrainingSet {
    /// Short identifier of this training set, used in artifact names.
    fn key(&self) -> &str;

    /// Fraction of the set held out for testing. A value of zero (or less)
    /// disables evaluation entirely.
    fn testfraction(&self) -> f64;

    /// Number of stars in the test split.
    fn test_len(&self) -> usize;

    /// Feature bundles of the test split, in split order.
    fn features_test(&self) -> Box<dyn Iterator<Item = FeatureBundle> + '_>;

    /// Ground-truth labels of the test split at `level`, in split order.
    fn labels_test(&self, level: ClassLevel) -> Box<dyn Iterator<Item = Vec<ClassTag>> + '_>;
}
