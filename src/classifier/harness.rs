//! Held-out-split evaluation for a wrapped classifier variant.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::classes::StellarClass;
use crate::error::{Error, Result};
use crate::metrics::{self, ConfusionMatrix};
use crate::plots;
use crate::status::Status;
use crate::task::TaskResult;
use crate::training::TrainingSet;

use super::StarClassifier;

/// Outcome of one evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestReport {
    /// Fraction of test stars whose predicted class matched the ground
    /// truth's first label.
    pub accuracy: f64,
    /// Confusion matrix over the base-level class space.
    pub confusion: ConfusionMatrix,
    /// Path of the rendered diagnostic artifact.
    pub artifact: PathBuf,
    /// When the evaluation finished.
    pub generated_at: DateTime<Utc>,
}

impl StarClassifier {
    /// Evaluate this classifier on a training set's held-out test split.
    ///
    /// Walks the split one star at a time, in split order: classifies each
    /// feature bundle through the validated contract, records the argmax
    /// class as the prediction, and optionally hands the per-star
    /// [`TaskResult`] to `save_func` for persistence. Afterwards the split
    /// is scored against the first listed ground-truth label of each star
    /// and a confusion-matrix artifact is rendered into the data
    /// directory.
    ///
    /// A split configured with a zero (or negative) test fraction is an
    /// explicit no-op and returns `Ok(None)`: no predictions, no saved
    /// records, no artifact.
    ///
    /// The confusion matrix always spans the full base-level class value
    /// space, also when evaluating at level L2; off-axis pairs are
    /// dropped from the matrix (not from the accuracy).
    ///
    /// # Errors
    ///
    /// Returns the first classification or validation error encountered;
    /// processing of the split stops at the failing task.
    pub fn test(
        &self,
        tset: &dyn TrainingSet,
        mut save_func: Option<&mut dyn FnMut(&TaskResult)>,
    ) -> Result<Option<TestReport>> {
        if tset.testfraction() <= 0.0 {
            info!("test fraction is zero, no testing is performed");
            return Ok(None);
        }

        let all_classes: Vec<&'static str> =
            StellarClass::ALL.iter().map(|class| class.label()).collect();

        let progress = ProgressBar::new(tset.test_len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.set_message(format!("testing {}", self.key()));

        // Classify the test set one star at a time; variants that batch
        // internally are not supported here.
        let mut y_pred: Vec<&'static str> = Vec::with_capacity(tset.test_len());
        for (features, _labels) in tset.features_test().zip(tset.labels_test(self.level())) {
            let priority = features.priority().unwrap_or_default();
            let starclass_results = self.classify(&features)?;
            let (predicted, _) = starclass_results
                .best()
                .ok_or(Error::EmptyClassification {
                    classifier: self.key(),
                })?;

            let record = TaskResult {
                priority,
                classifier: self.key(),
                status: Status::Ok,
                starclass_results,
            };
            debug!(priority, prediction = %predicted, "classified test star");

            y_pred.push(predicted.label());
            if let Some(save) = save_func.as_mut() {
                save(&record);
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        // Only the first listed label is scored.
        let mut labels_test: Vec<&'static str> = Vec::with_capacity(y_pred.len());
        for (index, labels) in tset.labels_test(self.level()).enumerate() {
            let first = labels
                .first()
                .copied()
                .ok_or(Error::MissingGroundTruth { index })?;
            labels_test.push(first.label());
        }

        let accuracy = metrics::accuracy(&labels_test, &y_pred);
        info!(
            classifier = %self.key(),
            accuracy_percent = accuracy * 100.0,
            "test accuracy"
        );

        let confusion = ConfusionMatrix::from_pairs(
            &all_classes,
            labels_test.iter().copied().zip(y_pred.iter().copied()),
        );

        let artifact = self.data_dir().join(format!(
            "confusion_matrix_{}_{}_{}.svg",
            tset.key(),
            self.level(),
            self.key()
        ));
        let title = format!("{} - {} - {}", self.key(), tset.key(), self.level());
        plots::render_confusion_matrix(&confusion, &title, &artifact)?;

        Ok(Some(TestReport {
            accuracy,
            confusion,
            artifact,
            generated_at: Utc::now(),
        }))
    }
}
