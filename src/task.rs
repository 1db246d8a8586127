//! Task input and result records exchanged with the upstream task manager.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classifier::{Classification, ClassifierKey};
use crate::status::Status;

/// One unit of work: a single star to classify.
///
/// Issued by the upstream task manager and immutable once issued. The
/// `priority` is the stable identifier used to key cache files and result
/// records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable task identifier, used as the feature-cache key.
    pub priority: u64,
    /// Target star identifier.
    pub starid: i64,
    /// Path to the observation (light-curve) file.
    pub lightcurve: PathBuf,
    /// Precomputed TESS magnitude, if the task manager supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmag: Option<f64>,
    /// Precomputed flux variance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<f64>,
    /// Precomputed RMS on 1-hour timescales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rms_hour: Option<f64>,
    /// Precomputed point-to-point scatter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptp: Option<f64>,
    /// Results from other classifier variants, consumed by the meta variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_classifiers: Option<Vec<TaskResult>>,
}

impl Task {
    /// Create a task with only the required fields set.
    #[must_use]
    pub fn new(priority: u64, starid: i64, lightcurve: impl Into<PathBuf>) -> Self {
        Self {
            priority,
            starid,
            lightcurve: lightcurve.into(),
            tmag: None,
            variance: None,
            rms_hour: None,
            ptp: None,
            other_classifiers: None,
        }
    }
}

/// Result record emitted for one task, understood by the task manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Priority of the originating task.
    pub priority: u64,
    /// Identity key of the classifier variant that produced this record.
    pub classifier: ClassifierKey,
    /// Outcome status.
    pub status: Status,
    /// Validated class-to-probability mapping.
    pub starclass_results: Classification,
}
