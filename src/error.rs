//! Error types for the classification pipeline core.
//!
//! Every failure surfaces to the immediate caller with enough context
//! (task priority, classifier key, offending class tag) to attribute blame.

use std::path::PathBuf;

use thiserror::Error;

use crate::classes::{ClassLevel, ClassTag};
use crate::classifier::ClassifierKey;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum Error {
    /// Bad constructor arguments (e.g. a features-cache directory that does
    /// not exist). Raised once, at construction, never retried.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Observation file with an unrecognized encoding suffix.
    #[error("unrecognized light-curve format: {}", path.display())]
    InvalidFormat {
        /// Path of the rejected observation file
        path: PathBuf,
    },

    /// Observation file that parsed but holds unusable contents
    /// (wrong column count, missing required column, empty table).
    #[error("malformed light curve: {0}")]
    MalformedLightCurve(String),

    /// A classifier variant returned a class outside the active taxonomy.
    /// Signals a bug in the variant, not a data problem.
    #[error("classifier '{classifier}' returned unknown stellar class '{class}' for level {level}")]
    UnknownClass {
        /// Key of the offending classifier variant
        classifier: ClassifierKey,
        /// The foreign class tag
        class: ClassTag,
        /// The active classification level
        level: ClassLevel,
    },

    /// A classifier variant returned a probability outside [0, 1].
    #[error("classifier '{classifier}' returned probability {value} outside [0, 1] for class '{class}'")]
    InvalidProbability {
        /// Key of the offending classifier variant
        classifier: ClassifierKey,
        /// The class the probability was assigned to
        class: ClassTag,
        /// The out-of-range value
        value: f64,
    },

    /// A classifier variant returned an empty probability map, leaving the
    /// harness nothing to select a prediction from.
    #[error("classifier '{classifier}' returned no class probabilities")]
    EmptyClassification {
        /// Key of the offending classifier variant
        classifier: ClassifierKey,
    },

    /// A training set yielded a test star without any ground-truth label.
    #[error("test star #{index} carries no ground-truth labels")]
    MissingGroundTruth {
        /// Zero-based position in the test split
        index: usize,
    },

    /// The default-rejecting base contract was invoked without a concrete
    /// variant. A programming error.
    #[error("base classifier has no classification algorithm")]
    NotImplemented,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache serialization error
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
