//! # starclass: stellar-classification orchestration core
//!
//! Given a task describing one star (an identifier, a priority and a
//! pointer to a time-series light-curve file), this crate produces a
//! probability distribution over a fixed taxonomy of stellar variability
//! classes. It owns the orchestration contract of the pipeline:
//!
//! - **Feature cache & loader**: raw observations become cached, reusable
//!   feature bundles keyed by task priority ([`StarClassifier::load_star`]).
//! - **Classification contract**: heterogeneous classifier variants are
//!   forced into one verifiable output contract ([`Classifier`] wrapped by
//!   [`StarClassifier::classify`]).
//! - **Label resolution**: multi-label ground truth collapses
//!   deterministically to a single evaluation label ([`resolve_primary`]).
//! - **Evaluation harness**: a held-out test split is scored and reported
//!   reproducibly ([`StarClassifier::test`]).
//! - **Status protocol**: a closed outcome enumeration shared with the
//!   upstream task manager ([`Status`]).
//!
//! The numeric feature-extraction routines live behind the bundle seam in
//! [`features`]; concrete classification algorithms are plugged in as
//! [`Classifier`] implementations selected by configuration.
//!
//! ## Example
//!
//! ```rust,no_run
//! use starclass::{
//!     ClassTag, Classification, Classifier, ClassifierConfig, ClassifierKey, FeatureBundle,
//!     StarClassifier, Task,
//! };
//!
//! struct AlwaysEclipse;
//!
//! impl Classifier for AlwaysEclipse {
//!     fn key(&self) -> ClassifierKey {
//!         ClassifierKey::Xgb
//!     }
//!
//!     fn classify(&self, _features: &FeatureBundle) -> starclass::Result<Classification> {
//!         let mut result = Classification::new();
//!         result.insert(ClassTag::Eclipse, 1.0);
//!         Ok(result)
//!     }
//! }
//!
//! let config = ClassifierConfig::builder().build();
//! let classifier = StarClassifier::new(Box::new(AlwaysEclipse), &config)?;
//!
//! let task = Task::new(17, 261_136_679, "data/star-17.txt");
//! let features = classifier.load_star(&task, &task.lightcurve)?;
//! let result = classifier.classify(&features)?;
//! # Ok::<(), starclass::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod classes;
pub mod classifier;
pub mod error;
pub mod features;
pub mod lightcurve;
pub mod metrics;
pub mod plots;
pub mod status;
pub mod task;
pub mod training;

pub use classes::{resolve_primary, ClassLevel, ClassTag, StellarClass, StellarClassLevel2};
pub use classifier::{
    BaseVariant, Classification, Classifier, ClassifierConfig, ClassifierKey, StarClassifier,
    TestReport,
};
pub use error::{Error, Result};
pub use features::{compute_features, FeatureBundle, FeatureCache, PowerSpectrum};
pub use lightcurve::{LightCurve, LightCurveMeta};
pub use metrics::ConfusionMatrix;
pub use status::Status;
pub use task::{Task, TaskResult};
pub use training::TrainingSet;
