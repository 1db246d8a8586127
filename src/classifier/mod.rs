//! The classification contract and its validating wrapper.
//!
//! Every concrete classifier algorithm implements [`Classifier`];
//! [`StarClassifier`] wraps one such variant and enforces the output
//! contract (taxonomy membership, probability bounds) on its behalf, so
//! the harness and all calling code depend only on the wrapper, never on
//! a variant's internals.

mod harness;

pub use harness::TestReport;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classes::{ClassLevel, ClassTag};
use crate::error::{Error, Result};
use crate::features::{self, FeatureBundle, FeatureCache};
use crate::lightcurve;
use crate::task::Task;

/// Identity keys of the known classifier variants.
///
/// A closed set: the task manager records results under these short names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKey {
    /// The default-rejecting base contract.
    Base,
    /// Random-forest/general-classifier variant.
    Rfgc,
    /// Neural (SLOSH) variant.
    Slosh,
    /// Gradient-boosted tree variant.
    Xgb,
    /// Meta variant, consuming only other classifiers' outputs.
    Meta,
}

impl ClassifierKey {
    /// The short identifier used in records and artifact names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Rfgc => "rfgc",
            Self::Slosh => "slosh",
            Self::Xgb => "xgb",
            Self::Meta => "meta",
        }
    }
}

impl fmt::Display for ClassifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class-to-probability mapping produced by a classifier variant.
///
/// Values are independent per-class scores in [0, 1]; no sum-to-one
/// constraint exists at this layer. Iteration order is deterministic
/// (ordered by tag), which fixes argmax tie-breaking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classification(BTreeMap<ClassTag, f64>);

impl Classification {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes with a score.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no class has a score.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set the score for a class.
    pub fn insert(&mut self, class: ClassTag, probability: f64) {
        self.0.insert(class, probability);
    }

    /// The score for a class, if set.
    #[must_use]
    pub fn get(&self, class: ClassTag) -> Option<f64> {
        self.0.get(&class).copied()
    }

    /// Iterate over (class, score) pairs in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassTag, f64)> + '_ {
        self.0.iter().map(|(&class, &p)| (class, p))
    }

    /// The class with the highest score.
    ///
    /// Ties are broken by the first-encountered entry in iteration order.
    /// Returns `None` for an empty mapping.
    #[must_use]
    pub fn best(&self) -> Option<(ClassTag, f64)> {
        let mut best: Option<(ClassTag, f64)> = None;
        for (class, p) in self.iter() {
            match best {
                Some((_, current)) if p <= current => {}
                _ => best = Some((class, p)),
            }
        }
        best
    }
}

impl FromIterator<(ClassTag, f64)> for Classification {
    fn from_iter<I: IntoIterator<Item = (ClassTag, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The one capability every concrete classifier variant implements.
///
/// Implementations return raw, unvalidated scores; validation lives in the
/// wrapper. A variant must not be handed features it did not ask for: the
/// loader decides per-key what goes into the bundle.
pub trait Classifier {
    /// This variant's identity key.
    fn key(&self) -> ClassifierKey;

    /// Classify a star from its feature bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the variant cannot produce a result.
    fn classify(&self, features: &FeatureBundle) -> Result<Classification>;
}

/// The default-rejecting base variant.
///
/// Exists so the wrapper is constructible without an algorithm; invoking
/// it is a programming error.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseVariant;

impl Classifier for BaseVariant {
    fn key(&self) -> ClassifierKey {
        ClassifierKey::Base
    }

    fn classify(&self, _features: &FeatureBundle) -> Result<Classification> {
        Err(Error::NotImplemented)
    }
}

/// Configuration for a [`StarClassifier`].
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    level: ClassLevel,
    data_root: PathBuf,
    tset_key: Option<String>,
    features_cache: Option<PathBuf>,
}

impl ClassifierConfig {
    /// Create a configuration builder with defaults (level L1, data root
    /// `data`, no training-set key, no features cache).
    #[must_use]
    pub fn builder() -> ClassifierConfigBuilder {
        ClassifierConfigBuilder::default()
    }

    /// The active classification level.
    #[must_use]
    pub const fn level(&self) -> ClassLevel {
        self.level
    }

    /// Root under which per-level data directories are created.
    #[must_use]
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// The training-set key, if the classifier is bound to one.
    #[must_use]
    pub fn tset_key(&self) -> Option<&str> {
        self.tset_key.as_deref()
    }

    /// The features-cache directory, if caching is enabled.
    #[must_use]
    pub fn features_cache(&self) -> Option<&Path> {
        self.features_cache.as_deref()
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ClassifierConfig`].
#[derive(Debug, Default)]
pub struct ClassifierConfigBuilder {
    level: Option<ClassLevel>,
    data_root: Option<PathBuf>,
    tset_key: Option<String>,
    features_cache: Option<PathBuf>,
}

impl ClassifierConfigBuilder {
    /// Set the classification level.
    #[must_use]
    pub fn level(mut self, level: ClassLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the data-directory root.
    #[must_use]
    pub fn data_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.data_root = Some(root.into());
        self
    }

    /// Bind the classifier to a training set.
    #[must_use]
    pub fn tset_key(mut self, key: impl Into<String>) -> Self {
        self.tset_key = Some(key.into());
        self
    }

    /// Enable the on-disk features cache rooted at `dir`.
    #[must_use]
    pub fn features_cache(mut self, dir: impl Into<PathBuf>) -> Self {
        self.features_cache = Some(dir.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClassifierConfig {
        ClassifierConfig {
            level: self.level.unwrap_or(ClassLevel::L1),
            data_root: self.data_root.unwrap_or_else(|| PathBuf::from("data")),
            tset_key: self.tset_key,
            features_cache: self.features_cache,
        }
    }
}

/// A classifier variant wrapped with the validated output contract, the
/// feature loader and the evaluation harness.
pub struct StarClassifier {
    variant: Box<dyn Classifier>,
    key: ClassifierKey,
    level: ClassLevel,
    tset_key: Option<String>,
    data_dir: PathBuf,
    cache: Option<FeatureCache>,
}

impl StarClassifier {
    /// Wrap `variant` under `config`.
    ///
    /// The per-level data directory is created on demand; a configured
    /// features-cache directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a missing cache
    /// directory, or an IO error if the data directory cannot be created.
    pub fn new(variant: Box<dyn Classifier>, config: &ClassifierConfig) -> Result<Self> {
        let key = variant.key();

        let mut data_dir = config.data_root().join(config.level().as_str());
        if let Some(tset_key) = config.tset_key() {
            data_dir.push(tset_key);
        }
        fs::create_dir_all(&data_dir)?;
        debug!(classifier = %key, data_dir = %data_dir.display(), "data directory");

        let cache = config
            .features_cache()
            .map(FeatureCache::open)
            .transpose()?;

        Ok(Self {
            variant,
            key,
            level: config.level(),
            tset_key: config.tset_key().map(str::to_string),
            data_dir,
            cache,
        })
    }

    /// This classifier's identity key.
    #[must_use]
    pub const fn key(&self) -> ClassifierKey {
        self.key
    }

    /// The active classification level.
    #[must_use]
    pub const fn level(&self) -> ClassLevel {
        self.level
    }

    /// The training-set key this classifier is bound to, if any.
    #[must_use]
    pub fn tset_key(&self) -> Option<&str> {
        self.tset_key.as_deref()
    }

    /// Directory where this classifier stores auxiliary data and
    /// diagnostic artifacts.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Classify a star, enforcing the output contract.
    ///
    /// Runs the wrapped variant and checks every returned entry: the class
    /// must belong to the active taxonomy and the probability must lie in
    /// [0, 1]. The mapping is returned unchanged; no normalization is
    /// performed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownClass`] or [`Error::InvalidProbability`]
    /// for a contract violation, or the variant's own error.
    pub fn classify(&self, features: &FeatureBundle) -> Result<Classification> {
        let result = self.variant.classify(features)?;

        for (class, probability) in result.iter() {
            if !class.in_level(self.level) {
                return Err(Error::UnknownClass {
                    classifier: self.key,
                    class,
                    level: self.level,
                });
            }
            if !(0.0..=1.0).contains(&probability) {
                return Err(Error::InvalidProbability {
                    classifier: self.key,
                    class,
                    value: probability,
                });
            }
        }

        Ok(result)
    }

    /// Load a star's feature bundle for a task from the task manager.
    ///
    /// The meta variant consumes only other classifiers' outputs, so for
    /// it no light curve is loaded and nothing is computed or cached; only
    /// the task's own fields are attached. For every other variant the
    /// observation file is parsed, the bundle is loaded from the cache if
    /// present, computed otherwise, and a freshly computed bundle is
    /// persisted for the other variants operating on the same task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for an unrecognized observation
    /// encoding, or any parsing, computation or cache error.
    pub fn load_star(&self, task: &Task, fname: &Path) -> Result<FeatureBundle> {
        let mut bundle = FeatureBundle::new();
        let mut save_to_cache = false;

        if self.key != ClassifierKey::Meta {
            let lightcurve = lightcurve::load(fname, task)?;

            if let Some(cache) = &self.cache {
                if let Some(cached) = cache.load(task.priority)? {
                    bundle = cached;
                }
            }

            if bundle.is_empty() {
                save_to_cache = true;
                bundle = features::compute_features(&lightcurve)?;
                debug!(
                    priority = task.priority,
                    features = bundle.values().len(),
                    "computed features"
                );
            }
        }

        bundle.attach_task(task);

        if save_to_cache {
            if let Some(cache) = &self.cache {
                cache.save(task.priority, &bundle)?;
            }
        }

        Ok(bundle)
    }
}

impl fmt::Debug for StarClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StarClassifier")
            .field("key", &self.key)
            .field("level", &self.level)
            .field("data_dir", &self.data_dir)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
