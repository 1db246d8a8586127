//! Feature bundles derived from light curves, and their on-disk cache.
//!
//! A bundle is built once per task and then reused by every classifier
//! variant operating on that task, so construction must be deterministic
//! and pure with respect to the light curve. Task-supplied fields are
//! attached (and overwritten) after construction or cache load.

mod cache;
mod fliper;
mod freqextr;
mod powerspectrum;

pub use cache::FeatureCache;
pub use fliper::fliper;
pub use freqextr::freqextr;
pub use powerspectrum::PowerSpectrum;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lightcurve::LightCurve;
use crate::task::{Task, TaskResult};

/// The full set of derived and raw values computed from one light curve.
///
/// Named scalar features live in an ordered map; the light curve and power
/// spectrum ride along as typed slots. Keys are namespaced by convention
/// and no collisions are expected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    starid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lightcurve: Option<LightCurve>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    power_spectrum: Option<PowerSpectrum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    other_classifiers: Option<Vec<TaskResult>>,
    #[serde(default)]
    values: BTreeMap<String, f64>,
}

impl FeatureBundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the bundle holds no computed content yet.
    ///
    /// Attached task fields do not count: a fresh meta-variant bundle is
    /// still "empty" for the purpose of cache bookkeeping.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lightcurve.is_none() && self.power_spectrum.is_none() && self.values.is_empty()
    }

    /// Priority of the originating task, once attached.
    #[must_use]
    pub const fn priority(&self) -> Option<u64> {
        self.priority
    }

    /// Star identifier of the originating task, once attached.
    #[must_use]
    pub const fn starid(&self) -> Option<i64> {
        self.starid
    }

    /// The cleaned light curve, for variants that consume it directly.
    #[must_use]
    pub const fn lightcurve(&self) -> Option<&LightCurve> {
        self.lightcurve.as_ref()
    }

    /// The power-spectrum object.
    #[must_use]
    pub const fn power_spectrum(&self) -> Option<&PowerSpectrum> {
        self.power_spectrum.as_ref()
    }

    /// Other classifiers' results, for the meta variant.
    #[must_use]
    pub fn other_classifiers(&self) -> Option<&[TaskResult]> {
        self.other_classifiers.as_deref()
    }

    /// Look up a named scalar feature.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Set a named scalar feature.
    pub fn set_value(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// All named scalar features.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }

    /// Attach (or overwrite) the task-supplied fields.
    ///
    /// Always applied after bundle construction or cache load, so task
    /// fields from the current run win over whatever the cache holds.
    pub fn attach_task(&mut self, task: &Task) {
        self.priority = Some(task.priority);
        self.starid = Some(task.starid);
        for (name, value) in [
            ("tmag", task.tmag),
            ("variance", task.variance),
            ("rms_hour", task.rms_hour),
            ("ptp", task.ptp),
        ] {
            if let Some(value) = value {
                self.values.insert(name.to_string(), value);
            }
        }
        if let Some(other) = &task.other_classifiers {
            self.other_classifiers = Some(other.clone());
        }
    }
}

/// Compute the feature bundle of a light curve.
///
/// Invalid samples are removed, a power spectrum is computed, and the
/// frequency-domain and FliPer features are extracted from it. The cleaned
/// curve and the spectrum are stored in the bundle for variants that
/// consume them directly.
///
/// # Errors
///
/// Returns [`Error::MalformedLightCurve`] if no valid samples remain after
/// cleaning.
pub fn compute_features(lightcurve: &LightCurve) -> Result<FeatureBundle> {
    let cleaned = lightcurve.remove_invalid();
    if cleaned.is_empty() {
        return Err(Error::MalformedLightCurve(
            "no valid samples remain after cleaning".to_string(),
        ));
    }

    let psd = PowerSpectrum::of(&cleaned);

    let mut bundle = FeatureBundle::new();
    for (name, value) in freqextr(&psd) {
        bundle.values.insert(name, value);
    }
    for (name, value) in fliper(&psd) {
        bundle.values.insert(name, value);
    }
    bundle.lightcurve = Some(cleaned);
    bundle.power_spectrum = Some(psd);
    Ok(bundle)
}
