//! Time-series light-curve representation and format dispatch.
//!
//! Two source encodings normalize into the one [`LightCurve`] type: a plain
//! tabular text encoding ([`tabular`]) and a structured columnar binary
//! encoding with header metadata ([`columnar`]). Dispatch is by file
//! suffix; an unrecognized suffix is a hard error.

mod columnar;
mod tabular;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::Task;

/// Quality flags dropped at construction: safe mode, desaturation events
/// and bad calibration exclusions.
pub const DEFAULT_QUALITY_BITMASK: u32 = 2 | 8 | 256;

/// Metadata carried alongside the photometric columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightCurveMeta {
    /// Target star identifier.
    pub starid: Option<i64>,
    /// Human-readable target label.
    pub label: Option<String>,
    /// Observing sector.
    pub sector: Option<u32>,
    /// Camera identifier.
    pub camera: Option<u32>,
    /// CCD identifier.
    pub ccd: Option<u32>,
    /// Right ascension, degrees.
    pub ra: Option<f64>,
    /// Declination, degrees.
    pub dec: Option<f64>,
}

/// A time-ordered sequence of flux samples with per-cadence quality flags.
///
/// Flux is relative (ppm) with zero mean. Never mutated after construction;
/// cleaning operations return a new curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
    flux_err: Vec<f64>,
    quality: Vec<u32>,
    meta: LightCurveMeta,
}

impl LightCurve {
    /// Assemble a light curve from parallel columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLightCurve`] if the columns differ in
    /// length.
    pub fn new(
        time: Vec<f64>,
        flux: Vec<f64>,
        flux_err: Vec<f64>,
        quality: Vec<u32>,
        meta: LightCurveMeta,
    ) -> Result<Self> {
        let n = time.len();
        if flux.len() != n || flux_err.len() != n || quality.len() != n {
            return Err(Error::MalformedLightCurve(format!(
                "column lengths differ: time={n}, flux={}, flux_err={}, quality={}",
                flux.len(),
                flux_err.len(),
                quality.len()
            )));
        }
        Ok(Self {
            time,
            flux,
            flux_err,
            quality,
            meta,
        })
    }

    /// Number of cadences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the curve holds no cadences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample times, days.
    #[must_use]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Relative flux, ppm.
    #[must_use]
    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Flux uncertainties, ppm.
    #[must_use]
    pub fn flux_err(&self) -> &[f64] {
        &self.flux_err
    }

    /// Per-cadence quality flags.
    #[must_use]
    pub fn quality(&self) -> &[u32] {
        &self.quality
    }

    /// Associated metadata.
    #[must_use]
    pub const fn meta(&self) -> &LightCurveMeta {
        &self.meta
    }

    /// Time span of the curve in days, zero for fewer than two cadences.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Return a new curve with cadences matching `bitmask` dropped.
    #[must_use]
    pub fn with_quality_mask(&self, bitmask: u32) -> Self {
        self.retain(|i| self.quality[i] & bitmask == 0)
    }

    /// Return a new curve with non-finite times and fluxes and
    /// quality-flagged cadences removed. Applied before any spectral
    /// computation.
    #[must_use]
    pub fn remove_invalid(&self) -> Self {
        self.retain(|i| {
            self.time[i].is_finite() && self.flux[i].is_finite() && self.quality[i] == 0
        })
    }

    fn retain(&self, keep: impl Fn(usize) -> bool) -> Self {
        let mut out = Self {
            time: Vec::new(),
            flux: Vec::new(),
            flux_err: Vec::new(),
            quality: Vec::new(),
            meta: self.meta.clone(),
        };
        for i in 0..self.len() {
            if keep(i) {
                out.time.push(self.time[i]);
                out.flux.push(self.flux[i]);
                out.flux_err.push(self.flux_err[i]);
                out.quality.push(self.quality[i]);
            }
        }
        out
    }
}

/// Parse an observation file into a light curve, dispatching on suffix.
///
/// Recognized encodings:
/// - `.txt`, `.noisy`, `.sysnoise`, `.clean` — plain tabular text;
/// - `.parquet` — structured columnar binary with header metadata.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] for any other suffix, and the parser's
/// error for files of a recognized suffix that cannot be read.
pub fn load(path: &Path, task: &Task) -> Result<LightCurve> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let lc = if name.ends_with(".noisy")
        || name.ends_with(".sysnoise")
        || name.ends_with(".txt")
        || name.ends_with(".clean")
    {
        tabular::load(path, task)?
    } else if name.ends_with(".parquet") {
        columnar::load(path)?
    } else {
        return Err(Error::InvalidFormat {
            path: path.to_path_buf(),
        });
    };

    Ok(lc.with_quality_mask(DEFAULT_QUALITY_BITMASK))
}
