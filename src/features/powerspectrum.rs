//! Least-squares periodogram of an unevenly sampled light curve.
//!
//! The spectrum is a pure, deterministic function of the input curve:
//! multiple classifier variants rely on cache hits reproducing identical
//! downstream behaviour, so nothing here may depend on ambient state.

use serde::{Deserialize, Serialize};

use crate::lightcurve::LightCurve;

/// Frequency oversampling factor relative to the natural resolution 1/T.
const OVERSAMPLING: usize = 4;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Power spectrum over a linear frequency grid.
///
/// Frequencies are in microhertz, powers in squared flux units
/// (amplitude-squared normalization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerSpectrum {
    frequency: Vec<f64>,
    power: Vec<f64>,
}

impl PowerSpectrum {
    /// Compute the periodogram of a cleaned light curve.
    ///
    /// The grid runs from one oversampled frequency step up to the
    /// approximate Nyquist limit `n / (2 T)`. Curves with fewer than two
    /// cadences or a degenerate time span yield an empty spectrum.
    #[must_use]
    pub fn of(lightcurve: &LightCurve) -> Self {
        let n = lightcurve.len();
        if n < 2 {
            return Self {
                frequency: Vec::new(),
                power: Vec::new(),
            };
        }

        let t0 = lightcurve.time()[0];
        let times: Vec<f64> = lightcurve
            .time()
            .iter()
            .map(|t| (t - t0) * SECONDS_PER_DAY)
            .collect();
        let span = times[n - 1];
        if span <= 0.0 {
            return Self {
                frequency: Vec::new(),
                power: Vec::new(),
            };
        }

        let df = 1.0 / (OVERSAMPLING as f64 * span);
        let nyquist = n as f64 / (2.0 * span);
        let bins = (nyquist / df).floor() as usize;

        let flux = lightcurve.flux();
        let scale = 2.0 / n as f64;

        let mut frequency = Vec::with_capacity(bins);
        let mut power = Vec::with_capacity(bins);
        for k in 1..=bins {
            let f = k as f64 * df;
            let omega = 2.0 * std::f64::consts::PI * f;
            let mut c = 0.0;
            let mut s = 0.0;
            for (&t, &y) in times.iter().zip(flux) {
                let phase = omega * t;
                c += y * phase.cos();
                s += y * phase.sin();
            }
            let amplitude = scale * (c * c + s * s).sqrt();
            frequency.push(f * 1e6);
            power.push(amplitude * amplitude);
        }

        Self { frequency, power }
    }

    /// Frequency grid, microhertz.
    #[must_use]
    pub fn frequency(&self) -> &[f64] {
        &self.frequency
    }

    /// Power at each grid frequency.
    #[must_use]
    pub fn power(&self) -> &[f64] {
        &self.power
    }

    /// Number of grid bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    /// Whether the spectrum is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Mean power over bins at or above `cutoff` microhertz.
    ///
    /// Returns `None` when no bins lie above the cutoff.
    #[must_use]
    pub fn mean_power_above(&self, cutoff: f64) -> Option<f64> {
        let mut total = 0.0;
        let mut count = 0usize;
        for (f, p) in self.frequency.iter().zip(&self.power) {
            if *f >= cutoff {
                total += p;
                count += 1;
            }
        }
        (count > 0).then(|| total / count as f64)
    }
}
