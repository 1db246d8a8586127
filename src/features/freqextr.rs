//! Iterative extraction of the dominant periodogram peaks.

use std::collections::BTreeMap;

use super::powerspectrum::PowerSpectrum;

/// Number of peaks extracted per star.
const N_PEAKS: usize = 6;

/// Grid bins masked on each side of an accepted peak, one oversampled
/// resolution element.
const MASK_HALFWIDTH_BINS: usize = 4;

/// Extract the `N_PEAKS` highest peaks from the spectrum.
///
/// Each accepted peak yields a `freq<i>` (microhertz) and an `amp<i>`
/// feature; the neighbourhood of the peak is masked before the next
/// iteration. Peaks that do not exist (flat or exhausted spectrum) are
/// simply absent from the returned map.
#[must_use]
pub fn freqextr(psd: &PowerSpectrum) -> BTreeMap<String, f64> {
    let mut features = BTreeMap::new();
    let mut working: Vec<f64> = psd.power().to_vec();

    for peak in 1..=N_PEAKS {
        let Some((idx, &max_power)) = working
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
        else {
            break;
        };
        if max_power <= 0.0 {
            break;
        }

        features.insert(format!("freq{peak}"), psd.frequency()[idx]);
        features.insert(format!("amp{peak}"), max_power.sqrt());

        let lo = idx.saturating_sub(MASK_HALFWIDTH_BINS);
        let hi = (idx + MASK_HALFWIDTH_BINS + 1).min(working.len());
        for value in &mut working[lo..hi] {
            *value = 0.0;
        }
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lightcurve::{LightCurve, LightCurveMeta};

    fn two_tone_curve() -> LightCurve {
        let n = 400;
        let time: Vec<f64> = (0..n).map(|i| i as f64 * 120.0 / 86_400.0).collect();
        let flux: Vec<f64> = time
            .iter()
            .map(|t| {
                let ts = t * 86_400.0;
                let w = 2.0 * std::f64::consts::PI * 1e-6 * ts;
                (w * 600.0).sin() * 800.0 + (w * 1500.0).sin() * 300.0
            })
            .collect();
        LightCurve::new(time, flux, vec![1.0; n], vec![0; n], LightCurveMeta::default()).unwrap()
    }

    #[test]
    fn test_strongest_peak_comes_first() {
        let psd = PowerSpectrum::of(&two_tone_curve());
        let features = freqextr(&psd);

        let f1 = features["freq1"];
        let f2 = features["freq2"];
        let resolution = 1e6 / (399.0 * 120.0);
        assert!((f1 - 600.0).abs() < resolution, "freq1 = {f1}");
        assert!((f2 - 1500.0).abs() < resolution, "freq2 = {f2}");
        assert!(features["amp1"] > features["amp2"]);
    }

    #[test]
    fn test_empty_spectrum_yields_no_features() {
        let lc = LightCurve::new(
            vec![0.0],
            vec![0.0],
            vec![1.0],
            vec![0],
            LightCurveMeta::default(),
        )
        .unwrap();
        let psd = PowerSpectrum::of(&lc);
        assert!(freqextr(&psd).is_empty());
    }
}
