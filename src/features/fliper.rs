//! FliPer features: mean spectral power above fixed frequency cutoffs.

use std::collections::BTreeMap;

use super::powerspectrum::PowerSpectrum;

/// Feature name and cutoff frequency (microhertz) per band.
const BANDS: [(&str, f64); 4] = [
    ("Fp07", 0.7),
    ("Fp7", 7.0),
    ("Fp20", 20.0),
    ("Fp50", 50.0),
];

/// Compute the FliPer band powers of a spectrum.
///
/// Bands with no grid bins above their cutoff are absent from the map.
#[must_use]
pub fn fliper(psd: &PowerSpectrum) -> BTreeMap<String, f64> {
    let mut features = BTreeMap::new();
    for (name, cutoff) in BANDS {
        if let Some(mean_power) = psd.mean_power_above(cutoff) {
            features.insert(name.to_string(), mean_power);
        }
    }
    features
}
