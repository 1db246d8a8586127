//! Tests for the feature loader and its priority-keyed cache.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use starclass::{
    ClassTag, Classification, Classifier, ClassifierConfig, ClassifierKey, Error, FeatureBundle,
    FeatureCache, StarClassifier, Task,
};
use tempfile::TempDir;

struct NamedStub(ClassifierKey);

impl Classifier for NamedStub {
    fn key(&self) -> ClassifierKey {
        self.0
    }

    fn classify(&self, _features: &FeatureBundle) -> starclass::Result<Classification> {
        let mut result = Classification::new();
        result.insert(ClassTag::Constant, 1.0);
        Ok(result)
    }
}

/// Write a noisy sinusoid in the plain tabular encoding.
fn write_lightcurve(dir: &Path) -> PathBuf {
    let mut rng = StdRng::seed_from_u64(42);
    let path = dir.join("star.txt");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "# time flux flux_err").unwrap();
    for i in 0..120 {
        let t = f64::from(i) * 120.0 / 86_400.0;
        let flux = (2.0 * std::f64::consts::PI * 300.0 * 1e-6 * t * 86_400.0).sin() * 400.0
            + rng.gen_range(-5.0..5.0);
        writeln!(file, "{t:.8} {flux:.6} 1.0").unwrap();
    }
    path
}

fn classifier_with_cache(
    key: ClassifierKey,
    data_dir: &TempDir,
    cache_dir: &TempDir,
) -> StarClassifier {
    let config = ClassifierConfig::builder()
        .data_root(data_dir.path())
        .features_cache(cache_dir.path())
        .build();
    StarClassifier::new(Box::new(NamedStub(key)), &config).unwrap()
}

#[test]
fn compute_then_cache_then_reuse() {
    let data_dir = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();
    let lc_dir = tempfile::tempdir().unwrap();
    let lc_path = write_lightcurve(lc_dir.path());
    let task = Task::new(11, 12345, &lc_path);

    let first = classifier_with_cache(ClassifierKey::Xgb, &data_dir, &cache_dir);
    let bundle = first.load_star(&task, &lc_path).unwrap();
    assert_eq!(bundle.priority(), Some(11));
    assert!(bundle.value("freq1").is_some());

    let cache_file = cache_dir.path().join("features-11.json");
    assert!(cache_file.exists());

    // A different variant operating on the same task reuses the bundle.
    let second = classifier_with_cache(ClassifierKey::Rfgc, &data_dir, &cache_dir);
    let reused = second.load_star(&task, &lc_path).unwrap();
    assert_eq!(reused, bundle);
}

#[test]
fn cache_hit_skips_recomputation() {
    let data_dir = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();
    let lc_dir = tempfile::tempdir().unwrap();
    let lc_path = write_lightcurve(lc_dir.path());
    let task = Task::new(7, 99, &lc_path);

    // Seed the cache with a marker bundle no computation would produce.
    let cache = FeatureCache::open(cache_dir.path()).unwrap();
    let mut marker = FeatureBundle::new();
    marker.set_value("freq1", 987_654.0);
    cache.save(7, &marker).unwrap();
    let before = fs::read_to_string(cache_dir.path().join("features-7.json")).unwrap();

    let classifier = classifier_with_cache(ClassifierKey::Xgb, &data_dir, &cache_dir);
    let bundle = classifier.load_star(&task, &lc_path).unwrap();

    // The marker came back, so nothing was recomputed...
    assert_eq!(bundle.value("freq1"), Some(987_654.0));
    // ...and the cache file was not rewritten.
    let after = fs::read_to_string(cache_dir.path().join("features-7.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn caching_disabled_still_computes() {
    let data_dir = tempfile::tempdir().unwrap();
    let lc_dir = tempfile::tempdir().unwrap();
    let lc_path = write_lightcurve(lc_dir.path());
    let task = Task::new(3, 5, &lc_path);

    let config = ClassifierConfig::builder().data_root(data_dir.path()).build();
    let classifier = StarClassifier::new(Box::new(NamedStub(ClassifierKey::Xgb)), &config).unwrap();

    let bundle = classifier.load_star(&task, &lc_path).unwrap();
    assert!(bundle.value("freq1").is_some());
}

#[test]
fn meta_variant_skips_lightcurve_and_cache() {
    let data_dir = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();

    // No observation file exists; the meta variant must not care.
    let mut task = Task::new(21, 404, "/nonexistent/star.txt");
    task.tmag = Some(10.3);
    task.variance = Some(2.5);

    let classifier = classifier_with_cache(ClassifierKey::Meta, &data_dir, &cache_dir);
    let bundle = classifier
        .load_star(&task, Path::new("/nonexistent/star.txt"))
        .unwrap();

    assert_eq!(bundle.priority(), Some(21));
    assert_eq!(bundle.starid(), Some(404));
    assert_eq!(bundle.value("tmag"), Some(10.3));
    assert_eq!(bundle.value("variance"), Some(2.5));
    assert!(bundle.lightcurve().is_none());
    assert!(bundle.power_spectrum().is_none());

    // Nothing was written to the shared cache.
    assert!(!cache_dir.path().join("features-21.json").exists());
}

#[test]
fn unrecognized_suffix_is_invalid_format() {
    let data_dir = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();
    let task = Task::new(1, 1, "star.fits");

    let classifier = classifier_with_cache(ClassifierKey::Xgb, &data_dir, &cache_dir);
    let err = classifier.load_star(&task, Path::new("star.fits")).unwrap_err();
    assert!(matches!(err, Error::InvalidFormat { .. }));
}

#[test]
fn missing_cache_directory_fails_at_construction() {
    let data_dir = tempfile::tempdir().unwrap();
    let config = ClassifierConfig::builder()
        .data_root(data_dir.path())
        .features_cache("/nonexistent/cache")
        .build();
    let err = StarClassifier::new(Box::new(NamedStub(ClassifierKey::Xgb)), &config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
}

#[test]
fn bundle_round_trip_preserves_contents() {
    let cache_dir = tempfile::tempdir().unwrap();
    let lc_dir = tempfile::tempdir().unwrap();
    let lc_path = write_lightcurve(lc_dir.path());

    let mut task = Task::new(55, 1000, &lc_path);
    task.rms_hour = Some(0.004);

    let lc = starclass::lightcurve::load(&lc_path, &task).unwrap();
    let mut bundle = starclass::compute_features(&lc).unwrap();
    bundle.attach_task(&task);

    let cache = FeatureCache::open(cache_dir.path()).unwrap();
    cache.save(55, &bundle).unwrap();
    let loaded = cache.load(55).unwrap().unwrap();
    assert_eq!(loaded, bundle);

    // Saving the loaded bundle again reproduces it exactly.
    cache.save(55, &loaded).unwrap();
    assert_eq!(cache.load(55).unwrap().unwrap(), bundle);
}
