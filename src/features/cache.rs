//! On-disk feature cache keyed by task priority.
//!
//! One file per task priority holds one serialized feature bundle, written
//! once per run after a successful compute and reused by every classifier
//! variant operating on the same task. Writes go to a temporary sibling
//! and are renamed into place, so readers never observe a torn bundle.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

use super::FeatureBundle;

/// Handle on a feature-cache directory.
#[derive(Debug, Clone)]
pub struct FeatureCache {
    dir: PathBuf,
}

impl FeatureCache {
    /// Open a cache rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the directory does not
    /// exist. Checked once here, never per task.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(Error::InvalidConfiguration(format!(
                "features cache directory does not exist: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// The cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether a bundle is cached for `priority`.
    #[must_use]
    pub fn contains(&self, priority: u64) -> bool {
        self.path_for(priority).exists()
    }

    /// Load the cached bundle for `priority`, if one exists.
    ///
    /// Reads never mutate cache state.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing cache file cannot be read or parsed.
    pub fn load(&self, priority: u64) -> Result<Option<FeatureBundle>> {
        let path = self.path_for(priority);
        if !path.exists() {
            return Ok(None);
        }
        debug!(priority, path = %path.display(), "loading features from cache");
        let reader = BufReader::new(File::open(path)?);
        Ok(Some(serde_json::from_reader(reader)?))
    }

    /// Persist `bundle` under the priority-keyed name.
    ///
    /// The write lands in a temporary sibling first and is renamed into
    /// place, replacing any previous bundle wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle cannot be serialized or written.
    pub fn save(&self, priority: u64, bundle: &FeatureBundle) -> Result<()> {
        let path = self.path_for(priority);
        let tmp = path.with_extension("json.tmp");

        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut writer, bundle)?;
        writer.flush()?;
        std::fs::rename(&tmp, &path)?;

        debug!(priority, path = %path.display(), "saved features to cache");
        Ok(())
    }

    fn path_for(&self, priority: u64) -> PathBuf {
        self.dir.join(format!("features-{priority}.json"))
    }
}
