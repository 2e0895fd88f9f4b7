use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{SelectionName, domain::constants::SENTINEL_FILE};

/// Archive location of one validated sample.
///
/// Layout: `<repository>/<release>/<selection>/<sample>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePath {
    dir: PathBuf,
}

impl ArchivePath {
    pub fn new(
        repository: impl AsRef<Path>,
        release: &str,
        selection: &SelectionName,
        sample: &str,
    ) -> Self {
        let dir = repository
            .as_ref()
            .join(release)
            .join(selection.as_str())
            .join(sample);
        Self { dir }
    }

    /// Directory holding the archived artifacts.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Completion marker inside the archive directory.
    ///
    /// A sample counts as validated solely when this file exists.
    pub fn sentinel(&self) -> PathBuf {
        self.dir.join(SENTINEL_FILE)
    }

    /// Path of the validation histogram file for `sample` inside this directory.
    pub fn histograms(&self, sample: &str) -> PathBuf {
        self.dir.join(format!("val.{sample}.root"))
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir.display())
    }
}
