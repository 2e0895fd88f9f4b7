use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::constants::{NO_PILEUP_SUFFIX, OOTB_SUFFIX};

/// Name grouping validation results by tag, track quality and track algorithm.
///
/// Used both as a directory component of an [`crate::ArchivePath`] and as the lookup key
/// into the reference archive. Derivation is a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionName(String);

impl SelectionName {
    /// Derive the selection name for a new validation pass.
    ///
    /// Layout: `<tag>_noPU[_<quality>][_<algorithm>]<fallback><label>` where the fallback
    /// only applies when both filters are empty: `_ootb` for the default track collection,
    /// `_<tracks>` when a custom collection is configured.
    pub fn derive(tag: &str, quality: &str, algorithm: &str, tracks: &str, label: &str) -> Self {
        let mut name = format!("{tag}{NO_PILEUP_SUFFIX}");
        push_filters(&mut name, quality, algorithm);
        if quality.is_empty() && algorithm.is_empty() {
            if tracks.is_empty() {
                name.push_str(OOTB_SUFFIX);
            } else {
                name.push('_');
                name.push_str(tracks);
            }
        }
        name.push_str(label);
        Self(name)
    }

    /// Derive the reference selection from a configured base (e.g. `IDEAL_30X_noPU`).
    ///
    /// Reference selections never carry a user label or a custom collection segment.
    pub fn reference(base: &str, quality: &str, algorithm: &str) -> Self {
        let mut name = base.to_string();
        push_filters(&mut name, quality, algorithm);
        if quality.is_empty() && algorithm.is_empty() {
            name.push_str(OOTB_SUFFIX);
        }
        Self(name)
    }

    /// Returns the name as `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn push_filters(name: &mut String, quality: &str, algorithm: &str) {
    if !quality.is_empty() {
        name.push('_');
        name.push_str(quality);
    }
    if !algorithm.is_empty() {
        name.push('_');
        name.push_str(algorithm);
    }
}

impl fmt::Display for SelectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SelectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
