use std::fmt;

use crate::{DriverConfig, SelectionName};

/// Sample list paired with its global tag and reference base.
///
/// Every sweep iteration visits `Ideal` first, then `Startup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSet {
    Ideal,
    Startup,
}

impl SampleSet {
    pub const ALL: [SampleSet; 2] = [SampleSet::Ideal, SampleSet::Startup];

    pub fn samples<'a>(&self, cfg: &'a DriverConfig) -> &'a [String] {
        match self {
            SampleSet::Ideal => &cfg.ideal_samples,
            SampleSet::Startup => &cfg.startup_samples,
        }
    }

    pub fn tag<'a>(&self, cfg: &'a DriverConfig) -> &'a str {
        match self {
            SampleSet::Ideal => &cfg.ideal_tag,
            SampleSet::Startup => &cfg.startup_tag,
        }
    }

    /// Reference selection compared against for the given filters.
    pub fn reference_selection(
        &self,
        cfg: &DriverConfig,
        quality: &str,
        algorithm: &str,
    ) -> SelectionName {
        let base = match self {
            SampleSet::Ideal => &cfg.reference_selection,
            SampleSet::Startup => &cfg.startup_reference_selection,
        };
        SelectionName::reference(base, quality, algorithm)
    }
}

impl fmt::Display for SampleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SampleSet::Ideal => "ideal",
            SampleSet::Startup => "startup",
        })
    }
}
