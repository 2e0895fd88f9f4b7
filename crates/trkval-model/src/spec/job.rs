use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_TRACKS, Sequence};

/// Number of events a job processes; `-1` means all events in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCount(i64);

impl EventCount {
    pub const ALL: EventCount = EventCount(-1);

    pub const fn new(n: i64) -> Self {
        Self(n)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    pub const fn is_all(&self) -> bool {
        self.0 < 0
    }
}

impl Default for EventCount {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for EventCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EventCount {
    fn from(n: i64) -> Self {
        Self(n)
    }
}

/// Everything a single job needs, resolved for one sample in one loop iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleJobSpec {
    /// Relval sample name.
    pub sample: String,
    /// Global tag of the pass.
    pub tag: String,
    /// Events to process.
    pub events: EventCount,
    /// Track quality filter, empty for none.
    pub quality: String,
    /// Track algorithm filter, empty for none.
    pub algorithm: String,
    /// Track collection rendered into the `TRACKS` token.
    pub tracks: String,
    /// Processing sequence.
    pub sequence: Sequence,
}

impl SampleJobSpec {
    /// Build a spec, falling back to [`DEFAULT_TRACKS`] when `tracks` is empty.
    pub fn new(
        sample: impl Into<String>,
        tag: impl Into<String>,
        events: EventCount,
        quality: impl Into<String>,
        algorithm: impl Into<String>,
        tracks: &str,
        sequence: Sequence,
    ) -> Self {
        let tracks = if tracks.is_empty() {
            DEFAULT_TRACKS.to_string()
        } else {
            tracks.to_string()
        };
        Self {
            sample: sample.into(),
            tag: tag.into(),
            events,
            quality: quality.into(),
            algorithm: algorithm.into(),
            tracks,
            sequence,
        }
    }

    /// Base name for every generated per-sample file (`<sample>.py`, `<sample>.log`, ...).
    pub fn file_stem(&self) -> &str {
        &self.sample
    }

    /// File name of the histograms produced by the job.
    pub fn histogram_file(&self) -> String {
        format!("val.{}.root", self.sample)
    }

    /// DQM output written by a harvesting job before it is renamed.
    pub fn harvest_output(&self) -> String {
        format!(
            "DQM_V0001_R000000001__{}__{}__Validation.root",
            self.tag, self.sample
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(tracks: &str) -> SampleJobSpec {
        SampleJobSpec::new(
            "RelValTTbar",
            "IDEAL_30X",
            EventCount::new(5000),
            "",
            "",
            tracks,
            Sequence::Harvesting,
        )
    }

    #[test]
    fn tracks_default_when_unset() {
        assert_eq!(spec("").tracks, "cutsRecoTracks");
        assert_eq!(spec("generalTracks").tracks, "generalTracks");
    }

    #[test]
    fn derived_file_names() {
        let s = spec("");
        assert_eq!(s.file_stem(), "RelValTTbar");
        assert_eq!(s.histogram_file(), "val.RelValTTbar.root");
        assert_eq!(
            s.harvest_output(),
            "DQM_V0001_R000000001__IDEAL_30X__RelValTTbar__Validation.root"
        );
    }

    #[test]
    fn event_count_defaults_to_all() {
        assert!(EventCount::default().is_all());
        assert_eq!(EventCount::default().to_string(), "-1");
        assert!(!EventCount::new(5000).is_all());
    }

    #[test]
    fn event_count_is_a_bare_number_in_json() {
        let json = serde_json::to_string(&EventCount::new(5000)).unwrap();
        assert_eq!(json, "5000");
    }
}
