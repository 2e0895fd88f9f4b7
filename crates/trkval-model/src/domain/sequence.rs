use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::ModelError;

/// Processing sequence requested from the job template.
///
/// Rendered into the `SEQUENCE` template token with its canonical spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sequence {
    /// Run validation on existing reconstruction.
    OnlyValidation,
    /// Rerun tracking, then validate.
    ReTracking,
    /// Run from digis through tracking, then validate.
    Digi2Track,
    /// Like `OnlyValidation`, also producing tracking particles.
    OnlyValidationAndTp,
    /// Like `ReTracking`, also producing tracking particles.
    ReTrackingAndTp,
    /// Like `Digi2Track`, also producing tracking particles.
    Digi2TrackAndTp,
    /// Aggregate previously produced monitoring histograms.
    Harvesting,
}

impl Sequence {
    /// Canonical spelling used in templates and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sequence::OnlyValidation => "only_validation",
            Sequence::ReTracking => "re_tracking",
            Sequence::Digi2Track => "digi2track",
            Sequence::OnlyValidationAndTp => "only_validation_and_TP",
            Sequence::ReTrackingAndTp => "re_tracking_and_TP",
            Sequence::Digi2TrackAndTp => "digi2track_and_TP",
            Sequence::Harvesting => "harvesting",
        }
    }

    /// Harvesting is terminal: it reads no parent dataset and renames the DQM output.
    #[inline]
    pub fn is_harvesting(&self) -> bool {
        matches!(self, Sequence::Harvesting)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::Harvesting
    }
}

impl FromStr for Sequence {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "only_validation" => Ok(Self::OnlyValidation),
            "re_tracking" => Ok(Self::ReTracking),
            "digi2track" => Ok(Self::Digi2Track),
            "only_validation_and_tp" => Ok(Self::OnlyValidationAndTp),
            "re_tracking_and_tp" => Ok(Self::ReTrackingAndTp),
            "digi2track_and_tp" => Ok(Self::Digi2TrackAndTp),
            "harvesting" => Ok(Self::Harvesting),
            _ => Err(ModelError::UnknownSequence(s.to_string())),
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Sequence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
