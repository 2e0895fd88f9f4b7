//! Naming conventions shared by the selection, archive and job layers.

/// Suffix appended to every global tag when building a selection name.
pub const NO_PILEUP_SUFFIX: &str = "_noPU";

/// Segment used when neither a quality nor an algorithm filter is requested.
pub const OOTB_SUFFIX: &str = "_ootb";

/// Track collection rendered into job templates when no override is configured.
pub const DEFAULT_TRACKS: &str = "cutsRecoTracks";

/// File whose presence in an archive directory marks the sample as validated.
pub const SENTINEL_FILE: &str = "building.pdf";
