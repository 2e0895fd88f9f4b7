mod constants;
pub use constants::{DEFAULT_TRACKS, NO_PILEUP_SUFFIX, OOTB_SUFFIX, SENTINEL_FILE};

mod selection;
pub use selection::SelectionName;

mod sequence;
pub use sequence::Sequence;

mod archive;
pub use archive::ArchivePath;

