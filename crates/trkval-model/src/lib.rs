mod domain;
pub use domain::{ArchivePath, SelectionName, Sequence};
pub use domain::{DEFAULT_TRACKS, NO_PILEUP_SUFFIX, OOTB_SUFFIX, SENTINEL_FILE};

mod error;
pub use error::{ModelError, ModelResult};

mod spec;
pub use spec::{EventCount, SampleJobSpec, SampleSet};

mod config;
pub use config::{DriverConfig, ToolsConfig};

pub mod binding;
