mod job;
pub use job::{EventCount, SampleJobSpec};

mod set;
pub use set::SampleSet;
