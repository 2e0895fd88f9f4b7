use std::{collections::BTreeMap, fmt, path::PathBuf, time::Duration};

use trkval_model::SelectionName;

use crate::metrics::SampleOutcome;

/// Why a sample was skipped without running a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The archive sentinel already exists.
    AlreadyValidated,
    /// Discovery found no primary dataset.
    NoDataset,
    /// Discovery found no parent dataset for a non-harvesting sequence.
    NoParentDataset,
}

/// Why a sample failed after its inputs were resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    /// The job runner exited non-zero (`None`: killed by a signal).
    JobExit { code: Option<i32> },
    /// A pipeline step could not be carried out.
    Error(String),
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::JobExit { code: Some(code) } => write!(f, "job exited with code {code}"),
            FailReason::JobExit { code: None } => f.write_str("job terminated by signal"),
            FailReason::Error(reason) => f.write_str(reason),
        }
    }
}

/// Per-sample state: `Pending` moves to exactly one terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleState {
    Pending,
    Skipped(SkipReason),
    Failed(FailReason),
    /// Artifacts copied into the archive directory.
    Archived(PathBuf),
}

impl SampleState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SampleState::Pending)
    }

    /// Metrics classification; `None` while pending.
    pub fn outcome(&self) -> Option<SampleOutcome> {
        match self {
            SampleState::Pending => None,
            SampleState::Skipped(SkipReason::AlreadyValidated) => Some(SampleOutcome::AlreadyValidated),
            SampleState::Skipped(SkipReason::NoDataset) => Some(SampleOutcome::NoDataset),
            SampleState::Skipped(SkipReason::NoParentDataset) => Some(SampleOutcome::NoParentDataset),
            SampleState::Failed(_) => Some(SampleOutcome::Failed),
            SampleState::Archived(_) => Some(SampleOutcome::Archived),
        }
    }
}

/// Result of processing one sample.
#[derive(Debug, Clone)]
pub struct SampleReport {
    pub sample: String,
    pub tag: String,
    pub selection: SelectionName,
    pub state: SampleState,
    pub elapsed: Duration,
}

/// Number of reports per outcome label.
pub fn outcome_counts(reports: &[SampleReport]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for outcome in reports.iter().filter_map(|r| r.state.outcome()) {
        *counts.entry(outcome.as_label()).or_insert(0) += 1;
    }
    counts
}
