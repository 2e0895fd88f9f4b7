//! Immutable driver configuration.
//!
//! Loaded once at startup and passed explicitly into the driver. Every field has a
//! default so a partial JSON document is enough to override a handful of values.
use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{EventCount, ModelError, ModelResult, Sequence};

const DEFAULT_REPOSITORY: &str =
    "/afs/cern.ch/cms/performance/tracker/activities/reconstruction/tracking_performance";

/// External tools invoked by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Dataset discovery CLI.
    pub discovery: PathBuf,
    /// Where the discovery CLI is fetched from when missing.
    pub discovery_url: String,
    /// Downloader invoked as `<fetcher> --no-check-certificate <url> -O <path>`.
    pub fetcher: String,
    /// Job runner executable.
    pub runner: String,
    /// Macro interpreter used for plotting.
    pub plotter: String,
    /// Optional wall-clock limit applied to every external invocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            discovery: PathBuf::from("./DDSearchCLI.py"),
            discovery_url: "https://cmsweb.cern.ch/dbs_discovery/aSearchCLI".to_string(),
            fetcher: "wget".to_string(),
            runner: "cmsRun".to_string(),
            plotter: "root".to_string(),
            timeout_secs: None,
        }
    }
}

/// Full configuration of a validation sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Release the new results are compared against.
    pub ref_release: String,
    /// Samples processed with the ideal tag.
    pub ideal_samples: Vec<String>,
    /// Samples processed with the startup tag.
    pub startup_samples: Vec<String>,
    /// Track algorithm filters; `""` means no filter.
    pub algorithms: Vec<String>,
    /// Track quality filters; `""` means no filter.
    pub qualities: Vec<String>,
    /// Track collection override; `""` keeps the default collection.
    pub tracks_name: String,
    pub sequence: Sequence,
    pub ideal_tag: String,
    pub startup_tag: String,
    /// Reference selection base for ideal samples.
    pub reference_selection: String,
    /// Reference selection base for startup samples.
    pub startup_reference_selection: String,
    /// Extra suffix appended to new selection names.
    pub selection_label: String,
    pub ref_repository: PathBuf,
    pub new_repository: PathBuf,
    pub default_events: EventCount,
    /// Per-sample event count overrides.
    pub events: BTreeMap<String, EventCount>,
    /// Job configuration template.
    pub cfg_template: PathBuf,
    /// Plotting macro template.
    pub macro_template: PathBuf,
    /// Directory where generated files, logs and plots are produced.
    pub work_dir: PathBuf,
    pub tools: ToolsConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let events = [
            "RelValQCD_Pt_3000_3500",
            "RelValTTbar",
            "RelValQCD_Pt_80_120",
            "RelValBJets_Pt_50_120",
        ]
        .into_iter()
        .map(|s| (s.to_string(), EventCount::new(5000)))
        .collect();

        Self {
            ref_release: "CMSSW_3_0_0_pre6".to_string(),
            ideal_samples: strings(&[
                "RelValSingleMuPt1",
                "RelValSingleMuPt10",
                "RelValSingleMuPt100",
                "RelValSinglePiPt1",
                "RelValSinglePiPt10",
                "RelValSinglePiPt100",
                "RelValSingleElectronPt35",
                "RelValTTbar",
                "RelValQCD_Pt_3000_3500",
                "RelValMinBias",
            ]),
            startup_samples: strings(&["RelValTTbar", "RelValMinBias", "RelValQCD_Pt_3000_3500"]),
            algorithms: strings(&[""]),
            qualities: strings(&[""]),
            tracks_name: String::new(),
            sequence: Sequence::default(),
            ideal_tag: "IDEAL_30X".to_string(),
            startup_tag: "STARTUP_30X".to_string(),
            reference_selection: "IDEAL_30X_noPU".to_string(),
            startup_reference_selection: "STARTUP_30X_noPU".to_string(),
            selection_label: String::new(),
            ref_repository: PathBuf::from(DEFAULT_REPOSITORY),
            new_repository: PathBuf::from(DEFAULT_REPOSITORY),
            default_events: EventCount::ALL,
            events,
            cfg_template: PathBuf::from("trackingPerformanceValidation_cfg.py"),
            macro_template: PathBuf::from("macro/TrackValHistoPublisher.C"),
            work_dir: PathBuf::from("."),
            tools: ToolsConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(s: &str) -> ModelResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Event count for a sample, honouring per-sample overrides.
    pub fn events_for(&self, sample: &str) -> EventCount {
        self.events
            .get(sample)
            .copied()
            .unwrap_or(self.default_events)
    }

    /// Validate the configuration.
    ///
    /// Rules:
    /// - tags and reference bases are not empty;
    /// - algorithm and quality lists hold at least one entry (`""` is a valid entry);
    /// - tool commands and repository roots are not empty.
    pub fn validate(&self) -> ModelResult<()> {
        let required = [
            ("ideal_tag", self.ideal_tag.as_str()),
            ("startup_tag", self.startup_tag.as_str()),
            ("ref_release", self.ref_release.as_str()),
            ("reference_selection", self.reference_selection.as_str()),
            (
                "startup_reference_selection",
                self.startup_reference_selection.as_str(),
            ),
            ("tools.runner", self.tools.runner.as_str()),
            ("tools.plotter", self.tools.plotter.as_str()),
            ("tools.fetcher", self.tools.fetcher.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ModelError::InvalidConfig(format!("{field} cannot be empty")));
            }
        }
        if self.algorithms.is_empty() {
            return Err(ModelError::InvalidConfig(
                "algorithms must hold at least one entry".into(),
            ));
        }
        if self.qualities.is_empty() {
            return Err(ModelError::InvalidConfig(
                "qualities must hold at least one entry".into(),
            ));
        }
        let paths = [
            ("tools.discovery", &self.tools.discovery),
            ("ref_repository", &self.ref_repository),
            ("new_repository", &self.new_repository),
        ];
        for (field, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ModelError::InvalidConfig(format!("{field} cannot be empty")));
            }
        }
        if self.tools.timeout_secs == Some(0) {
            return Err(ModelError::InvalidConfig(
                "tools.timeout_secs cannot be zero".into(),
            ));
        }
        Ok(())
    }
}
