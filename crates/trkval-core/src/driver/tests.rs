use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tempfile::TempDir;
use trkval_model::{DriverConfig, SelectionName, Sequence};

use super::*;
use crate::{
    metrics::{MetricsBackend, SampleOutcome},
    tools::{DiscoveryClient, JobRunner, PlotRenderer, ToolError, ToolStatus},
};

const RELEASE: &str = "CMSSW_3_1_0_pre1";

const CFG_TEMPLATE: &str = "\
process.maxEvents = NEVENT
globaltag = 'GLOBALTAG::All'
sequence = 'SEQUENCE'
out = 'val.SAMPLE.root'
algo = ['ALGORITHM']
quality = ['QUALITY']
tracks = 'TRACKS'
";

const MACRO_TEMPLATE: &str = "\
void TrackValHistoPublisher(){
  ref = \"REF_FILE\"; cur = \"NEW_FILE\";
  refrel = \"REF_RELEASE\"; newrel = \"NEW_RELEASE\";
  refsel = \"REFSELECTION\"; newsel = \"NEWSELECTION\";
  labels = \"REF_LABEL NEW_LABEL\";
}
";

#[derive(Default)]
struct FakeDiscovery {
    datasets: HashMap<String, String>,
    parents: HashMap<String, String>,
    files: HashMap<String, Vec<String>>,
    unreachable: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeDiscovery {
    fn with_sample(mut self, sample: &str) -> Self {
        let dataset = format!("/{sample}/{RELEASE}_IDEAL_30X_v1/GEN-SIM-RECO");
        self.files
            .insert(dataset.clone(), vec![format!("'/store/relval/{sample}/reco.root',")]);
        self.datasets.insert(sample.to_string(), dataset);
        self
    }

    fn with_parent(mut self, sample: &str) -> Self {
        let dataset = self.datasets[sample].clone();
        let parent = format!("/{sample}/{RELEASE}_IDEAL_30X_v1/GEN-SIM-DIGI-RAW");
        self.files
            .insert(parent.clone(), vec![format!("'/store/relval/{sample}/raw.root',")]);
        self.parents.insert(dataset, parent);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiscoveryClient for FakeDiscovery {
    async fn find_dataset(
        &self,
        sample: &str,
        release: &str,
        tag: &str,
    ) -> Result<Option<String>, ToolError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("dataset {sample} {release} {tag}"));
        if self.unreachable {
            return Err(ToolError::Spawn {
                tool: "discovery",
                reason: "not found".into(),
            });
        }
        Ok(self.datasets.get(sample).cloned())
    }

    async fn list_files(&self, dataset: &str, _sample: &str) -> Result<Vec<String>, ToolError> {
        self.calls.lock().unwrap().push(format!("files {dataset}"));
        Ok(self.files.get(dataset).cloned().unwrap_or_default())
    }

    async fn find_parent(&self, dataset: &str, _sample: &str) -> Result<Option<String>, ToolError> {
        self.calls.lock().unwrap().push(format!("parent {dataset}"));
        Ok(self.parents.get(dataset).cloned())
    }
}

/// Job runner that produces the files a real job would leave in the working directory.
struct FakeJobs {
    exit_code: i32,
    harvesting: bool,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeJobs {
    fn new(exit_code: i32, harvesting: bool) -> Self {
        Self {
            exit_code,
            harvesting,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRunner for FakeJobs {
    async fn run(&self, config: &Path, log: &Path) -> Result<ToolStatus, ToolError> {
        self.calls.lock().unwrap().push(config.to_path_buf());
        std::fs::write(log, "job log\n")?;
        if self.exit_code == 0 {
            let dir = config.parent().unwrap();
            let sample = config.file_stem().unwrap().to_str().unwrap();
            let text = std::fs::read_to_string(config)?;
            let tag = if text.contains("STARTUP_30X") { "STARTUP_30X" } else { "IDEAL_30X" };
            let name = if self.harvesting {
                format!("DQM_V0001_R000000001__{tag}__{sample}__Validation.root")
            } else {
                format!("val.{sample}.root")
            };
            std::fs::write(dir.join(name), "histograms")?;
        }
        Ok(ToolStatus::new(Some(self.exit_code)))
    }
}

struct FakePlots {
    exit_code: i32,
    /// Sample whose macro exits 1 without rendering anything.
    broken: Mutex<Option<String>>,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakePlots {
    fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            broken: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn break_sample(&self, sample: &str) {
        *self.broken.lock().unwrap() = Some(sample.to_string());
    }

    fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlotRenderer for FakePlots {
    async fn render(&self, macro_file: &Path, log: &Path) -> Result<ToolStatus, ToolError> {
        self.calls.lock().unwrap().push(macro_file.to_path_buf());
        let dir = macro_file.parent().unwrap();
        std::fs::write(log, "plot log\n")?;
        let sample = macro_file.file_stem().unwrap().to_str().unwrap();
        if self.broken.lock().unwrap().as_deref() == Some(sample) {
            return Ok(ToolStatus::new(Some(1)));
        }
        std::fs::write(dir.join("building.pdf"), format!("%PDF {sample}"))?;
        std::fs::write(dir.join("hitsAndPt.pdf"), "%PDF")?;
        Ok(ToolStatus::new(Some(self.exit_code)))
    }
}

#[derive(Default)]
struct CountingMetrics {
    started: Mutex<Vec<String>>,
    completed: Mutex<Vec<(String, SampleOutcome)>>,
    tool_errors: Mutex<Vec<(String, String)>>,
}

impl MetricsBackend for CountingMetrics {
    fn record_sample_started(&self, tag: &str) {
        self.started.lock().unwrap().push(tag.to_string());
    }

    fn record_sample_completed(&self, tag: &str, outcome: SampleOutcome, _: u64) {
        self.completed
            .lock()
            .unwrap()
            .push((tag.to_string(), outcome));
    }

    fn record_tool_error(&self, tool: &str, error_kind: &str) {
        self.tool_errors
            .lock()
            .unwrap()
            .push((tool.to_string(), error_kind.to_string()));
    }
}

struct Harness {
    root: TempDir,
    discovery: Arc<FakeDiscovery>,
    jobs: Arc<FakeJobs>,
    plots: Arc<FakePlots>,
    metrics: Arc<CountingMetrics>,
    driver: ValidationDriver,
}

impl Harness {
    fn new(sequence: Sequence, discovery: FakeDiscovery, job_exit: i32) -> Self {
        Self::with_config(sequence, discovery, job_exit, 0, |_| {})
    }

    fn with_config(
        sequence: Sequence,
        discovery: FakeDiscovery,
        job_exit: i32,
        plot_exit: i32,
        tweak: impl FnOnce(&mut DriverConfig),
    ) -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let templates = root.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(templates.join("cfg.py"), CFG_TEMPLATE).unwrap();
        std::fs::write(templates.join("macro.C"), MACRO_TEMPLATE).unwrap();

        let mut cfg = DriverConfig {
            sequence,
            ideal_samples: vec!["RelValTTbar".into()],
            startup_samples: vec!["RelValMinBias".into()],
            ref_repository: root.path().join("ref"),
            new_repository: root.path().join("new"),
            cfg_template: templates.join("cfg.py"),
            macro_template: templates.join("macro.C"),
            work_dir: root.path().join("work"),
            ..DriverConfig::default()
        };
        tweak(&mut cfg);

        let discovery = Arc::new(discovery);
        let jobs = Arc::new(FakeJobs::new(job_exit, sequence.is_harvesting()));
        let plots = Arc::new(FakePlots::new(plot_exit));
        let metrics = Arc::new(CountingMetrics::default());
        let ctx = DriverContext::new(discovery.clone(), jobs.clone(), plots.clone())
            .with_metrics(metrics.clone());

        Self {
            root,
            discovery,
            jobs,
            plots,
            metrics,
            driver: ValidationDriver::new(cfg, RELEASE, ctx),
        }
    }

    fn work(&self, file: &str) -> PathBuf {
        self.root.path().join("work").join(file)
    }

    async fn run_ideal(&self, samples: &[&str], quality: &str) -> Vec<SampleReport> {
        let samples: Vec<String> = samples.iter().map(|s| s.to_string()).collect();
        let reference = SelectionName::reference("IDEAL_30X_noPU", quality, "");
        self.driver
            .run_validation(&samples, "IDEAL_30X", quality, "", &reference)
            .await
    }
}

#[tokio::test]
async fn harvesting_sample_is_archived() {
    let h = Harness::new(
        Sequence::Harvesting,
        FakeDiscovery::default().with_sample("RelValTTbar"),
        0,
    );
    let reports = h.run_ideal(&["RelValTTbar"], "").await;

    let archive = h
        .root
        .path()
        .join("new")
        .join(RELEASE)
        .join("IDEAL_30X_noPU_ootb")
        .join("RelValTTbar");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].selection.as_str(), "IDEAL_30X_noPU_ootb");
    assert_eq!(reports[0].state, SampleState::Archived(archive.clone()));

    for file in ["building.pdf", "hitsAndPt.pdf", "val.RelValTTbar.root", "RelValTTbar.py"] {
        assert!(archive.join(file).is_file(), "{file} must be archived");
    }

    // Harvest output renamed to the sample-specific name.
    assert!(h.work("val.RelValTTbar.root").is_file());
    assert!(
        !h.work("DQM_V0001_R000000001__IDEAL_30X__RelValTTbar__Validation.root")
            .exists()
    );

    let cfg = std::fs::read_to_string(h.work("RelValTTbar.py")).unwrap();
    assert!(cfg.starts_with("import FWCore.ParameterSet.Config as cms\n"));
    assert!(cfg.contains("readFiles.extend( [\n'/store/relval/RelValTTbar/reco.root',\n]);\n"));
    assert!(cfg.contains("secFiles.extend( (               ) )"));
    assert!(cfg.contains("process.maxEvents = 5000\n"));
    assert!(cfg.contains("globaltag = 'IDEAL_30X::All'"));
    assert!(cfg.contains("sequence = 'harvesting'"));
    assert!(cfg.contains("tracks = 'cutsRecoTracks'"));

    assert_eq!(h.plots.calls(), vec![h.work("RelValTTbar.C")]);
    assert_eq!(
        h.metrics.completed.lock().unwrap().as_slice(),
        [("IDEAL_30X".to_string(), SampleOutcome::Archived)]
    );
}

#[tokio::test]
async fn validated_sample_makes_no_external_calls() {
    let h = Harness::new(
        Sequence::Harvesting,
        FakeDiscovery::default().with_sample("RelValTTbar"),
        0,
    );
    let selection = h.driver.selection("IDEAL_30X", "", "");
    let archive = h.driver.archive_path(&selection, "RelValTTbar");
    std::fs::create_dir_all(archive.dir()).unwrap();
    std::fs::write(archive.sentinel(), "%PDF").unwrap();

    let reports = h.run_ideal(&["RelValTTbar"], "").await;

    assert_eq!(
        reports[0].state,
        SampleState::Skipped(SkipReason::AlreadyValidated)
    );
    assert!(h.discovery.calls().is_empty());
    assert!(h.jobs.calls().is_empty());
    assert!(h.plots.calls().is_empty());

    // Idempotent on a second run.
    let again = h.run_ideal(&["RelValTTbar"], "").await;
    assert_eq!(again[0].state, reports[0].state);
    assert!(h.discovery.calls().is_empty());
}

#[tokio::test]
async fn missing_dataset_skips_without_writing_config() {
    let h = Harness::new(Sequence::Harvesting, FakeDiscovery::default(), 0);
    let reports = h.run_ideal(&["RelValSingleMuPt10"], "").await;

    assert_eq!(reports[0].state, SampleState::Skipped(SkipReason::NoDataset));
    assert!(!h.work("RelValSingleMuPt10.py").exists());
    assert!(h.jobs.calls().is_empty());
    assert_eq!(
        h.discovery.calls(),
        [format!("dataset RelValSingleMuPt10 {RELEASE} IDEAL_30X")]
    );
}

#[tokio::test]
async fn missing_parent_skips_non_harvesting_sample() {
    let h = Harness::new(
        Sequence::OnlyValidation,
        FakeDiscovery::default().with_sample("RelValTTbar"),
        0,
    );
    let reports = h.run_ideal(&["RelValTTbar"], "").await;

    assert_eq!(
        reports[0].state,
        SampleState::Skipped(SkipReason::NoParentDataset)
    );
    assert!(!h.work("RelValTTbar.py").exists());
    assert!(h.jobs.calls().is_empty());
}

#[tokio::test]
async fn parent_files_feed_secondary_inputs() {
    let h = Harness::new(
        Sequence::ReTracking,
        FakeDiscovery::default()
            .with_sample("RelValTTbar")
            .with_parent("RelValTTbar"),
        0,
    );
    let reports = h.run_ideal(&["RelValTTbar"], "").await;

    assert!(matches!(reports[0].state, SampleState::Archived(_)));
    let cfg = std::fs::read_to_string(h.work("RelValTTbar.py")).unwrap();
    assert!(cfg.contains("secFiles.extend( [\n'/store/relval/RelValTTbar/raw.root',\n]);\n"));
    assert!(cfg.contains("sequence = 're_tracking'"));
}

#[tokio::test]
async fn failed_job_skips_plotting_and_archive() {
    let h = Harness::new(
        Sequence::Harvesting,
        FakeDiscovery::default().with_sample("RelValTTbar"),
        3,
    );
    let reports = h.run_ideal(&["RelValTTbar"], "").await;

    assert_eq!(
        reports[0].state,
        SampleState::Failed(FailReason::JobExit { code: Some(3) })
    );
    assert_eq!(h.jobs.calls(), vec![h.work("RelValTTbar.py")]);
    assert!(h.plots.calls().is_empty());

    let selection = h.driver.selection("IDEAL_30X", "", "");
    assert!(!h.driver.archive_path(&selection, "RelValTTbar").dir().exists());
}

#[tokio::test]
async fn missing_reference_falls_back_to_self_reference() {
    let h = Harness::new(
        Sequence::Harvesting,
        FakeDiscovery::default().with_sample("RelValTTbar"),
        0,
    );
    h.run_ideal(&["RelValTTbar"], "").await;

    let text = std::fs::read_to_string(h.work("RelValTTbar.C")).unwrap();
    assert!(text.starts_with("void RelValTTbar(){"));
    assert!(text.contains("ref = \"val.RelValTTbar.root\"; cur = \"val.RelValTTbar.root\";"));
    assert!(text.contains(&format!("refrel = \"{RELEASE}\"; newrel = \"{RELEASE}\";")));
    assert!(text.contains("refsel = \"IDEAL_30X_noPU_ootb\"; newsel = \"IDEAL_30X_noPU_ootb\";"));
}

#[tokio::test]
async fn reference_is_copied_and_compared() {
    let h = Harness::new(
        Sequence::Harvesting,
        FakeDiscovery::default().with_sample("RelValTTbar"),
        0,
    );
    let ref_dir = h
        .root
        .path()
        .join("ref")
        .join("CMSSW_3_0_0_pre6")
        .join("IDEAL_30X_noPU_highPurity")
        .join("RelValTTbar");
    std::fs::create_dir_all(&ref_dir).unwrap();
    std::fs::write(ref_dir.join("val.RelValTTbar.root"), "reference").unwrap();

    let reports = h.run_ideal(&["RelValTTbar"], "highPurity").await;
    assert_eq!(reports[0].selection.as_str(), "IDEAL_30X_noPU_highPurity");

    let local = h
        .work("CMSSW_3_0_0_pre6")
        .join("IDEAL_30X_noPU_highPurity")
        .join("val.RelValTTbar.root");
    assert_eq!(std::fs::read_to_string(local).unwrap(), "reference");

    let text = std::fs::read_to_string(h.work("RelValTTbar.C")).unwrap();
    assert!(text.contains(
        "ref = \"CMSSW_3_0_0_pre6/IDEAL_30X_noPU_highPurity/val.RelValTTbar.root\"; cur = \"val.RelValTTbar.root\";"
    ));
    assert!(text.contains(&format!("refrel = \"CMSSW_3_0_0_pre6\"; newrel = \"{RELEASE}\";")));
    assert!(text.contains(
        "refsel = \"IDEAL_30X_noPU_highPurity\"; newsel = \"IDEAL_30X_noPU_highPurity\";"
    ));
}

#[tokio::test]
async fn plot_failure_still_archives() {
    let h = Harness::with_config(
        Sequence::Harvesting,
        FakeDiscovery::default().with_sample("RelValTTbar"),
        0,
        1,
        |_| {},
    );
    let reports = h.run_ideal(&["RelValTTbar"], "").await;
    assert!(matches!(reports[0].state, SampleState::Archived(_)));
}

#[tokio::test]
async fn failed_plot_does_not_inherit_previous_plots() {
    let discovery = FakeDiscovery::default()
        .with_sample("RelValTTbar")
        .with_sample("RelValMinBias");
    let h = Harness::new(Sequence::Harvesting, discovery, 0);
    h.plots.break_sample("RelValMinBias");

    let reports = h.run_ideal(&["RelValTTbar", "RelValMinBias"], "").await;
    assert_eq!(reports.len(), 2);

    let selection = h.driver.selection("IDEAL_30X", "", "");
    let ttbar = h.driver.archive_path(&selection, "RelValTTbar");
    assert_eq!(
        std::fs::read_to_string(ttbar.sentinel()).unwrap(),
        "%PDF RelValTTbar"
    );

    let minbias = h.driver.archive_path(&selection, "RelValMinBias");
    assert!(minbias.histograms("RelValMinBias").is_file());
    assert!(!minbias.sentinel().exists(), "no plots were rendered for this sample");
    assert!(!minbias.dir().join("hitsAndPt.pdf").exists());

    // Not marked validated, so the next run retries it.
    h.plots.break_sample("");
    let again = h.run_ideal(&["RelValTTbar", "RelValMinBias"], "").await;
    assert_eq!(
        again[0].state,
        SampleState::Skipped(SkipReason::AlreadyValidated)
    );
    assert!(matches!(again[1].state, SampleState::Archived(_)));
    assert_eq!(
        std::fs::read_to_string(minbias.sentinel()).unwrap(),
        "%PDF RelValMinBias"
    );
}

#[tokio::test]
async fn tool_errors_fail_the_sample_and_are_counted() {
    let mut discovery = FakeDiscovery::default().with_sample("RelValTTbar");
    discovery.unreachable = true;
    let h = Harness::new(Sequence::Harvesting, discovery, 0);

    let reports = h.run_ideal(&["RelValTTbar", "RelValMinBias"], "").await;

    assert_eq!(reports.len(), 2, "the loop continues after a failure");
    for report in &reports {
        assert!(matches!(report.state, SampleState::Failed(FailReason::Error(_))));
    }
    assert_eq!(
        h.metrics.tool_errors.lock().unwrap().as_slice(),
        [
            ("discovery".to_string(), "spawn_failed".to_string()),
            ("discovery".to_string(), "spawn_failed".to_string()),
        ]
    );
}

#[tokio::test]
async fn missing_template_fails_the_sample() {
    let h = Harness::with_config(
        Sequence::Harvesting,
        FakeDiscovery::default().with_sample("RelValTTbar"),
        0,
        0,
        |cfg| cfg.cfg_template = PathBuf::from("/nonexistent/cfg.py"),
    );
    let reports = h.run_ideal(&["RelValTTbar"], "").await;

    match &reports[0].state {
        SampleState::Failed(FailReason::Error(reason)) => {
            assert!(reason.contains("/nonexistent/cfg.py"), "{reason}")
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert!(h.jobs.calls().is_empty());
}

#[tokio::test]
async fn sweep_visits_every_combination_in_order() {
    let discovery = FakeDiscovery::default()
        .with_sample("RelValTTbar")
        .with_sample("RelValMinBias");
    let h = Harness::with_config(Sequence::Harvesting, discovery, 0, 0, |cfg| {
        cfg.qualities = vec![String::new(), "highPurity".into()];
        cfg.selection_label = "_v2".into();
    });

    let reports = h.driver.sweep().await;
    let visited: Vec<(&str, &str)> = reports
        .iter()
        .map(|r| (r.sample.as_str(), r.selection.as_str()))
        .collect();

    assert_eq!(
        visited,
        [
            ("RelValTTbar", "IDEAL_30X_noPU_ootb_v2"),
            ("RelValMinBias", "STARTUP_30X_noPU_ootb_v2"),
            ("RelValTTbar", "IDEAL_30X_noPU_highPurity_v2"),
            ("RelValMinBias", "STARTUP_30X_noPU_highPurity_v2"),
        ]
    );
    assert!(reports.iter().all(|r| r.state.is_terminal()));
    assert_eq!(h.metrics.started.lock().unwrap().len(), 4);
    assert_eq!(outcome_counts(&reports).get("archived"), Some(&4));
}
