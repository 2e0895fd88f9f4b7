use std::{path::Path, sync::Arc};

use anyhow::{Context, anyhow};
use tracing::{info, warn};
use trkval_core::{DriverContext, SampleReport, SampleState, ValidationDriver, driver::outcome_counts};
use trkval_exec::{CmsRunJob, DbsDiscovery, RootPlotter, ensure_discovery_tool};
use trkval_model::{
    DriverConfig, SelectionName,
    binding::{ConfigNamespace, csc_rec_hit_validation},
};
use trkval_prometheus::PrometheusMetrics;

use crate::cli::{BindingArgs, RunArgs, SelectionArgs};

/// Release under test, set by the release environment.
const RELEASE_ENV: &str = "CMSSW_VERSION";

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let release = require_release(std::env::var(RELEASE_ENV).ok())?;
    let cfg = load_config(args.config.as_deref())?;
    info!(release = %release, ref_release = %cfg.ref_release, "configuration loaded");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start runtime")?;

    runtime.block_on(async {
        ensure_discovery_tool(&cfg.tools)
            .await
            .context("discovery tool unavailable")?;

        let metrics = PrometheusMetrics::new().context("cannot register metrics")?;
        let ctx = DriverContext::new(
            Arc::new(DbsDiscovery::from_config(&cfg)),
            Arc::new(CmsRunJob::from_config(&cfg)),
            Arc::new(RootPlotter::from_config(&cfg)),
        )
        .with_metrics(Arc::new(metrics.clone()));

        let driver = ValidationDriver::new(cfg, release, ctx);
        let reports = driver.sweep().await;
        summarize(&reports);

        if let Some(path) = &args.metrics_out {
            let text = metrics.encode_text().context("cannot encode metrics")?;
            tokio::fs::write(path, text)
                .await
                .with_context(|| format!("cannot write metrics to {}", path.display()))?;
            info!(path = %path.display(), "metrics written");
        }
        Ok(())
    })
}

pub fn selection(args: &SelectionArgs) -> SelectionName {
    SelectionName::derive(&args.tag, &args.quality, &args.algorithm, &args.tracks, &args.label)
}

/// Rendered declaration, followed by the effective parameters when an era is given.
pub fn binding(args: &BindingArgs) -> anyhow::Result<String> {
    let mut namespace = ConfigNamespace::new();
    namespace.register(csc_rec_hit_validation())?;

    let mut out = String::new();
    for label in namespace.labels() {
        let Some(binding) = namespace.get(label) else {
            continue;
        };
        out.push_str(&binding.to_python());
        if let Some(era) = args.era {
            out.push_str(&format!("\n# effective parameters ({era})\n"));
            for (name, value) in binding.resolve(Some(era)).iter() {
                out.push_str(&format!("#   {name} = {}\n", value.to_python()));
            }
        }
    }
    Ok(out)
}

fn require_release(value: Option<String>) -> anyhow::Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("{RELEASE_ENV} is not set; set up the release environment first"))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DriverConfig> {
    let Some(path) = path else {
        return Ok(DriverConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read configuration {}", path.display()))?;
    DriverConfig::from_json(&raw)
        .with_context(|| format!("invalid configuration {}", path.display()))
}

fn summarize(reports: &[SampleReport]) {
    for report in reports {
        if let SampleState::Failed(reason) = &report.state {
            warn!(
                sample = %report.sample,
                tag = %report.tag,
                selection = %report.selection,
                reason = %reason,
                "sample failed"
            );
        }
    }
    let counts = outcome_counts(reports);
    info!(samples = reports.len(), outcomes = ?counts, "sweep finished");
}
