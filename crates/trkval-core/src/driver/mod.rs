//! Batch validation driver.
//!
//! For every (algorithm, quality) pair the driver runs the ideal and then the startup
//! sample list. Each sample walks `Pending -> {Skipped | Failed | Archived}`; nothing a
//! single sample does stops the sweep.
mod state;
pub use state::{FailReason, SampleReport, SampleState, SkipReason, outcome_counts};

mod archive;

#[cfg(test)]
mod tests;

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use tracing::{debug, error, info, warn};
use trkval_model::{ArchivePath, DriverConfig, SampleJobSpec, SampleSet, SelectionName};

use crate::{
    error::CoreError,
    jobcfg::{JobConfig, SecondaryFiles},
    template::{JobField, MacroBindings, MacroField, Template},
    tools::DriverContext,
};

/// One (tag, quality, algorithm) pass over a sample list.
struct Pass<'a> {
    tag: &'a str,
    quality: &'a str,
    algorithm: &'a str,
    selection: SelectionName,
    reference: &'a SelectionName,
}

/// Runs validation passes against the injected collaborators.
#[derive(Debug)]
pub struct ValidationDriver {
    cfg: DriverConfig,
    release: String,
    ctx: DriverContext,
}

impl ValidationDriver {
    /// `release` is the release under test (from `CMSSW_VERSION`).
    pub fn new(cfg: DriverConfig, release: impl Into<String>, ctx: DriverContext) -> Self {
        Self {
            cfg,
            release: release.into(),
            ctx,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.cfg
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    /// Selection name new results for this pass are filed under.
    pub fn selection(&self, tag: &str, quality: &str, algorithm: &str) -> SelectionName {
        SelectionName::derive(
            tag,
            quality,
            algorithm,
            &self.cfg.tracks_name,
            &self.cfg.selection_label,
        )
    }

    /// Archive location of `sample` for a selection.
    pub fn archive_path(&self, selection: &SelectionName, sample: &str) -> ArchivePath {
        ArchivePath::new(&self.cfg.new_repository, &self.release, selection, sample)
    }

    /// Full sweep: algorithms x qualities, ideal samples then startup samples.
    pub async fn sweep(&self) -> Vec<SampleReport> {
        let mut reports = Vec::new();
        for algorithm in &self.cfg.algorithms {
            for quality in &self.cfg.qualities {
                for set in SampleSet::ALL {
                    let reference = set.reference_selection(&self.cfg, quality, algorithm);
                    debug!(set = %set, quality = %quality, algorithm = %algorithm, "sweep step");
                    let batch = self
                        .run_validation(
                            set.samples(&self.cfg),
                            set.tag(&self.cfg),
                            quality,
                            algorithm,
                            &reference,
                        )
                        .await;
                    reports.extend(batch);
                }
            }
        }
        reports
    }

    /// Validate `samples` with one tag and filter combination, comparing against `reference`.
    ///
    /// Returns one report per sample in input order.
    pub async fn run_validation(
        &self,
        samples: &[String],
        tag: &str,
        quality: &str,
        algorithm: &str,
        reference: &SelectionName,
    ) -> Vec<SampleReport> {
        let pass = Pass {
            tag,
            quality,
            algorithm,
            selection: self.selection(tag, quality, algorithm),
            reference,
        };
        info!(
            tag,
            selection = %pass.selection,
            reference = %reference,
            samples = samples.len(),
            "starting validation pass"
        );

        let mut reports = Vec::with_capacity(samples.len());
        for sample in samples {
            reports.push(self.validate_sample(sample, &pass).await);
        }
        reports
    }

    async fn validate_sample(&self, sample: &str, pass: &Pass<'_>) -> SampleReport {
        let metrics = self.ctx.metrics();
        let started = Instant::now();
        metrics.record_sample_started(pass.tag);

        let state = match self.process_sample(sample, pass).await {
            Ok(state) => state,
            Err(e) => {
                if let CoreError::Tool(tool_err) = &e {
                    metrics.record_tool_error(tool_err.tool(), tool_err.kind());
                }
                error!(sample, error = %e, "sample pipeline failed");
                SampleState::Failed(FailReason::Error(e.to_string()))
            }
        };

        let elapsed = started.elapsed();
        if let Some(outcome) = state.outcome() {
            metrics.record_sample_completed(pass.tag, outcome, elapsed.as_millis() as u64);
        }
        SampleReport {
            sample: sample.to_string(),
            tag: pass.tag.to_string(),
            selection: pass.selection.clone(),
            state,
            elapsed,
        }
    }

    async fn process_sample(&self, sample: &str, pass: &Pass<'_>) -> Result<SampleState, CoreError> {
        let cfg = &self.cfg;
        let archive = self.archive_path(&pass.selection, sample);
        if archive::is_validated(&archive).await {
            info!(sample, path = %archive, "validation already done, skipping sample");
            return Ok(SampleState::Skipped(SkipReason::AlreadyValidated));
        }

        info!(sample, "querying discovery service");
        let discovery = self.ctx.discovery();
        let Some(dataset) = discovery.find_dataset(sample, &self.release, pass.tag).await? else {
            warn!(sample, tag = pass.tag, "no dataset found, skipping sample");
            return Ok(SampleState::Skipped(SkipReason::NoDataset));
        };
        info!(sample, dataset = %dataset, "dataset found");
        let files = discovery.list_files(&dataset, sample).await?;

        let secondary = if cfg.sequence.is_harvesting() {
            SecondaryFiles::Harvesting
        } else {
            let Some(parent) = discovery.find_parent(&dataset, sample).await? else {
                warn!(sample, dataset = %dataset, "no parent dataset found, skipping sample");
                return Ok(SampleState::Skipped(SkipReason::NoParentDataset));
            };
            info!(sample, parent = %parent, "parent dataset found");
            SecondaryFiles::Parent(discovery.list_files(&parent, sample).await?)
        };

        let spec = SampleJobSpec::new(
            sample,
            pass.tag,
            cfg.events_for(sample),
            pass.quality,
            pass.algorithm,
            &cfg.tracks_name,
            cfg.sequence,
        );
        let job_template = read_template(&cfg.cfg_template).await?;
        let body = Template::<JobField>::parse(&job_template).render(&spec);

        let work_dir = &cfg.work_dir;
        tokio::fs::create_dir_all(work_dir)
            .await
            .map_err(|e| CoreError::io(work_dir, e))?;
        let cfg_path = work_dir.join(format!("{}.py", spec.file_stem()));
        let job_config = JobConfig::new(files, secondary);
        tokio::fs::write(&cfg_path, job_config.render(&body))
            .await
            .map_err(|e| CoreError::io(&cfg_path, e))?;
        debug!(
            sample,
            path = %cfg_path.display(),
            inputs = job_config.primary().len(),
            "job configuration written"
        );

        let log_path = work_dir.join(format!("{}.log", spec.file_stem()));
        let status = self.ctx.jobs().run(&cfg_path, &log_path).await?;
        if !status.success() {
            warn!(sample, code = ?status.code(), log = %log_path.display(), "job failed");
            return Ok(SampleState::Failed(FailReason::JobExit {
                code: status.code(),
            }));
        }

        if cfg.sequence.is_harvesting() {
            let from = work_dir.join(spec.harvest_output());
            let to = work_dir.join(spec.histogram_file());
            if let Err(e) = tokio::fs::rename(&from, &to).await {
                warn!(sample, from = %from.display(), error = %e, "harvest output not renamed");
            }
        }

        let bindings = self.stage_reference(&spec, pass).await?;
        let macro_template = read_template(&cfg.macro_template).await?;
        let macro_path = work_dir.join(format!("{}.C", spec.file_stem()));
        tokio::fs::write(
            &macro_path,
            Template::<MacroField>::parse(&macro_template).render(&bindings),
        )
        .await
        .map_err(|e| CoreError::io(&macro_path, e))?;

        archive::clear_plots(work_dir).await?;
        let plot_log = work_dir.join(format!("macro.{}.log", spec.file_stem()));
        let status = self.ctx.plots().render(&macro_path, &plot_log).await?;
        if !status.success() {
            warn!(sample, code = ?status.code(), log = %plot_log.display(), "plot macro exited non-zero");
        }

        archive::store(work_dir, &archive, &spec).await?;
        info!(sample, path = %archive, "sample archived");
        Ok(SampleState::Archived(archive.dir().to_path_buf()))
    }

    /// Copy the reference histograms next to the new ones, or fall back to self-reference.
    async fn stage_reference(
        &self,
        spec: &SampleJobSpec,
        pass: &Pass<'_>,
    ) -> Result<MacroBindings, CoreError> {
        let cfg = &self.cfg;
        let sample = spec.sample.as_str();
        let reference = ArchivePath::new(&cfg.ref_repository, &cfg.ref_release, pass.reference, sample)
            .histograms(sample);

        if !archive::is_file(&reference).await {
            warn!(
                sample,
                path = %reference.display(),
                "no reference file found, comparing against the new result"
            );
            return Ok(MacroBindings::self_reference(sample, &self.release, &pass.selection));
        }

        let local_dir: PathBuf = cfg
            .work_dir
            .join(&cfg.ref_release)
            .join(pass.reference.as_str());
        tokio::fs::create_dir_all(&local_dir)
            .await
            .map_err(|e| CoreError::io(&local_dir, e))?;
        let local = local_dir.join(spec.histogram_file());
        tokio::fs::copy(&reference, &local)
            .await
            .map_err(|e| CoreError::io(&reference, e))?;
        debug!(sample, from = %reference.display(), "reference copied");

        Ok(MacroBindings::with_reference(
            sample,
            &self.release,
            &pass.selection,
            &cfg.ref_release,
            pass.reference,
        ))
    }
}

async fn read_template(path: &Path) -> Result<String, CoreError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CoreError::Template {
            path: path.to_path_buf(),
            source,
        })
}
