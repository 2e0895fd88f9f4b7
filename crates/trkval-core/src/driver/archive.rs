use std::path::Path;

use tracing::{debug, info, warn};
use trkval_model::{ArchivePath, SampleJobSpec};

use crate::error::CoreError;

/// A sample counts as validated solely when the archive holds the sentinel.
pub(super) async fn is_validated(archive: &ArchivePath) -> bool {
    is_file(&archive.sentinel()).await
}

/// Remove plots left in `work_dir` by an earlier sample.
///
/// Run before each plot step so the archive only receives what this sample rendered.
pub(super) async fn clear_plots(work_dir: &Path) -> Result<(), CoreError> {
    for path in pdf_files(work_dir).await? {
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| CoreError::io(&path, e))?;
        debug!(path = %path.display(), "stale plot removed");
    }
    Ok(())
}

/// Copy plots, histograms and the job configuration of one sample into its archive.
pub(super) async fn store(
    work_dir: &Path,
    archive: &ArchivePath,
    spec: &SampleJobSpec,
) -> Result<(), CoreError> {
    let dest = archive.dir();
    tokio::fs::create_dir_all(dest)
        .await
        .map_err(|e| CoreError::io(dest, e))?;

    let sample = spec.sample.as_str();
    info!(sample, "copying pdf files");
    for path in pdf_files(work_dir).await? {
        copy_into(&path, dest).await?;
    }

    info!(sample, "copying root file");
    let histograms = work_dir.join(spec.histogram_file());
    if is_file(&histograms).await {
        copy_into(&histograms, dest).await?;
    } else {
        warn!(sample, path = %histograms.display(), "histogram file missing");
    }

    info!(sample, "copying py file");
    copy_into(&work_dir.join(format!("{}.py", spec.file_stem())), dest).await
}

async fn pdf_files(dir: &Path) -> Result<Vec<std::path::PathBuf>, CoreError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| CoreError::io(dir, e))?;
    let mut pdfs = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CoreError::io(dir, e))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "pdf") && is_file(&path).await {
            pdfs.push(path);
        }
    }
    Ok(pdfs)
}

async fn copy_into(file: &Path, dest: &Path) -> Result<(), CoreError> {
    let Some(name) = file.file_name() else {
        return Ok(());
    };
    tokio::fs::copy(file, dest.join(name))
        .await
        .map(|_| ())
        .map_err(|e| CoreError::io(file, e))
}

pub(super) async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
