//! Dataset discovery through the DBS command-line client.
use std::{path::Path, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use trkval_core::{DiscoveryClient, ToolError};
use trkval_model::{DriverConfig, ToolsConfig};

use crate::{
    ExecError, TOOL_DISCOVERY, TOOL_FETCH, exec_error_to_tool_error,
    subprocess::{CommandSpec, OutputTarget, run_command},
};

/// [`DiscoveryClient`] backed by the discovery CLI.
#[derive(Debug, Clone)]
pub struct DbsDiscovery {
    program: String,
    timeout: Option<Duration>,
}

impl DbsDiscovery {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &DriverConfig) -> Self {
        Self::new(
            cfg.tools.discovery.to_string_lossy(),
            cfg.tools.timeout_secs.map(Duration::from_secs),
        )
    }

    /// Run one query and return its stdout.
    ///
    /// A non-zero exit is logged and treated as an empty answer.
    async fn query(&self, extra: &[&str], query: String) -> Result<String, ToolError> {
        let spec = CommandSpec::new(TOOL_DISCOVERY, self.program.as_str())
            .args(["--limit", "-1"])
            .args(extra.iter().copied())
            .arg(format!("--input={query}"))
            .stderr(OutputTarget::Null)
            .timeout(self.timeout);
        debug!(query = %query, "discovery query");

        let out = run_command(&spec)
            .await
            .map_err(|e| exec_error_to_tool_error(TOOL_DISCOVERY, e))?;
        if !out.success() {
            warn!(code = ?out.code(), query = %query, "discovery query exited non-zero");
            return Ok(String::new());
        }
        Ok(out.stdout().to_string())
    }
}

#[async_trait]
impl DiscoveryClient for DbsDiscovery {
    async fn find_dataset(
        &self,
        sample: &str,
        release: &str,
        tag: &str,
    ) -> Result<Option<String>, ToolError> {
        let query = format!(
            "find dataset.createdate, dataset where dataset like *{sample}/{release}_{tag}*GEN-SIM-RECO*"
        );
        let out = self.query(&[], query).await?;
        Ok(latest_dataset(&out, sample))
    }

    async fn list_files(&self, dataset: &str, sample: &str) -> Result<Vec<String>, ToolError> {
        let query = format!("find file where dataset like {dataset}");
        let out = self.query(&["--cff"], query).await?;
        Ok(sample_lines(&out, sample))
    }

    async fn find_parent(&self, dataset: &str, sample: &str) -> Result<Option<String>, ToolError> {
        let query = format!("find dataset.parent where dataset like {dataset}");
        let out = self.query(&[], query).await?;
        Ok(first_match(&out, sample))
    }
}

/// Pick the most recent dataset from `createdate, dataset` rows.
///
/// Rows must mention `sample` and must not mention `test`; the lexicographically
/// greatest row wins and its second column is returned.
pub(crate) fn latest_dataset(output: &str, sample: &str) -> Option<String> {
    let mut rows: Vec<&str> = output
        .lines()
        .filter(|l| l.contains(sample) && !l.contains("test"))
        .collect();
    rows.sort_unstable();
    let dataset = rows.last()?.split(',').nth(1)?.trim();
    (!dataset.is_empty()).then(|| dataset.to_string())
}

/// Lines mentioning `sample`, in output order.
pub(crate) fn sample_lines(output: &str, sample: &str) -> Vec<String> {
    output
        .lines()
        .filter(|l| l.contains(sample))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

pub(crate) fn first_match(output: &str, sample: &str) -> Option<String> {
    output
        .lines()
        .find(|l| l.contains(sample))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

/// Make sure the discovery CLI exists, downloading it when missing.
///
/// A failed download removes the partial file.
pub async fn ensure_discovery_tool(tools: &ToolsConfig) -> Result<(), ExecError> {
    let path = tools.discovery.as_path();
    if tokio::fs::metadata(path).await.is_ok() {
        debug!(path = %path.display(), "discovery tool present");
        return Ok(());
    }

    info!(url = %tools.discovery_url, path = %path.display(), "downloading discovery tool");
    let spec = CommandSpec::new(TOOL_FETCH, tools.fetcher.as_str())
        .arg("--no-check-certificate")
        .arg(tools.discovery_url.as_str())
        .arg("-O")
        .arg(path.to_string_lossy())
        .stdout(OutputTarget::Null)
        .stderr(OutputTarget::Null)
        .timeout(tools.timeout_secs.map(Duration::from_secs));

    let fetched = match run_command(&spec).await {
        Ok(out) if out.success() => Ok(()),
        Ok(out) => Err(ExecError::Fetch {
            url: tools.discovery_url.clone(),
            reason: format!("{} exited with {:?}", tools.fetcher, out.code()),
        }),
        Err(e) => Err(e),
    };
    if let Err(e) = fetched {
        discard(path).await;
        return Err(e);
    }

    make_executable(path).await
}

async fn discard(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), error = %e, "cannot remove partial download");
        }
        _ => {}
    }
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<(), ExecError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<(), ExecError> {
    Ok(())
}
