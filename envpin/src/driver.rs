//! Runs the probe and export steps over every configured environment.
//!
//! Environments are handled one at a time in configuration order. A failed
//! probe is a skip, never an error. What happens after a failed export is
//! decided by the configured [`FailurePolicy`].

use crate::config::{ExportConfig, FailurePolicy};
use crate::export::{export_environment, ExportError, ExportResult};
use crate::tool::EnvironmentTool;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What happened to a single environment during a run
#[derive(Debug)]
pub enum Outcome {
    Exported { path: PathBuf },
    /// The probe reported the environment missing or unusable
    Skipped,
    Failed { error: ExportError },
}

#[derive(Debug)]
pub struct EnvReport {
    pub name: String,
    pub outcome: Outcome,
}

/// Per-environment outcomes, in processing order
#[derive(Debug, Default)]
pub struct RunReport {
    pub environments: Vec<EnvReport>,
}

impl RunReport {
    pub fn exported(&self) -> Vec<&Path> {
        self.environments
            .iter()
            .filter_map(|report| match &report.outcome {
                Outcome::Exported { path } => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.environments
            .iter()
            .filter(|report| matches!(report.outcome, Outcome::Skipped))
            .map(|report| report.name.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<(&str, &ExportError)> {
        self.environments
            .iter()
            .filter_map(|report| match &report.outcome {
                Outcome::Failed { error } => Some((report.name.as_str(), error)),
                _ => None,
            })
            .collect()
    }

    /// True when no export failed. Skipped environments do not count.
    pub fn is_success(&self) -> bool {
        self.failed().is_empty()
    }
}

/// Export every usable environment named in `config`.
///
/// The output directory is created up front, so it exists even when every
/// probe fails. Only configuration and directory errors are returned as
/// `Err`; per-environment failures land in the report.
pub async fn run(config: &ExportConfig, tool: &dyn EnvironmentTool) -> ExportResult<RunReport> {
    config
        .validate()
        .map_err(|message| ExportError::InvalidConfig { message })?;

    let output_dir = config.output_dir();
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| ExportError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

    info!(
        "Exporting {} environment(s) with {} into {}",
        config.environments().len(),
        config.program,
        output_dir.display()
    );

    let mut report = RunReport::default();

    for name in config.environments() {
        if !tool.probe(name).await {
            eprintln!("[skip] env not found:{}", name);
            debug!("Skipping environment '{}': probe failed", name);
            report.environments.push(EnvReport {
                name: name.clone(),
                outcome: Outcome::Skipped,
            });
            continue;
        }

        let output_path = config.output_path(name);
        let outcome =
            match export_environment(tool, name, &config.export_flags, &output_path).await {
                Ok(path) => Outcome::Exported { path },
                Err(e) => {
                    info!("Export of '{}' failed: {}", name, e);
                    Outcome::Failed { error: e }
                }
            };

        let halt = matches!(outcome, Outcome::Failed { .. })
            && config.failure_policy == FailurePolicy::Halt;

        report.environments.push(EnvReport {
            name: name.clone(),
            outcome,
        });

        if halt {
            info!("Halting after failed export of '{}'", name);
            break;
        }
    }

    info!(
        "Run finished: {} exported, {} skipped, {} failed",
        report.exported().len(),
        report.skipped().len(),
        report.failed().len()
    );

    Ok(report)
}
