use crate::tool::{EnvironmentTool, ToolError};
use manifest::ManifestError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Environment tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Export one environment to `output_path` as a portable manifest.
///
/// The file is created or fully replaced. The caller has already probed the
/// environment; if it vanished in between, the tool error is returned here.
pub async fn export_environment(
    tool: &dyn EnvironmentTool,
    environment: &str,
    flags: &[String],
    output_path: &Path,
) -> ExportResult<PathBuf> {
    let raw = tool.export(environment, flags).await?;
    debug!("Received {} bytes of manifest for '{}'", raw.len(), environment);

    let pinned = manifest::normalize(&raw)?;

    tokio::fs::write(output_path, pinned)
        .await
        .map_err(|source| ExportError::Io {
            path: output_path.to_path_buf(),
            source,
        })?;

    println!("Wrote {}", output_path.display());
    info!("Exported '{}' to {}", environment, output_path.display());

    Ok(output_path.to_path_buf())
}
