use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Command '{command}' produced output that is not valid UTF-8")]
    InvalidOutput { command: String },
}

pub type ToolResult<T> = Result<T, ToolError>;

/// The package manager operations the exporter depends on
#[async_trait]
pub trait EnvironmentTool: Send + Sync {
    /// Whether the named environment exists and can run a trivial command.
    ///
    /// Only the exit status matters; a tool that cannot be started at all
    /// reports every environment as unusable.
    async fn probe(&self, environment: &str) -> bool;

    /// Export the named environment's manifest as raw YAML text
    async fn export(&self, environment: &str, flags: &[String]) -> ToolResult<String>;
}

/// `conda` invoked as a child process
#[derive(Debug, Clone)]
pub struct CondaCli {
    program: String,
}

impl CondaCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn probe_args(environment: &str) -> Vec<String> {
        ["run", "-n", environment, "python", "-V"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn export_args(environment: &str, flags: &[String]) -> Vec<String> {
        let mut args: Vec<String> = ["env", "export", "-n", environment]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.extend(flags.iter().cloned());
        args
    }

    fn describe(&self, args: &[String]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }
}

impl Default for CondaCli {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PROGRAM)
    }
}

#[async_trait]
impl EnvironmentTool for CondaCli {
    async fn probe(&self, environment: &str) -> bool {
        let args = Self::probe_args(environment);
        debug!("Probing environment: {}", self.describe(&args));

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) => {
                debug!("Probe for '{}' exited with {}", environment, status);
                status.success()
            }
            Err(e) => {
                debug!(
                    "Probe for '{}' could not start {}: {}",
                    environment, self.program, e
                );
                false
            }
        }
    }

    async fn export(&self, environment: &str, flags: &[String]) -> ToolResult<String> {
        let args = Self::export_args(environment, flags);
        let command = self.describe(&args);
        debug!("Exporting environment: {}", command);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ToolError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ToolError::InvalidOutput { command })
    }
}
