use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Environments exported by a default run, in processing order
pub const DEFAULT_ENVIRONMENTS: [&str; 3] = ["barseq", "n2v_tf24_gpu", "cellpose_v3"];

/// Export without build strings so manifests resolve on other platforms
pub const DEFAULT_EXPORT_FLAGS: [&str; 1] = ["--no-builds"];

pub const DEFAULT_OUTPUT_DIR: &str = "envs_export";

pub const DEFAULT_PROGRAM: &str = "conda";

/// Suffix appended to the environment name to form the output file name
pub const PINNED_SUFFIX: &str = ".pinned.yml";

/// What the driver does after an export fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failed export, leaving later environments untouched
    #[default]
    Halt,
    /// Record the failure and move on to the next environment
    Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub program: String,
    pub environments: Vec<String>,
    pub export_flags: Vec<String>,
    pub output_dir: PathBuf,
    pub failure_policy: FailurePolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            environments: DEFAULT_ENVIRONMENTS.iter().map(|s| s.to_string()).collect(),
            export_flags: DEFAULT_EXPORT_FLAGS.iter().map(|s| s.to_string()).collect(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_environments<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environments = environments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_export_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// The environments to consider, in the order they are processed
    pub fn environments(&self) -> &[String] {
        &self.environments
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the pinned manifest for `environment` is written
    pub fn output_path(&self, environment: &str) -> PathBuf {
        self.output_dir.join(format!("{}{}", environment, PINNED_SUFFIX))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.program.is_empty() {
            return Err("Program cannot be empty".to_string());
        }

        let mut seen = HashSet::new();
        for name in &self.environments {
            if name.is_empty() {
                return Err("Environment names cannot be empty".to_string());
            }

            // Names become file names inside the output directory
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(format!(
                    "Environment name '{}' cannot be used as a file name",
                    name
                ));
            }

            if !seen.insert(name.as_str()) {
                return Err(format!("Environment '{}' is listed more than once", name));
            }
        }

        Ok(())
    }
}
