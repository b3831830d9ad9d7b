pub mod config;
pub mod driver;
pub mod export;
pub mod tool;

pub use config::{
    ExportConfig, FailurePolicy, DEFAULT_ENVIRONMENTS, DEFAULT_EXPORT_FLAGS, DEFAULT_OUTPUT_DIR,
    DEFAULT_PROGRAM, PINNED_SUFFIX,
};
pub use driver::{run, EnvReport, Outcome, RunReport};
pub use export::{export_environment, ExportError, ExportResult};
pub use tool::{CondaCli, EnvironmentTool, ToolError, ToolResult};
