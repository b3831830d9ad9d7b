use clap::Parser;
use envpin::{run, CondaCli, ExportConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "envpin")]
#[command(version)]
#[command(about = "Export conda environments to portable, pinned YAML manifests")]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ExportConfig::default();
    let tool = CondaCli::new(config.program.clone());

    match run(&config, &tool).await {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            for (name, e) in report.failed() {
                eprintln!("Error: failed to export '{}': {}", name, e);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
