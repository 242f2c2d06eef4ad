//! `webforge` — build, optimize, and serve a wasm bundle.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use webforge::config::BuildConfig;
use webforge::observability::init_tracing;
use webforge::pipeline::TaskGraph;
use webforge::runner::ProcessRunner;
use webforge::stages::{RunIdentity, StageContext};
use webforge::tasks;

#[derive(Parser)]
#[command(name = "webforge", version)]
#[command(about = "Build a crate into a browser-deployable wasm bundle and serve it locally")]
struct Cli {
    /// Name of the cargo package to build (default: read from Cargo.toml)
    #[arg(short, long, global = true)]
    package: Option<String>,

    /// Directory containing the package's Cargo.toml
    #[arg(long, global = true, default_value = ".")]
    manifest_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile for wasm, generate web bindings, and size-optimize the module
    BuildWeb,

    /// Run build-web, then serve the output directory on the fixed port
    RunWeb,

    /// Report source line counts for the repository
    Stats,
}

fn resolve_config(cli: &Cli) -> anyhow::Result<BuildConfig> {
    match &cli.package {
        Some(package) => Ok(BuildConfig::for_package(package, &cli.manifest_dir)),
        None => BuildConfig::from_manifest(&cli.manifest_dir)
            .context("cannot resolve package name; pass --package"),
    }
}

async fn run(graph: &TaskGraph, config: BuildConfig) -> ExitCode {
    let ctx = StageContext::new(RunIdentity::new(), Arc::new(config));
    let report = graph.execute(&ctx).await;

    if report.success {
        ExitCode::SUCCESS
    } else {
        if let Some(stage) = &report.failed_stage {
            tracing::error!(stage = %stage, "chain halted");
        }
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let runner = Arc::new(ProcessRunner::new());

    let graph = match cli.command {
        Commands::BuildWeb => tasks::build_web(runner)?,
        Commands::RunWeb => tasks::run_web(runner)?,
        Commands::Stats => tasks::stats(runner)?,
    };

    Ok(run(&graph, config).await)
}
