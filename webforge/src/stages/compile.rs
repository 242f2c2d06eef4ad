//! Compiler stage: `cargo build` for the wasm target.

use super::{Stage, StageContext};
use crate::core::{ArtifactKind, BuildArtifact, StageOutput};
use crate::errors::WebforgeError;
use crate::runner::{CommandRunner, ProcessRunner};
use async_trait::async_trait;
use std::sync::Arc;

/// Name of the compile stage.
pub const STAGE_NAME: &str = "compile";

/// Compiles the package for the wasm target in release profile.
///
/// Produces exactly one binary at the toolchain-defined path under
/// `target/`. A non-zero cargo exit means the artifact is treated as
/// absent; any file left at the path from an earlier run is never trusted
/// as fresh.
#[derive(Debug)]
pub struct CargoBuildStage {
    runner: Arc<dyn CommandRunner>,
}

impl CargoBuildStage {
    /// Creates the stage with an injected runner.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Creates the stage with the real process runner.
    #[must_use]
    pub fn with_process_runner() -> Self {
        Self::new(Arc::new(ProcessRunner::new()))
    }
}

#[async_trait]
impl Stage for CargoBuildStage {
    fn name(&self) -> &str {
        STAGE_NAME
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let config = ctx.config();
        let args = vec![
            "build".to_string(),
            "--release".to_string(),
            "--target".to_string(),
            crate::config::WASM_TARGET.to_string(),
            "-p".to_string(),
            config.package.clone(),
        ];

        let outcome = match self.runner.run("cargo", &args, &config.manifest_dir).await {
            Ok(outcome) => outcome,
            Err(e) => {
                return StageOutput::fail(
                    WebforgeError::Toolchain(format!("cannot run cargo: {e}")).to_string(),
                );
            }
        };

        if !outcome.success {
            return StageOutput::fail(
                WebforgeError::Toolchain(format!(
                    "cargo build exited with {}",
                    outcome.describe()
                ))
                .to_string(),
            );
        }

        let binary = config.wasm_binary_path();
        if !binary.is_file() {
            return StageOutput::fail(
                WebforgeError::Toolchain(format!(
                    "cargo reported success but {} is missing",
                    binary.display()
                ))
                .to_string(),
            );
        }

        StageOutput::ok(vec![
            BuildArtifact::new(ArtifactKind::WasmBinary, binary, STAGE_NAME).with_measured_size(),
        ])
    }
}
