//! Binding generator stage: `wasm-bindgen` for direct web loading.

use super::{Stage, StageContext};
use crate::core::{ArtifactKind, BuildArtifact, StageOutput};
use crate::errors::WebforgeError;
use crate::runner::{CommandRunner, ProcessRunner};
use async_trait::async_trait;
use std::sync::Arc;

/// Name of the binding generator stage.
pub const STAGE_NAME: &str = "bindgen";

/// Emits the web-loadable module and its JavaScript glue.
///
/// Targets direct web-platform module loading (`--target web`) and emits
/// no type-declaration file (`--no-typescript`). Output lands in the
/// shared output directory under the shared base name, overwriting
/// whatever a prior run left there.
#[derive(Debug)]
pub struct BindgenStage {
    runner: Arc<dyn CommandRunner>,
}

impl BindgenStage {
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
impl Stage for BindgenStage {
    fn name(&self) -> &str {
        STAGE_NAME
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let config = ctx.config();
        let input = config.wasm_binary_path();
        if !input.is_file() {
            return StageOutput::fail(
                WebforgeError::Binding(format!(
                    "input artifact {} is missing",
                    input.display()
                ))
                .to_string(),
            );
        }

        let args = vec![
            "--target".to_string(),
            "web".to_string(),
            "--no-typescript".to_string(),
            "--out-dir".to_string(),
            config.out_dir.display().to_string(),
            "--out-name".to_string(),
            config.out_name.clone(),
            input.display().to_string(),
        ];

        let outcome = match self
            .runner
            .run("wasm-bindgen", &args, &config.manifest_dir)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                return StageOutput::fail(
                    WebforgeError::Binding(format!("cannot run wasm-bindgen: {e}")).to_string(),
                );
            }
        };

        if !outcome.success {
            return StageOutput::fail(
                WebforgeError::Binding(format!(
                    "wasm-bindgen exited with {}",
                    outcome.describe()
                ))
                .to_string(),
            );
        }

        let module = config.wasm_module_path();
        let glue = config.js_glue_path();
        for expected in [&module, &glue] {
            if !expected.is_file() {
                return StageOutput::fail(
                    WebforgeError::Binding(format!(
                        "wasm-bindgen reported success but {} is missing",
                        expected.display()
                    ))
                    .to_string(),
                );
            }
        }

        StageOutput::ok(vec![
            BuildArtifact::new(ArtifactKind::WasmModule, module, STAGE_NAME).with_measured_size(),
            BuildArtifact::new(ArtifactKind::JsGlue, glue, STAGE_NAME).with_measured_size(),
        ])
    }
}
