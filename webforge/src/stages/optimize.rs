//! Size optimizer stage: `wasm-opt` in place, via a temp file.

use super::{Stage, StageContext};
use crate::core::{ArtifactKind, BuildArtifact, StageOutput};
use crate::errors::WebforgeError;
use crate::runner::{CommandRunner, ProcessRunner};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the optimizer stage.
pub const STAGE_NAME: &str = "optimize";

/// Rewrites the generated module with aggressive size-optimization passes.
///
/// The optimizer writes to a sibling temp file which is renamed over the
/// module only after a zero exit, so a failed pass can never leave a
/// truncated module at the served path. The stage still fails and the
/// chain aborts; there is no fallback to serving the unoptimized module.
#[derive(Debug)]
pub struct WasmOptStage {
    runner: Arc<dyn CommandRunner>,
}

impl WasmOptStage {
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

/// Sibling path the optimizer writes to before the rename.
fn scratch_path(module: &Path) -> PathBuf {
    let mut name = module
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".opt");
    module.with_file_name(name)
}

#[async_trait]
impl Stage for WasmOptStage {
    fn name(&self) -> &str {
        STAGE_NAME
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let config = ctx.config();
        let module = config.wasm_module_path();
        if !module.is_file() {
            return StageOutput::fail(
                WebforgeError::Optimization(format!(
                    "input module {} is missing",
                    module.display()
                ))
                .to_string(),
            );
        }

        let scratch = scratch_path(&module);
        let args = vec![
            config.opt_level.clone(),
            "-o".to_string(),
            scratch.display().to_string(),
            module.display().to_string(),
        ];

        let outcome = match self.runner.run("wasm-opt", &args, &config.manifest_dir).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let _ = std::fs::remove_file(&scratch);
                return StageOutput::fail(
                    WebforgeError::Optimization(format!("cannot run wasm-opt: {e}")).to_string(),
                );
            }
        };

        if !outcome.success {
            let _ = std::fs::remove_file(&scratch);
            return StageOutput::fail(
                WebforgeError::Optimization(format!(
                    "wasm-opt exited with {}",
                    outcome.describe()
                ))
                .to_string(),
            );
        }

        if !scratch.is_file() {
            return StageOutput::fail(
                WebforgeError::Optimization(format!(
                    "wasm-opt exited cleanly but wrote no output at {}",
                    scratch.display()
                ))
                .to_string(),
            );
        }

        if let Err(e) = std::fs::rename(&scratch, &module) {
            let _ = std::fs::remove_file(&scratch);
            return StageOutput::fail(
                WebforgeError::Optimization(format!(
                    "cannot replace {}: {e}",
                    module.display()
                ))
                .to_string(),
            );
        }

        StageOutput::ok(vec![
            BuildArtifact::new(ArtifactKind::WasmModule, module, STAGE_NAME).with_measured_size(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use crate::stages::RunIdentity;
    use crate::testing::ScriptedRunner;

    fn context_in(dir: &std::path::Path) -> StageContext {
        StageContext::new(
            RunIdentity::new(),
            Arc::new(BuildConfig::for_package("demo", dir)),
        )
    }

    fn place_module(ctx: &StageContext, bytes: &[u8]) -> PathBuf {
        let module = ctx.config().wasm_module_path();
        std::fs::create_dir_all(module.parent().unwrap()).unwrap();
        std::fs::write(&module, bytes).unwrap();
        module
    }

    #[tokio::test]
    async fn test_rewrites_module_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());
        let module = place_module(&ctx, b"unoptimized-unoptimized");

        let runner = Arc::new(ScriptedRunner::new());
        runner.on_invoke("wasm-opt", |args| {
            // Real wasm-opt writes the smaller module at the -o path.
            let out = &args[args.iter().position(|a| a == "-o").unwrap() + 1];
            std::fs::write(out, b"optimized").unwrap();
        });

        let stage = WasmOptStage::new(runner.clone());
        let output = stage.execute(&ctx).await;

        assert!(output.is_success());
        assert_eq!(std::fs::read(&module).unwrap(), b"optimized");
        assert!(!scratch_path(&module).exists());

        let args = &runner.invocations()[0].args;
        assert_eq!(args[0], "-Oz");
    }

    #[tokio::test]
    async fn test_failed_pass_preserves_original_module() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());
        let module = place_module(&ctx, b"original bytes");

        let runner = Arc::new(ScriptedRunner::new());
        runner.fail_program("wasm-opt", 1);

        let stage = WasmOptStage::new(runner);
        let output = stage.execute(&ctx).await;

        assert!(output.is_failure());
        assert_eq!(std::fs::read(&module).unwrap(), b"original bytes");
        assert!(!scratch_path(&module).exists());
    }

    #[tokio::test]
    async fn test_missing_module_fails_without_invoking_tool() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(ScriptedRunner::new());

        let stage = WasmOptStage::new(runner.clone());
        let output = stage.execute(&context_in(dir.path())).await;

        assert!(output.is_failure());
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_zero_exit_without_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());
        place_module(&ctx, b"original bytes");

        // Tool "succeeds" but writes no scratch file.
        let stage = WasmOptStage::new(Arc::new(ScriptedRunner::new()));
        let output = stage.execute(&ctx).await;

        assert!(output.is_failure());
        assert_eq!(
            std::fs::read(ctx.config().wasm_module_path()).unwrap(),
            b"original bytes"
        );
    }
}
