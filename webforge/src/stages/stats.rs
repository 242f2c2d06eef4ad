//! Stats stage: source line counts via `tokei`.

use super::{Stage, StageContext};
use crate::core::StageOutput;
use crate::errors::WebforgeError;
use crate::runner::{CommandRunner, ProcessRunner};
use async_trait::async_trait;
use std::sync::Arc;

/// Name of the stats stage.
pub const STAGE_NAME: &str = "stats";

/// Reports line/code/comment counts for the repository.
///
/// Independent of the build chain: no inputs beyond the repository root,
/// no dependents, and no side effects beyond the report printed by the
/// tool itself. A failure here leaves every build artifact untouched.
#[derive(Debug)]
pub struct TokeiStage {
    runner: Arc<dyn CommandRunner>,
}

impl TokeiStage {
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
impl Stage for TokeiStage {
    fn name(&self) -> &str {
        STAGE_NAME
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let config = ctx.config();
        let args = vec![".".to_string()];

        let outcome = match self.runner.run("tokei", &args, &config.manifest_dir).await {
            Ok(outcome) => outcome,
            Err(e) => {
                return StageOutput::fail(
                    WebforgeError::Stats(format!("cannot run tokei: {e}")).to_string(),
                );
            }
        };

        if !outcome.success {
            return StageOutput::fail(
                WebforgeError::Stats(format!("tokei exited with {}", outcome.describe()))
                    .to_string(),
            );
        }

        StageOutput::ok_empty()
    }
}
