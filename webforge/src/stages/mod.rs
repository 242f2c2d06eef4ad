//! Stage trait and the concrete build stages.
//!
//! Stages are the units of work in the pipeline: compile, binding
//! generation, size optimization, dev serving, and the independent stats
//! report.

mod bindgen;
mod compile;
mod optimize;
mod serve;
mod stats;

pub use bindgen::{BindgenStage, STAGE_NAME as BINDGEN_STAGE};
pub use compile::{CargoBuildStage, STAGE_NAME as COMPILE_STAGE};
pub use optimize::{WasmOptStage, STAGE_NAME as OPTIMIZE_STAGE};
pub use serve::{DevServerStage, STAGE_NAME as SERVE_STAGE};
pub use stats::{TokeiStage, STAGE_NAME as STATS_STAGE};

use crate::config::BuildConfig;
use crate::core::StageOutput;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use uuid::Uuid;

/// Identity of one pipeline run.
///
/// Each invocation is a fresh, fully-specified execution; the id only
/// exists to correlate log lines.
#[derive(Debug, Clone)]
pub struct RunIdentity {
    /// Unique id for this run.
    pub run_id: Uuid,
}

impl RunIdentity {
    /// Creates a new run identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
        }
    }
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// Execution context handed to each stage.
#[derive(Debug, Clone)]
pub struct StageContext {
    run: RunIdentity,
    config: Arc<BuildConfig>,
}

impl StageContext {
    /// Creates a new stage context.
    #[must_use]
    pub fn new(run: RunIdentity, config: Arc<BuildConfig>) -> Self {
        Self { run, config }
    }

    /// Returns the run identity.
    #[must_use]
    pub fn run(&self) -> &RunIdentity {
        &self.run
    }

    /// Returns the shared build configuration.
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }
}

/// Trait for pipeline stages.
///
/// A stage runs to completion and reports a pass/fail outcome; its
/// prerequisites have all succeeded by the time it is executed.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns the name of the stage.
    fn name(&self) -> &str;

    /// Executes the stage.
    async fn execute(&self, ctx: &StageContext) -> StageOutput;
}

/// A no-op stage, useful in tests.
#[derive(Debug, Clone)]
pub struct NoOpStage {
    name: String,
}

impl NoOpStage {
    /// Creates a new no-op stage.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Stage for NoOpStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _ctx: &StageContext) -> StageOutput {
        StageOutput::ok_empty()
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> StageContext {
    StageContext::new(
        RunIdentity::new(),
        Arc::new(BuildConfig::for_package("demo", ".")),
    )
}
