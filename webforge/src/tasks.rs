//! The shipped task graphs.
//!
//! The build-and-serve chain and the stats task are declared here as
//! data: named stages with explicit prerequisite edges. A future stage
//! (say, compression or checksumming after optimize) is a new node and
//! edge, not new control flow.

use crate::errors::PipelineValidationError;
use crate::pipeline::{PipelineBuilder, TaskGraph};
use crate::runner::CommandRunner;
use crate::stages::{
    BindgenStage, CargoBuildStage, DevServerStage, TokeiStage, WasmOptStage, BINDGEN_STAGE,
    COMPILE_STAGE, OPTIMIZE_STAGE, SERVE_STAGE, STATS_STAGE,
};
use std::sync::Arc;

/// Builds the `build-web` graph: compile, then binding generation, then
/// size optimization.
///
/// # Errors
///
/// Returns an error if graph validation fails.
pub fn build_web(runner: Arc<dyn CommandRunner>) -> Result<TaskGraph, PipelineValidationError> {
    PipelineBuilder::new("build-web")
        .stage(COMPILE_STAGE, Arc::new(CargoBuildStage::new(runner.clone())), &[])?
        .stage(
            BINDGEN_STAGE,
            Arc::new(BindgenStage::new(runner.clone())),
            &[COMPILE_STAGE],
        )?
        .stage(
            OPTIMIZE_STAGE,
            Arc::new(WasmOptStage::new(runner)),
            &[BINDGEN_STAGE],
        )?
        .build()
}

/// Builds the `run-web` graph: the full build chain plus the dev server,
/// which requires all three build stages to have succeeded.
///
/// # Errors
///
/// Returns an error if graph validation fails.
pub fn run_web(runner: Arc<dyn CommandRunner>) -> Result<TaskGraph, PipelineValidationError> {
    PipelineBuilder::new("run-web")
        .stage(COMPILE_STAGE, Arc::new(CargoBuildStage::new(runner.clone())), &[])?
        .stage(
            BINDGEN_STAGE,
            Arc::new(BindgenStage::new(runner.clone())),
            &[COMPILE_STAGE],
        )?
        .stage(
            OPTIMIZE_STAGE,
            Arc::new(WasmOptStage::new(runner)),
            &[BINDGEN_STAGE],
        )?
        .stage(
            SERVE_STAGE,
            Arc::new(DevServerStage::new()),
            &[COMPILE_STAGE, BINDGEN_STAGE, OPTIMIZE_STAGE],
        )?
        .build()
}

/// Builds the `stats` graph: a single stage with no prerequisites and no
/// dependents.
///
/// # Errors
///
/// Returns an error if graph validation fails.
pub fn stats(runner: Arc<dyn CommandRunner>) -> Result<TaskGraph, PipelineValidationError> {
    PipelineBuilder::new("stats")
        .stage(STATS_STAGE, Arc::new(TokeiStage::new(runner)), &[])?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;

    #[test]
    fn test_build_web_order() {
        let graph = build_web(Arc::new(ScriptedRunner::new())).unwrap();

        assert_eq!(graph.execution_order(), ["compile", "bindgen", "optimize"]);
    }

    #[test]
    fn test_run_web_serves_last() {
        let graph = run_web(Arc::new(ScriptedRunner::new())).unwrap();

        assert_eq!(graph.stage_count(), 4);
        assert_eq!(
            graph.execution_order().last().map(String::as_str),
            Some("serve")
        );
    }

    #[test]
    fn test_stats_is_single_stage() {
        let graph = stats(Arc::new(ScriptedRunner::new())).unwrap();
        assert_eq!(graph.execution_order(), ["stats"]);
    }
}
