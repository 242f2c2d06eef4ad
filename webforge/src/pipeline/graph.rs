//! Sequential task-graph execution.
//!
//! Stages run one at a time, in a valid topological order over the
//! prerequisite edges. Each stage is awaited to completion before its
//! dependents start; the first failure halts the chain.

use super::StageSpec;
use crate::core::{StageOutput, StageStatus};
use crate::stages::StageContext;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Result of executing a task graph.
#[derive(Debug)]
pub struct PipelineReport {
    /// Per-stage outputs, for the stages that ran.
    pub outputs: HashMap<String, StageOutput>,
    /// Total execution time in milliseconds.
    pub duration_ms: f64,
    /// Whether every executed stage succeeded.
    pub success: bool,
    /// Name of the stage that halted the chain, if any.
    pub failed_stage: Option<String>,
}

impl PipelineReport {
    /// Returns the output of a named stage, if it ran.
    #[must_use]
    pub fn output(&self, stage: &str) -> Option<&StageOutput> {
        self.outputs.get(stage)
    }
}

/// A directed acyclic graph of stages, executed sequentially.
#[derive(Debug)]
pub struct TaskGraph {
    /// The pipeline name.
    name: String,
    /// Stage specifications.
    stages: HashMap<String, StageSpec>,
    /// Execution order (topologically sorted).
    execution_order: Vec<String>,
}

impl TaskGraph {
    /// Creates a new task graph.
    ///
    /// Only reachable through [`crate::pipeline::PipelineBuilder::build`],
    /// which has already validated dependencies and acyclicity.
    #[must_use]
    pub(crate) fn new(
        name: String,
        stages: HashMap<String, StageSpec>,
        stage_order: Vec<String>,
    ) -> Self {
        let execution_order = topological_sort(&stages, &stage_order);

        Self {
            name,
            stages,
            execution_order,
        }
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the execution order.
    #[must_use]
    pub fn execution_order(&self) -> &[String] {
        &self.execution_order
    }

    /// Executes the graph sequentially, fail-fast.
    ///
    /// On the first non-success output the remaining stages are not
    /// invoked and the report carries the failing stage's name. Failures
    /// are not wrapped or retried; the underlying tool has already
    /// written its diagnostics to the user's terminal.
    pub async fn execute(&self, ctx: &StageContext) -> PipelineReport {
        let start = Instant::now();
        let mut outputs = HashMap::new();

        tracing::info!(
            pipeline = %self.name,
            run_id = %ctx.run().run_id,
            order = ?self.execution_order,
            "pipeline started"
        );

        for stage_name in &self.execution_order {
            let Some(spec) = self.stages.get(stage_name) else {
                continue;
            };

            tracing::info!(stage = %stage_name, "stage.started");
            let stage_start = Instant::now();

            let output = spec.runner.execute(ctx).await;
            let stage_duration_ms = stage_start.elapsed().as_secs_f64() * 1000.0;

            match output.status {
                StageStatus::Fail => {
                    tracing::error!(
                        stage = %stage_name,
                        error = output.error.as_deref().unwrap_or("unknown"),
                        duration_ms = stage_duration_ms,
                        "stage.failed"
                    );
                    outputs.insert(stage_name.clone(), output);
                    return PipelineReport {
                        outputs,
                        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
                        success: false,
                        failed_stage: Some(stage_name.clone()),
                    };
                }
                StageStatus::Skip => {
                    tracing::info!(
                        stage = %stage_name,
                        reason = output.skip_reason.as_deref().unwrap_or(""),
                        "stage.skipped"
                    );
                }
                _ => {
                    tracing::info!(
                        stage = %stage_name,
                        duration_ms = stage_duration_ms,
                        "stage.completed"
                    );
                }
            }

            outputs.insert(stage_name.clone(), output);
        }

        PipelineReport {
            outputs,
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
            success: true,
            failed_stage: None,
        }
    }
}

/// Performs topological sort on the stage graph.
fn topological_sort(
    stages: &HashMap<String, StageSpec>,
    stage_order: &[String],
) -> Vec<String> {
    let mut result = Vec::new();
    let mut visited = HashSet::new();

    fn visit(
        node: &str,
        stages: &HashMap<String, StageSpec>,
        visited: &mut HashSet<String>,
        result: &mut Vec<String>,
    ) {
        if visited.contains(node) {
            return;
        }
        visited.insert(node.to_string());

        if let Some(spec) = stages.get(node) {
            for dep in &spec.dependencies {
                visit(dep, stages, visited, result);
            }
        }

        result.push(node.to_string());
    }

    // Visit in insertion order for determinism.
    for name in stage_order {
        visit(name, stages, &mut visited, &mut result);
    }

    result
}
