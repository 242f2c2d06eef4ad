//! Error types for the webforge pipeline.
//!
//! Every failure in the build chain is fatal and unrecovered: the chain
//! halts at the failing stage and the underlying tool's diagnostics are
//! surfaced verbatim. The only non-fatal class is [`WebforgeError::Stats`],
//! which nothing else depends on.

use thiserror::Error;

/// The main error type for webforge operations.
#[derive(Debug, Error)]
pub enum WebforgeError {
    /// Compiler tool missing, misconfigured, or the source failed to build.
    #[error("toolchain failure: {0}")]
    Toolchain(String),

    /// Binding tool missing or unable to process the compiled artifact.
    #[error("binding failure: {0}")]
    Binding(String),

    /// Optimizer tool missing or the input module was invalid.
    #[error("optimization failure: {0}")]
    Optimization(String),

    /// Dev server could not start (port in use, output directory missing).
    #[error("server start failure: {0}")]
    ServerStart(String),

    /// Stats reporting failed. Non-fatal to the rest of the system.
    #[error("stats failure: {0}")]
    Stats(String),

    /// A pipeline validation error occurred.
    #[error("{0}")]
    Validation(#[from] PipelineValidationError),

    /// A cycle was detected in the pipeline graph.
    #[error("{0}")]
    CycleDetected(#[from] CycleDetectedError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised when pipeline construction fails validation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
}

impl PipelineValidationError {
    /// Creates a new pipeline validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }
}

/// Error raised when a cycle is detected in the pipeline graph.
#[derive(Debug, Clone, Error)]
#[error("cycle detected in pipeline: {}", cycle_path.join(" -> "))]
pub struct CycleDetectedError {
    /// The path of stages forming the cycle.
    pub cycle_path: Vec<String>,
}

impl CycleDetectedError {
    /// Creates a new cycle detected error.
    #[must_use]
    pub fn new(cycle_path: Vec<String>) -> Self {
        Self { cycle_path }
    }
}

impl From<CycleDetectedError> for PipelineValidationError {
    fn from(err: CycleDetectedError) -> Self {
        Self {
            message: err.to_string(),
            stages: err.cycle_path,
        }
    }
}
