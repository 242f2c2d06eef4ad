//! Pipeline building and execution.
//!
//! This module provides:
//! - Stage specifications with declared prerequisites
//! - A pipeline builder with validation
//! - A sequential, fail-fast task-graph executor

mod builder;
mod graph;
mod spec;

#[cfg(test)]
mod integration_tests;

pub use builder::PipelineBuilder;
pub use graph::{PipelineReport, TaskGraph};
pub use spec::StageSpec;
