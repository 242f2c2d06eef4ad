//! # Webforge
//!
//! A build-and-serve pipeline that turns a compiled crate into a
//! browser-deployable WebAssembly bundle and serves it locally for
//! manual verification.
//!
//! The pipeline is a small directed acyclic graph of named stages:
//!
//! - **compile**: `cargo build --release` for the wasm target
//! - **bindgen**: `wasm-bindgen` emitting a web module plus JS glue
//! - **optimize**: `wasm-opt -Oz` rewriting the module in place
//! - **serve**: a static file server over the output directory
//!
//! plus an independent **stats** task. Execution is sequential and
//! fail-fast: a stage runs only after all of its prerequisites
//! succeeded, and the first failure halts the chain.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use webforge::prelude::*;
//! use std::sync::Arc;
//!
//! let config = Arc::new(BuildConfig::from_manifest(".")?);
//! let graph = webforge::tasks::build_web(Arc::new(ProcessRunner::new()))?;
//! let report = graph
//!     .execute(&StageContext::new(RunIdentity::new(), config))
//!     .await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod runner;
pub mod stages;
pub mod tasks;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::BuildConfig;
    pub use crate::core::{ArtifactKind, BuildArtifact, StageOutput, StageStatus};
    pub use crate::errors::{CycleDetectedError, PipelineValidationError, WebforgeError};
    pub use crate::pipeline::{PipelineBuilder, PipelineReport, StageSpec, TaskGraph};
    pub use crate::runner::{CommandRunner, ProcessRunner, ToolOutcome};
    pub use crate::stages::{RunIdentity, Stage, StageContext};
}
