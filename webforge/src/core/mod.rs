//! Core domain model types for webforge.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - Stage status enum
//! - Stage output type with factory methods
//! - Build artifact records

mod artifact;
mod output;
mod status;

pub use artifact::{ArtifactKind, BuildArtifact};
pub use output::StageOutput;
pub use status::StageStatus;
