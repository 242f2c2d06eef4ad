//! Build artifact record.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The kind of file a stage produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The compiled wasm binary, prior to binding generation.
    WasmBinary,
    /// The web-loadable wasm module emitted by the binding generator.
    WasmModule,
    /// The JavaScript glue/bootstrap module.
    JsGlue,
    /// A textual report (e.g. source statistics).
    Report,
}

/// A file produced or rewritten by a stage, identified by its path.
///
/// Artifacts are regenerated on every run; nothing is retained or
/// versioned between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildArtifact {
    /// The kind of artifact.
    pub kind: ArtifactKind,
    /// Filesystem path of the artifact.
    pub path: PathBuf,
    /// Name of the stage that produced it.
    pub produced_by: String,
    /// Size in bytes, when known at record time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl BuildArtifact {
    /// Creates a new artifact record.
    #[must_use]
    pub fn new(kind: ArtifactKind, path: impl Into<PathBuf>, produced_by: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            produced_by: produced_by.into(),
            size_bytes: None,
        }
    }

    /// Records the on-disk size, if the file is readable.
    #[must_use]
    pub fn with_measured_size(mut self) -> Self {
        self.size_bytes = std::fs::metadata(&self.path).ok().map(|m| m.len());
        self
    }

    /// Returns the artifact path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
