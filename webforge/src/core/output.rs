//! Stage output type with factory methods.

use super::{BuildArtifact, StageStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The output of a stage execution.
///
/// `StageOutput` is immutable once created and provides factory methods
/// for creating outputs with different statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutput {
    /// The status of the stage execution.
    pub status: StageStatus,

    /// Artifacts produced or rewritten by the stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<BuildArtifact>,

    /// Additional metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Error message (for failed executions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Skip reason (for skipped executions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl Default for StageOutput {
    fn default() -> Self {
        Self::ok_empty()
    }
}

impl StageOutput {
    /// Creates a successful output carrying artifacts.
    #[must_use]
    pub fn ok(artifacts: Vec<BuildArtifact>) -> Self {
        Self {
            status: StageStatus::Ok,
            artifacts,
            metadata: HashMap::new(),
            error: None,
            skip_reason: None,
        }
    }

    /// Creates a successful output with no artifacts.
    #[must_use]
    pub fn ok_empty() -> Self {
        Self::ok(Vec::new())
    }

    /// Creates a skip output with a reason.
    #[must_use]
    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Skip,
            artifacts: Vec::new(),
            metadata: HashMap::new(),
            error: None,
            skip_reason: Some(reason.into()),
        }
    }

    /// Creates a failure output with an error message.
    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Fail,
            artifacts: Vec::new(),
            metadata: HashMap::new(),
            error: Some(error.into()),
            skip_reason: None,
        }
    }

    /// Adds artifacts to the output.
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: Vec<BuildArtifact>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Adds a single metadata entry.
    #[must_use]
    pub fn add_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns true if the output indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true if the output indicates failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ArtifactKind;

    #[test]
    fn test_ok_output() {
        let artifact = BuildArtifact::new(ArtifactKind::WasmBinary, "target/app.wasm", "compile");
        let output = StageOutput::ok(vec![artifact]);

        assert_eq!(output.status, StageStatus::Ok);
        assert!(output.is_success());
        assert_eq!(output.artifacts.len(), 1);
    }

    #[test]
    fn test_ok_empty() {
        let output = StageOutput::ok_empty();
        assert_eq!(output.status, StageStatus::Ok);
        assert!(output.artifacts.is_empty());
    }

    #[test]
    fn test_skip_output() {
        let output = StageOutput::skip("nothing to do");
        assert_eq!(output.status, StageStatus::Skip);
        assert_eq!(output.skip_reason, Some("nothing to do".to_string()));
        assert!(output.is_success());
    }

    #[test]
    fn test_fail_output() {
        let output = StageOutput::fail("tool exited with status 1");
        assert_eq!(output.status, StageStatus::Fail);
        assert_eq!(output.error, Some("tool exited with status 1".to_string()));
        assert!(output.is_failure());
    }

    #[test]
    fn test_with_metadata() {
        let output = StageOutput::ok_empty().add_metadata("port", serde_json::json!(4000));
        assert_eq!(output.metadata.get("port"), Some(&serde_json::json!(4000)));
    }

    #[test]
    fn test_serialization() {
        let output = StageOutput::fail("boom");
        let json = serde_json::to_string(&output).unwrap();
        let deserialized: StageOutput = serde_json::from_str(&json).unwrap();

        assert_eq!(output.status, deserialized.status);
        assert_eq!(output.error, deserialized.error);
    }
}
