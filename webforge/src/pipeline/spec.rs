//! Stage specification: a named unit of work plus its prerequisites.

use crate::errors::PipelineValidationError;
use crate::stages::Stage;
use std::collections::HashSet;
use std::sync::Arc;

/// Specification for a single stage in a pipeline.
///
/// The dependency edges are data: inserting a new stage between two
/// existing ones means declaring a node and its edges, not editing
/// control flow.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// The unique name of the stage.
    pub name: String,
    /// The stage implementation.
    pub runner: Arc<dyn Stage>,
    /// Names of stages that must succeed before this one runs.
    pub dependencies: HashSet<String>,
}

impl StageSpec {
    /// Creates a new stage specification.
    #[must_use]
    pub fn new(name: impl Into<String>, runner: Arc<dyn Stage>) -> Self {
        Self {
            name: name.into(),
            runner,
            dependencies: HashSet::new(),
        }
    }

    /// Adds a dependency.
    #[must_use]
    pub fn with_dependency(mut self, dep: impl Into<String>) -> Self {
        self.dependencies.insert(dep.into());
        self
    }

    /// Sets the dependencies.
    #[must_use]
    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the stage specification.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage depends on itself.
    pub fn validate(&self) -> Result<(), PipelineValidationError> {
        if self.dependencies.contains(&self.name) {
            return Err(PipelineValidationError::new(format!(
                "stage '{}' cannot depend on itself",
                self.name
            ))
            .with_stages(vec![self.name.clone()]));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::NoOpStage;

    #[test]
    fn test_spec_creation() {
        let spec = StageSpec::new("bindgen", Arc::new(NoOpStage::new("bindgen")))
            .with_dependencies(["compile"]);

        assert_eq!(spec.name, "bindgen");
        assert!(spec.dependencies.contains("compile"));
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_self_dependency_rejected() {
        let spec = StageSpec::new("compile", Arc::new(NoOpStage::new("compile")))
            .with_dependency("compile");

        assert!(spec.validate().is_err());
    }
}
