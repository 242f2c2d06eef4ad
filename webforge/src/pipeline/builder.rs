//! Pipeline builder with validation.

use super::{StageSpec, TaskGraph};
use crate::errors::{CycleDetectedError, PipelineValidationError};
use crate::stages::Stage;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Builder for creating validated pipelines.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    /// The pipeline name.
    name: String,
    /// The stage specifications.
    stages: HashMap<String, StageSpec>,
    /// Insertion order for stages.
    stage_order: Vec<String>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: HashMap::new(),
            stage_order: Vec::new(),
        }
    }

    /// Adds a stage to the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails (duplicate stage, missing
    /// dependency, cycle).
    pub fn stage(
        mut self,
        name: impl Into<String>,
        runner: Arc<dyn Stage>,
        dependencies: &[&str],
    ) -> Result<Self, PipelineValidationError> {
        let name = name.into();
        let spec = StageSpec::new(&name, runner)
            .with_dependencies(dependencies.iter().map(|s| (*s).to_string()));

        self.add_stage_spec(spec)?;
        Ok(self)
    }

    /// Adds a stage with a specification.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn add_stage_spec(&mut self, spec: StageSpec) -> Result<(), PipelineValidationError> {
        spec.validate()?;

        if self.stages.contains_key(&spec.name) {
            return Err(PipelineValidationError::new(format!(
                "stage '{}' is already defined",
                spec.name
            ))
            .with_stages(vec![spec.name]));
        }

        for dep in &spec.dependencies {
            if !self.stages.contains_key(dep) {
                return Err(PipelineValidationError::new(format!(
                    "stage '{}' depends on unknown stage '{}'",
                    spec.name, dep
                ))
                .with_stages(vec![spec.name.clone(), dep.clone()]));
            }
        }

        self.stage_order.push(spec.name.clone());
        self.stages.insert(spec.name.clone(), spec);

        self.detect_cycles()?;

        Ok(())
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder has no stages.
    pub fn build(self) -> Result<TaskGraph, PipelineValidationError> {
        if self.stages.is_empty() {
            return Err(PipelineValidationError::new("pipeline has no stages"));
        }

        Ok(TaskGraph::new(self.name, self.stages, self.stage_order))
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

    /// Detects cycles in the dependency graph.
    fn detect_cycles(&self) -> Result<(), CycleDetectedError> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for name in self.stages.keys() {
            if !visited.contains(name) {
                if let Some(cycle) = self.dfs_cycle(name, &mut visited, &mut rec_stack, &mut path)
                {
                    return Err(CycleDetectedError::new(cycle));
                }
            }
        }

        Ok(())
    }

    fn dfs_cycle(
        &self,
        node: &str,
        visited: &mut HashSet<String>,
        rec_stack: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        visited.insert(node.to_string());
        rec_stack.insert(node.to_string());
        path.push(node.to_string());

        if let Some(spec) = self.stages.get(node) {
            for dep in &spec.dependencies {
                if !visited.contains(dep) {
                    if let Some(cycle) = self.dfs_cycle(dep, visited, rec_stack, path) {
                        return Some(cycle);
                    }
                } else if rec_stack.contains(dep) {
                    let cycle_start = path.iter().position(|n| n == dep)?;
                    let mut cycle: Vec<String> = path[cycle_start..].to_vec();
                    cycle.push(dep.clone());
                    return Some(cycle);
                }
            }
        }

        path.pop();
        rec_stack.remove(node);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::NoOpStage;

    fn noop(name: &str) -> Arc<dyn Stage> {
        Arc::new(NoOpStage::new(name))
    }

    #[test]
    fn test_builder_creation() {
        let builder = PipelineBuilder::new("build-web");
        assert_eq!(builder.name(), "build-web");
        assert_eq!(builder.stage_count(), 0);
    }

    #[test]
    fn test_builder_add_stage() {
        let builder = PipelineBuilder::new("build-web")
            .stage("compile", noop("compile"), &[])
            .unwrap()
            .stage("bindgen", noop("bindgen"), &["compile"])
            .unwrap();

        assert_eq!(builder.stage_count(), 2);
    }

    #[test]
    fn test_builder_missing_dependency() {
        let result = PipelineBuilder::new("build-web").stage("bindgen", noop("bindgen"), &["compile"]);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown stage"));
    }

    #[test]
    fn test_builder_duplicate_stage() {
        let result = PipelineBuilder::new("build-web")
            .stage("compile", noop("compile"), &[])
            .unwrap()
            .stage("compile", noop("compile"), &[]);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already defined"));
    }

    #[test]
    fn test_builder_empty_build() {
        let result = PipelineBuilder::new("empty").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_build_success() {
        let graph = PipelineBuilder::new("build-web")
            .stage("compile", noop("compile"), &[])
            .unwrap()
            .stage("bindgen", noop("bindgen"), &["compile"])
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(graph.name(), "build-web");
        assert_eq!(graph.stage_count(), 2);
    }
}
