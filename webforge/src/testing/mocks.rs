//! Mock stages and a scripted command runner.

use crate::core::StageOutput;
use crate::runner::{CommandRunner, ToolOutcome};
use crate::stages::{Stage, StageContext};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A shared, ordered record of stage executions.
///
/// Clone it into several [`MockStage`]s to assert cross-stage ordering.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ExecutionLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Returns all entries in execution order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

/// A mock stage that records executions and returns a configurable output.
#[derive(Debug)]
pub struct MockStage {
    name: String,
    output: Mutex<StageOutput>,
    call_count: Mutex<usize>,
    log: Option<ExecutionLog>,
}

impl MockStage {
    /// Creates a new mock stage with a success output.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: Mutex::new(StageOutput::ok_empty()),
            call_count: Mutex::new(0),
            log: None,
        }
    }

    /// Creates a mock stage that records into a shared execution log.
    #[must_use]
    pub fn with_log(name: impl Into<String>, log: ExecutionLog) -> Self {
        Self {
            name: name.into(),
            output: Mutex::new(StageOutput::ok_empty()),
            call_count: Mutex::new(0),
            log: Some(log),
        }
    }

    /// Sets the output to return.
    pub fn set_output(&self, output: StageOutput) {
        *self.output.lock() = output;
    }

    /// Returns the number of times the stage was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }
}

#[async_trait]
impl Stage for MockStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _ctx: &StageContext) -> StageOutput {
        *self.call_count.lock() += 1;
        if let Some(log) = &self.log {
            log.record(self.name.clone());
        }
        self.output.lock().clone()
    }
}

/// A stage that always fails.
#[derive(Debug)]
pub struct FailingStage {
    name: String,
    error: String,
}

impl FailingStage {
    /// Creates a new failing stage.
    #[must_use]
    pub fn new(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: error.into(),
        }
    }
}

#[async_trait]
impl Stage for FailingStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _ctx: &StageContext) -> StageOutput {
        StageOutput::fail(&self.error)
    }
}

/// One recorded tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The program name.
    pub program: String,
    /// The arguments, in order.
    pub args: Vec<String>,
    /// The working directory.
    pub cwd: PathBuf,
}

type Effect = Box<dyn Fn(&[String]) + Send + Sync>;

/// A [`CommandRunner`] with scripted outcomes per program.
///
/// Programs succeed unless told otherwise. Optional per-program effects
/// let a test fabricate the files a real tool would have written.
#[derive(Default)]
pub struct ScriptedRunner {
    outcomes: Mutex<HashMap<String, std::io::Result<ToolOutcome>>>,
    effects: Mutex<HashMap<String, Effect>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    /// Creates a runner where every program exits zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a non-zero exit for `program`.
    pub fn fail_program(&self, program: impl Into<String>, code: i32) {
        self.outcomes
            .lock()
            .insert(program.into(), Ok(ToolOutcome::failed(code)));
    }

    /// Scripts a spawn failure (tool missing) for `program`.
    pub fn missing_program(&self, program: impl Into<String>) {
        self.outcomes.lock().insert(
            program.into(),
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No such file or directory",
            )),
        );
    }

    /// Registers a side effect run when `program` is invoked, standing in
    /// for the files the real tool would write.
    pub fn on_invoke(
        &self,
        program: impl Into<String>,
        effect: impl Fn(&[String]) + Send + Sync + 'static,
    ) {
        self.effects.lock().insert(program.into(), Box::new(effect));
    }

    /// Returns all recorded invocations in order.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().clone()
    }

    /// Returns the programs invoked, in order.
    #[must_use]
    pub fn programs(&self) -> Vec<String> {
        self.invocations
            .lock()
            .iter()
            .map(|inv| inv.program.clone())
            .collect()
    }
}

impl fmt::Debug for ScriptedRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedRunner")
            .field("invocations", &self.invocations.lock().len())
            .finish()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<ToolOutcome> {
        self.invocations.lock().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        });

        if let Some(effect) = self.effects.lock().get(program) {
            effect(args);
        }

        match self.outcomes.lock().get(program) {
            Some(Ok(outcome)) => Ok(*outcome),
            Some(Err(e)) => Err(std::io::Error::new(e.kind(), e.to_string())),
            None => Ok(ToolOutcome::success()),
        }
    }
}
