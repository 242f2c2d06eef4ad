//! Shell-out implementation of [`CommandRunner`].

use super::{CommandRunner, ToolOutcome};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Runs tools as child processes with inherited stdio.
///
/// Stdout and stderr are inherited rather than captured so the underlying
/// tool's diagnostics reach the invoking user verbatim; the orchestrator
/// adds nothing beyond which stage halted the chain.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Creates a new process runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<ToolOutcome> {
        tracing::debug!(program, ?args, cwd = %cwd.display(), "spawning tool");

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        Ok(ToolOutcome {
            success: status.success(),
            code: status.code(),
        })
    }
}
