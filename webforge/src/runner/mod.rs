//! External tool invocation capability.
//!
//! Every build stage ultimately means "run an external tool with these
//! arguments and interpret the exit code". That capability is behind the
//! [`CommandRunner`] trait so tests can substitute a scripted fake and
//! verify ordering and failure propagation without invoking real
//! toolchains (see `testing::mocks::ScriptedRunner`).

mod process;

pub use process::ProcessRunner;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;

/// The observed result of a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Whether the tool exited with status zero.
    pub success: bool,
    /// The exit code, when the tool exited normally.
    pub code: Option<i32>,
}

impl ToolOutcome {
    /// A zero exit.
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    /// A non-zero exit with the given code.
    #[must_use]
    pub fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
        }
    }

    /// Formats the exit for diagnostics ("status 101" or "signal").
    #[must_use]
    pub fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("status {code}"),
            None => "signal".to_string(),
        }
    }
}

/// Trait for running an external program to completion.
///
/// Implementations block (suspend) for the full duration of the process;
/// there is no streaming consumption of tool output.
#[async_trait]
pub trait CommandRunner: Send + Sync + Debug {
    /// Runs `program` with `args` in `cwd` and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the program cannot be spawned at all
    /// (missing tool, permission denied). A non-zero exit is not an
    /// error at this layer; it is reported in the [`ToolOutcome`].
    async fn run(&self, program: &str, args: &[String], cwd: &Path)
        -> std::io::Result<ToolOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success() {
        let outcome = ToolOutcome::success();
        assert!(outcome.success);
        assert_eq!(outcome.code, Some(0));
    }

    #[test]
    fn test_outcome_describe() {
        assert_eq!(ToolOutcome::failed(101).describe(), "status 101");

        let killed = ToolOutcome {
            success: false,
            code: None,
        };
        assert_eq!(killed.describe(), "signal");
    }
}
