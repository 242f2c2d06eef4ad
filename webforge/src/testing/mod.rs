//! Test doubles for pipeline tests.
//!
//! These are shipped in the library (not behind `cfg(test)`) so
//! downstream integration tests can drive the real task graphs with fake
//! stages and fake tools.

mod mocks;

pub use mocks::{
    ExecutionLog, FailingStage, Invocation, MockStage, ScriptedRunner,
};
