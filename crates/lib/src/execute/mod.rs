//! Packaging tool execution.
//!
//! This module launches the external packaging tool for one architecture
//! target and waits for it. It never inspects what the tool produced; that is
//! the orchestrator's job.

pub mod tool;
pub mod types;

pub use tool::{ToolInvocation, run_tool};
pub use types::{ExecuteError, ToolExit};
