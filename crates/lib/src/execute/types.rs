//! Types for packaging tool execution.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

use crate::platform::ArchTarget;

/// Errors that can occur while running the packaging tool.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// The configured selector has no program to launch.
  #[error("no packaging tool configured for {0}")]
  EmptySelector(ArchTarget),

  /// The tool could not be started (not installed, not on PATH, ...).
  #[error("failed to launch {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  /// The tool ran past the configured timeout and was killed.
  #[error("{program} did not finish within {timeout:?}")]
  TimedOut { program: String, timeout: Duration },

  /// I/O error while waiting on the child.
  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

/// How the packaging tool exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
  pub success: bool,

  /// Exit code, `None` when the process was terminated by a signal.
  pub code: Option<i32>,
}

impl From<ExitStatus> for ToolExit {
  fn from(status: ExitStatus) -> Self {
    Self {
      success: status.success(),
      code: status.code(),
    }
  }
}
