//! Dual-target build orchestration.
//!
//! A run freezes one script twice, once per [`ArchTarget`], and renames each
//! produced executable to an architecture-tagged name:
//!
//! ```text
//! dist/tool.exe -> dist/tool_32.exe   (x86 pass)
//! dist/tool.exe -> dist/tool_64.exe   (x64 pass)
//! ```
//!
//! Passes run strictly one after another in [`ArchTarget::ALL`] order, since
//! both write the same intermediate file. A failed pass does not stop the
//! run; its reason is recorded in the [`BuildReport`].

mod types;

pub use types::*;

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::ToolConfig;
use crate::execute::{ToolExit, ToolInvocation, run_tool};
use crate::platform::ArchTarget;

/// Runs the packaging tool once per target and tags the results.
#[derive(Debug, Clone)]
pub struct Orchestrator {
  config: ToolConfig,
  timeout: Option<Duration>,
}

impl Orchestrator {
  pub fn new(config: ToolConfig) -> Self {
    let timeout = config.timeout();
    Self { config, timeout }
  }

  /// Override the per-pass timeout from the config.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  /// Build every target for `request`.
  ///
  /// Returns `Ok` once both targets were attempted, whether or not either
  /// produced an artifact. Only failing to create the output directory is
  /// fatal.
  pub async fn build(&self, request: &BuildRequest) -> Result<BuildReport, BuildError> {
    let started = Instant::now();

    tokio::fs::create_dir_all(request.output_dir())
      .await
      .map_err(|source| BuildError::CreateOutputDir {
        path: request.output_dir().to_path_buf(),
        source,
      })?;

    let mut report = BuildReport::default();
    for target in ArchTarget::ALL {
      let outcome = self.build_target(request, target).await;
      match &outcome.result {
        Ok(path) => info!(arch = %target, artifact = %path.display(), "target built"),
        Err(err) => warn!(arch = %target, error = %err, "target failed"),
      }
      report.outcomes.push(outcome);
    }

    report.elapsed = started.elapsed();
    Ok(report)
  }

  async fn build_target(&self, request: &BuildRequest, target: ArchTarget) -> TargetOutcome {
    let paths = request.artifact_paths(target, &self.config.exe_suffix);
    let outcome = |tool_exit: Option<ToolExit>, result: Result<PathBuf, TargetError>| TargetOutcome {
      target,
      tool_exit,
      result,
    };

    // Only rename what this pass produced.
    if let Err(err) = remove_stale(&paths.exec).await {
      return outcome(None, Err(err));
    }

    let run = match ToolInvocation::for_target(
      &self.config,
      target,
      request.source(),
      request.output_dir(),
      request.kind(),
    ) {
      Ok(invocation) => run_tool(&invocation, self.timeout).await,
      Err(err) => Err(err),
    };

    if let Err(err) = remove_stale(&paths.tagged).await {
      discard_intermediate(target, &paths.exec).await;
      return outcome(run.ok(), Err(err));
    }

    let exit = match run {
      Ok(exit) => exit,
      Err(err) => {
        // A killed tool may leave a partial executable behind.
        discard_intermediate(target, &paths.exec).await;
        return outcome(None, Err(err.into()));
      }
    };

    if !exit.success {
      warn!(arch = %target, code = ?exit.code, "packaging tool reported failure");
    }

    if !paths.exec.exists() {
      let err = if exit.success {
        TargetError::NoArtifact(paths.exec)
      } else {
        TargetError::ToolFailed { code: exit.code }
      };
      return outcome(Some(exit), Err(err));
    }

    debug!(from = %paths.exec.display(), to = %paths.tagged.display(), "tagging artifact");
    if let Err(source) = tokio::fs::rename(&paths.exec, &paths.tagged).await {
      discard_intermediate(target, &paths.exec).await;
      return outcome(
        Some(exit),
        Err(TargetError::Rename {
          from: paths.exec,
          to: paths.tagged,
          source,
        }),
      );
    }

    outcome(Some(exit), Ok(paths.tagged))
  }
}

/// Drop the untagged executable of a pass that will not be tagged.
async fn discard_intermediate(target: ArchTarget, exec: &Path) {
  if let Err(err) = remove_stale(exec).await {
    warn!(arch = %target, error = %err, "could not clean up after failed pass");
  }
}

/// Remove `path` if it exists.
async fn remove_stale(path: &Path) -> Result<(), TargetError> {
  match tokio::fs::remove_file(path).await {
    Ok(()) => {
      debug!(path = %path.display(), "removed stale file");
      Ok(())
    }
    Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(TargetError::RemoveStale {
      path: path.to_path_buf(),
      source,
    }),
  }
}
