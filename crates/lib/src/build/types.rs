//! Types for the dual-target build.
//!
//! This module defines the request a run is driven by, the per-target
//! outcome it records and the fatal errors that stop a run before any pass.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::SCRIPT_EXTENSION;
use crate::execute::{ExecuteError, ToolExit};
use crate::platform::ArchTarget;

/// Whether the frozen program should get a console window.
///
/// Replaces a bare "has GUI" flag whose polarity was easy to get backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
  /// Command-line program: keep the console window.
  Console,
  /// Windowed program: ask the tool to suppress the console (`--noconsole`).
  Gui,
}

impl AppKind {
  pub fn suppresses_console(self) -> bool {
    matches!(self, AppKind::Gui)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      AppKind::Console => "console",
      AppKind::Gui => "gui",
    }
  }
}

impl fmt::Display for AppKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Errors that stop a run before or between passes.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The source script does not exist.
  #[error("source file not found: {0}")]
  SourceNotFound(PathBuf),

  /// The source path has no file name to derive the executable name from.
  #[error("cannot derive an executable name from {0}")]
  InvalidSource(PathBuf),

  /// The output directory could not be created.
  #[error("failed to create output directory {path}: {source}")]
  CreateOutputDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Why a single target produced no tagged artifact.
#[derive(Debug, Error)]
pub enum TargetError {
  /// The tool could not be launched or was killed.
  #[error(transparent)]
  Execute(#[from] ExecuteError),

  /// The tool exited unsuccessfully and left nothing behind.
  #[error("packaging tool exited with code {code:?} and produced no executable")]
  ToolFailed { code: Option<i32> },

  /// The tool exited cleanly but the expected executable is missing.
  #[error("packaging tool produced no executable at {0}")]
  NoArtifact(PathBuf),

  /// A leftover file from an earlier run could not be removed.
  #[error("failed to remove stale {path}: {source}")]
  RemoveStale {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The produced executable could not be renamed to its tagged name.
  #[error("failed to rename {from} to {to}: {source}")]
  Rename {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// File locations for one target's pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
  /// Where the tool writes its output (`<dist>/<base><ext>`).
  pub exec: PathBuf,
  /// Final architecture-tagged name (`<dist>/<base>_32<ext>`).
  pub tagged: PathBuf,
}

/// Input for a single dual-target run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
  source: PathBuf,
  output_dir: PathBuf,
  kind: AppKind,
  base_name: String,
}

impl BuildRequest {
  /// Validate the source and build a request.
  ///
  /// Fails with [`BuildError::SourceNotFound`] when the source is missing.
  /// A source given without an extension falls back to `<source>.py`.
  pub fn new(source: impl AsRef<Path>, output_dir: impl Into<PathBuf>, kind: AppKind) -> Result<Self, BuildError> {
    let given = source.as_ref();
    let resolved = Self::resolve_source(given).ok_or_else(|| BuildError::SourceNotFound(given.to_path_buf()))?;
    let source = dunce::canonicalize(&resolved).map_err(|_| BuildError::SourceNotFound(resolved.clone()))?;

    let base_name = source
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .filter(|stem| !stem.is_empty())
      .ok_or_else(|| BuildError::InvalidSource(source.clone()))?;

    Ok(Self {
      source,
      output_dir: output_dir.into(),
      kind,
      base_name,
    })
  }

  /// Find the script a user meant: the path itself, or `<path>.py` when the
  /// path has no extension.
  pub fn resolve_source(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
      return Some(path.to_path_buf());
    }
    if path.extension().is_none() {
      let with_ext = path.with_extension(SCRIPT_EXTENSION);
      if with_ext.is_file() {
        return Some(with_ext);
      }
    }
    None
  }

  pub fn source(&self) -> &Path {
    &self.source
  }

  pub fn output_dir(&self) -> &Path {
    &self.output_dir
  }

  pub fn kind(&self) -> AppKind {
    self.kind
  }

  /// Source file name without its extension.
  pub fn base_name(&self) -> &str {
    &self.base_name
  }

  pub fn artifact_paths(&self, target: ArchTarget, exe_suffix: &str) -> ArtifactPaths {
    ArtifactPaths {
      exec: self.output_dir.join(format!("{}{}", self.base_name, exe_suffix)),
      tagged: self
        .output_dir
        .join(format!("{}{}{}", self.base_name, target.suffix(), exe_suffix)),
    }
  }
}

/// Result of one target's pass.
#[derive(Debug)]
pub struct TargetOutcome {
  pub target: ArchTarget,

  /// How the tool exited; `None` if it never ran to completion.
  pub tool_exit: Option<ToolExit>,

  /// The tagged artifact on success.
  pub result: Result<PathBuf, TargetError>,
}

impl TargetOutcome {
  pub fn is_success(&self) -> bool {
    self.result.is_ok()
  }

  pub fn artifact(&self) -> Option<&Path> {
    self.result.as_ref().ok().map(PathBuf::as_path)
  }

  pub fn error(&self) -> Option<&TargetError> {
    self.result.as_ref().err()
  }
}

/// Aggregate result of a dual-target run.
///
/// Every target is attempted; the caller decides whether a partial failure
/// is fatal.
#[derive(Debug, Default)]
pub struct BuildReport {
  /// One entry per target, in build order.
  pub outcomes: Vec<TargetOutcome>,

  /// Wall-clock duration of the whole run.
  pub elapsed: Duration,
}

impl BuildReport {
  pub fn is_success(&self) -> bool {
    self.outcomes.iter().all(TargetOutcome::is_success)
  }

  pub fn outcome(&self, target: ArchTarget) -> Option<&TargetOutcome> {
    self.outcomes.iter().find(|o| o.target == target)
  }

  pub fn built(&self) -> impl Iterator<Item = (ArchTarget, &Path)> {
    self
      .outcomes
      .iter()
      .filter_map(|o| o.artifact().map(|path| (o.target, path)))
  }

  pub fn failures(&self) -> impl Iterator<Item = &TargetOutcome> {
    self.outcomes.iter().filter(|o| !o.is_success())
  }
}
