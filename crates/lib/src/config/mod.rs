//! Packaging tool configuration.
//!
//! A [`ToolConfig`] says how the external packaging tool is launched for each
//! [`ArchTarget`]. It is loaded once per invocation and handed to the
//! orchestrator by value; nothing here is global.
//!
//! Lookup order for the config file:
//! 1. An explicit path (must exist)
//! 2. `$PYBUILD_CONFIG`
//! 3. `./pybuild.json`
//! 4. `<config_dir>/pybuild/config.json`
//!
//! If none is found the defaults are used. Environment overrides
//! (`PYBUILD_X86_SELECTOR`, `PYBUILD_X64_SELECTOR`, `PYBUILD_LOG_LEVEL`) are
//! applied last.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{ENV_CONFIG, ENV_LOG_LEVEL, ENV_X64_SELECTOR, ENV_X86_SELECTOR, LOCAL_CONFIG_FILE};
use crate::platform::{self, ArchTarget, paths};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {0}")]
  NotFound(PathBuf),

  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("selector for {0} is empty")]
  EmptySelector(ArchTarget),

  #[error("cannot split {var}: unbalanced quotes in {value:?}")]
  Unquote { var: &'static str, value: String },
}

/// Launcher argv prefix for each architecture target.
///
/// The selector is everything that comes before the source path, e.g.
/// `py -3.7-32 -m PyInstaller`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Selectors {
  pub x86: Vec<String>,
  pub x64: Vec<String>,
}

impl Default for Selectors {
  fn default() -> Self {
    Self {
      x86: vec!["py".into(), "-3.7-32".into(), "-m".into(), "PyInstaller".into()],
      x64: vec!["py".into(), "-3.7-64".into(), "-m".into(), "PyInstaller".into()],
    }
  }
}

impl Selectors {
  pub fn get(&self, target: ArchTarget) -> &[String] {
    match target {
      ArchTarget::X86 => &self.x86,
      ArchTarget::X64 => &self.x64,
    }
  }

  pub fn set(&mut self, target: ArchTarget, selector: Vec<String>) {
    match target {
      ArchTarget::X86 => self.x86 = selector,
      ArchTarget::X64 => self.x64 = selector,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
  pub selectors: Selectors,

  /// Value passed to the tool's `--log-level`.
  pub log_level: String,

  /// Suffix the tool gives produced executables.
  pub exe_suffix: String,

  /// Kill the tool if a single pass runs longer than this. `None` waits forever.
  pub timeout_secs: Option<u64>,
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      selectors: Selectors::default(),
      log_level: "ERROR".to_string(),
      exe_suffix: platform::exe_suffix().to_string(),
      timeout_secs: None,
    }
  }
}

impl ToolConfig {
  pub fn timeout(&self) -> Option<Duration> {
    self.timeout_secs.map(Duration::from_secs)
  }

  /// Parse a config from a JSON string.
  pub fn from_json(path: &Path, content: &str) -> Result<Self, ConfigError> {
    serde_json::from_str(content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Load a config file from disk.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
      if source.kind() == io::ErrorKind::NotFound {
        ConfigError::NotFound(path.to_path_buf())
      } else {
        ConfigError::Read {
          path: path.to_path_buf(),
          source,
        }
      }
    })?;
    Self::from_json(path, &content)
  }

  /// Resolve, load and validate the effective config.
  pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    let mut config = match locate(explicit)? {
      Some(path) => {
        debug!(path = %path.display(), "loading config");
        Self::from_file(&path)?
      }
      None => {
        debug!("no config file found, using defaults");
        Self::default()
      }
    };
    config.apply_env()?;
    config.validate()?;
    Ok(config)
  }

  /// Apply `PYBUILD_*` environment overrides.
  ///
  /// Selectors are split into words with shell quoting rules, so a quoted
  /// interpreter path containing spaces stays one argument.
  pub fn apply_env(&mut self) -> Result<(), ConfigError> {
    for (target, var) in [(ArchTarget::X86, ENV_X86_SELECTOR), (ArchTarget::X64, ENV_X64_SELECTOR)] {
      if let Ok(value) = std::env::var(var) {
        let selector = shlex::split(&value).ok_or(ConfigError::Unquote { var, value })?;
        debug!(arch = %target, ?selector, "selector overridden from environment");
        self.selectors.set(target, selector);
      }
    }
    if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
      self.log_level = level;
    }
    Ok(())
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    for target in ArchTarget::ALL {
      if self.selectors.get(target).is_empty() {
        return Err(ConfigError::EmptySelector(target));
      }
    }
    Ok(())
  }
}

fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
  if let Some(path) = explicit {
    if !path.exists() {
      return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    return Ok(Some(path.to_path_buf()));
  }

  if let Some(path) = std::env::var_os(ENV_CONFIG) {
    let path = PathBuf::from(path);
    if !path.exists() {
      return Err(ConfigError::NotFound(path));
    }
    return Ok(Some(path));
  }

  let local = PathBuf::from(LOCAL_CONFIG_FILE);
  if local.is_file() {
    return Ok(Some(local));
  }

  Ok(paths::user_config_file().filter(|path| path.is_file()))
}
