//! Test utilities for pybuild-lib.
//!
//! This module provides shell helpers and a fake packaging tool: a small
//! `/bin/sh` script that logs every call and produces (or fails to produce)
//! an executable the way PyInstaller would.

use std::path::{Path, PathBuf};

use crate::config::{Selectors, ToolConfig};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

const FAKE_TOOL: &str = r#"
log="$1"; arch="$2"; mode="$3"; ext="$4"
shift 4
echo "$arch $*" >> "$log"
src="$1"
dist="dist"
while [ $# -gt 0 ]; do
  if [ "$1" = "--distpath" ]; then dist="$2"; fi
  shift
done
name=$(basename "$src")
name="${name%.*}"
case "$mode" in
  ok) mkdir -p "$dist" && printf '%s' "$arch" > "$dist/$name$ext" ;;
  fail-artifact) mkdir -p "$dist" && printf '%s' "$arch" > "$dist/$name$ext"; exit 1 ;;
  fail) exit 2 ;;
  hang) exec sleep 30 ;;
  *) ;;
esac
"#;

/// How the fake tool behaves for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeMode {
  /// Writes `<dist>/<name><ext>` and exits 0.
  Ok,
  /// Exits 0 without writing anything.
  Empty,
  /// Exits 2 without writing anything.
  Fail,
  /// Writes the executable but still exits 1.
  FailWithArtifact,
  /// Never exits on its own.
  Hang,
}

impl FakeMode {
  fn as_str(&self) -> &'static str {
    match self {
      Self::Ok => "ok",
      Self::Empty => "empty",
      Self::Fail => "fail",
      Self::FailWithArtifact => "fail-artifact",
      Self::Hang => "hang",
    }
  }
}

/// A fake packaging tool installed in a temp directory.
pub struct FakeTool {
  script: PathBuf,
  log: PathBuf,
}

impl FakeTool {
  pub fn install(dir: &Path) -> Self {
    let script = dir.join("fake_pyinstaller.sh");
    std::fs::write(&script, FAKE_TOOL).unwrap();
    Self {
      script,
      log: dir.join("fake_pyinstaller.log"),
    }
  }

  pub fn selector(&self, arch: &str, mode: FakeMode, ext: &str) -> Vec<String> {
    vec![
      "/bin/sh".to_string(),
      self.script.to_string_lossy().into_owned(),
      self.log.to_string_lossy().into_owned(),
      arch.to_string(),
      mode.as_str().to_string(),
      ext.to_string(),
    ]
  }

  /// Config whose selectors call this fake, producing `.exe` files.
  pub fn config(&self, x86: FakeMode, x64: FakeMode) -> ToolConfig {
    ToolConfig {
      selectors: Selectors {
        x86: self.selector("x86", x86, ".exe"),
        x64: self.selector("x64", x64, ".exe"),
      },
      log_level: "ERROR".to_string(),
      exe_suffix: ".exe".to_string(),
      timeout_secs: None,
    }
  }

  /// One line per invocation: the arch label followed by the tool arguments.
  pub fn calls(&self) -> Vec<String> {
    std::fs::read_to_string(&self.log)
      .map(|log| log.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }
}

/// Sorted file names in `dir`.
pub fn list_dir(dir: &Path) -> Vec<String> {
  let mut names: Vec<String> = std::fs::read_dir(dir)
    .map(|entries| {
      entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
    })
    .unwrap_or_default();
  names.sort();
  names
}
