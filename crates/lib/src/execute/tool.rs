//! Packaging tool invocation.
//!
//! Builds the argument list for one pass and runs it as a child process.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::build::AppKind;
use crate::config::ToolConfig;
use crate::execute::types::{ExecuteError, ToolExit};
use crate::platform::ArchTarget;

/// A fully resolved packaging tool command line for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
  pub target: ArchTarget,
  pub program: String,
  pub args: Vec<OsString>,
}

impl ToolInvocation {
  /// Build the command line for `target`.
  ///
  /// The argument order is fixed: selector, source, `--onefile`,
  /// `--noconsole` (GUI apps only), `--log-level <level>`,
  /// `--distpath <output_dir>`.
  pub fn for_target(
    config: &ToolConfig,
    target: ArchTarget,
    source: &Path,
    output_dir: &Path,
    kind: AppKind,
  ) -> Result<Self, ExecuteError> {
    let (program, selector_args) = config
      .selectors
      .get(target)
      .split_first()
      .ok_or(ExecuteError::EmptySelector(target))?;

    let mut args: Vec<OsString> = selector_args.iter().map(OsString::from).collect();
    args.push(source.as_os_str().to_owned());
    args.push("--onefile".into());
    if kind.suppresses_console() {
      args.push("--noconsole".into());
    }
    args.push("--log-level".into());
    args.push(config.log_level.as_str().into());
    args.push("--distpath".into());
    args.push(output_dir.as_os_str().to_owned());

    Ok(Self {
      target,
      program: program.clone(),
      args,
    })
  }

  /// Human readable command line, for logs.
  pub fn command_line(&self) -> String {
    let mut line = self.program.clone();
    for arg in &self.args {
      line.push(' ');
      line.push_str(&arg.to_string_lossy());
    }
    line
  }
}

/// Run the packaging tool and wait for it to exit.
///
/// The tool's stdout and stderr are inherited so its diagnostics reach the
/// user directly. A non-zero exit is not an error here; the caller decides
/// what it means. With `timeout` set, a tool that runs too long is killed
/// and [`ExecuteError::TimedOut`] is returned.
pub async fn run_tool(invocation: &ToolInvocation, timeout: Option<Duration>) -> Result<ToolExit, ExecuteError> {
  info!(arch = %invocation.target, cmd = %invocation.command_line(), "invoking packaging tool");

  let mut child = Command::new(&invocation.program)
    .args(&invocation.args)
    .stdin(Stdio::null())
    .kill_on_drop(true)
    .spawn()
    .map_err(|source| ExecuteError::Spawn {
      program: invocation.program.clone(),
      source,
    })?;

  let status = match timeout {
    None => child.wait().await?,
    Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
      Ok(status) => status?,
      Err(_) => {
        warn!(arch = %invocation.target, ?limit, "packaging tool timed out, killing it");
        child.kill().await?;
        return Err(ExecuteError::TimedOut {
          program: invocation.program.clone(),
          timeout: limit,
        });
      }
    },
  };

  let exit = ToolExit::from(status);
  debug!(arch = %invocation.target, success = exit.success, code = ?exit.code, "packaging tool exited");
  Ok(exit)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Selectors;

  fn config() -> ToolConfig {
    ToolConfig {
      selectors: Selectors {
        x86: vec!["py".into(), "-3.7-32".into(), "-m".into(), "PyInstaller".into()],
        x64: vec!["pyinstaller64".into()],
      },
      log_level: "ERROR".into(),
      exe_suffix: ".exe".into(),
      timeout_secs: None,
    }
  }

  fn args(invocation: &ToolInvocation) -> Vec<String> {
    invocation.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
  }

  #[test]
  fn gui_invocation_suppresses_console() {
    let invocation = ToolInvocation::for_target(
      &config(),
      ArchTarget::X86,
      Path::new("tool.py"),
      Path::new("dist"),
      AppKind::Gui,
    )
    .unwrap();

    assert_eq!(invocation.program, "py");
    assert_eq!(
      args(&invocation),
      [
        "-3.7-32",
        "-m",
        "PyInstaller",
        "tool.py",
        "--onefile",
        "--noconsole",
        "--log-level",
        "ERROR",
        "--distpath",
        "dist"
      ]
    );
  }

  #[test]
  fn console_invocation_keeps_console() {
    let invocation = ToolInvocation::for_target(
      &config(),
      ArchTarget::X64,
      Path::new("tool.py"),
      Path::new("out"),
      AppKind::Console,
    )
    .unwrap();

    assert_eq!(invocation.program, "pyinstaller64");
    assert_eq!(
      args(&invocation),
      ["tool.py", "--onefile", "--log-level", "ERROR", "--distpath", "out"]
    );
  }

  #[test]
  fn empty_selector_is_an_error() {
    let mut config = config();
    config.selectors.x86.clear();

    let result = ToolInvocation::for_target(
      &config,
      ArchTarget::X86,
      Path::new("tool.py"),
      Path::new("dist"),
      AppKind::Gui,
    );

    assert!(matches!(result, Err(ExecuteError::EmptySelector(ArchTarget::X86))));
  }

  #[test]
  fn command_line_joins_program_and_args() {
    let invocation = ToolInvocation {
      target: ArchTarget::X64,
      program: "pyinstaller".into(),
      args: vec!["a.py".into(), "--onefile".into()],
    };
    assert_eq!(invocation.command_line(), "pyinstaller a.py --onefile");
  }

  #[cfg(unix)]
  mod process {
    use super::*;
    use crate::util::testutil::shell_cmd;

    fn shell(script: &str) -> ToolInvocation {
      let (program, args) = shell_cmd(script);
      ToolInvocation {
        target: ArchTarget::X86,
        program: program.to_string(),
        args: args.into_iter().map(OsString::from).collect(),
      }
    }

    #[tokio::test]
    async fn reports_success() {
      let exit = run_tool(&shell("exit 0"), None).await.unwrap();
      assert_eq!(exit, ToolExit { success: true, code: Some(0) });
    }

    #[tokio::test]
    async fn reports_failure_code_without_erroring() {
      let exit = run_tool(&shell("exit 3"), None).await.unwrap();
      assert!(!exit.success);
      assert_eq!(exit.code, Some(3));
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
      let invocation = ToolInvocation {
        target: ArchTarget::X64,
        program: "/nonexistent/pyinstaller".into(),
        args: vec![],
      };
      let result = run_tool(&invocation, None).await;
      assert!(matches!(result, Err(ExecuteError::Spawn { .. })));
    }

    #[tokio::test]
    async fn kills_tool_after_timeout() {
      let result = run_tool(&shell("exec sleep 30"), Some(Duration::from_millis(200))).await;
      assert!(matches!(result, Err(ExecuteError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn fast_tool_finishes_within_timeout() {
      let exit = run_tool(&shell("exit 0"), Some(Duration::from_secs(30))).await.unwrap();
      assert!(exit.success);
    }
  }
}
