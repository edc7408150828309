//! Implementation of the default `pybuild <SOURCE>` command.
//!
//! Freezes the source script for both architecture targets and prints one
//! line per target followed by the elapsed time.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use pybuild_lib::build::{AppKind, BuildError, BuildReport, BuildRequest, Orchestrator};
use pybuild_lib::config::ToolConfig;

use super::license::short_license;
use crate::output::{format_elapsed, print_error, print_info, print_stat, print_success, print_warning, symbols};

/// No source was given.
pub const EXIT_MISSING_SOURCE: u8 = 1;
/// The source file does not exist.
pub const EXIT_NOT_FOUND: u8 = 2;
/// `--strict` and at least one target failed.
pub const EXIT_PARTIAL: u8 = 3;

pub struct BuildArgs {
  pub source: PathBuf,
  pub dist: PathBuf,
  pub kind: AppKind,
  pub config: Option<PathBuf>,
  pub timeout: Option<Duration>,
  pub strict: bool,
}

/// Execute the build command.
///
/// Validates the source, loads the packaging tool config and runs both
/// passes. Failed targets are reported but only change the exit code under
/// `--strict`.
pub fn cmd_build(args: &BuildArgs) -> Result<ExitCode> {
  let request = match BuildRequest::new(&args.source, &args.dist, args.kind) {
    Ok(request) => request,
    Err(BuildError::SourceNotFound(path)) => {
      print_error(&format!("File not found: {}", path.display()));
      eprintln!("Run 'pybuild --help' for usage.");
      return Ok(ExitCode::from(EXIT_NOT_FOUND));
    }
    Err(err) => return Err(err).context("Invalid source"),
  };

  let config = ToolConfig::load(args.config.as_deref()).context("Failed to load packaging tool config")?;
  debug!(?config, "resolved packaging tool config");

  let mut orchestrator = Orchestrator::new(config);
  if let Some(timeout) = args.timeout {
    orchestrator = orchestrator.with_timeout(timeout);
  }

  println!("{}", short_license());
  println!();
  print_info(&format!("Compiling {} ({})", request.source().display(), request.kind()));

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(orchestrator.build(&request)).context("Build failed")?;

  println!();
  print_report(&report, args.strict);

  let output_dir = dunce::canonicalize(request.output_dir()).unwrap_or_else(|_| request.output_dir().to_path_buf());
  print_stat("Output", &output_dir.display().to_string());

  println!();
  println!("Completed {}", format_elapsed(report.elapsed));
  println!();

  if args.strict && !report.is_success() {
    return Ok(ExitCode::from(EXIT_PARTIAL));
  }
  Ok(ExitCode::SUCCESS)
}

fn print_report(report: &BuildReport, strict: bool) {
  for outcome in &report.outcomes {
    match &outcome.result {
      Ok(path) => print_success(&format!(
        "{} {} {}",
        outcome.target,
        symbols::ARROW,
        path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
      )),
      Err(err) if strict => print_error(&format!("{}: {}", outcome.target, err)),
      Err(err) => print_warning(&format!("{}: {}", outcome.target, err)),
    }
  }
}
