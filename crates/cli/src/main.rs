mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgAction, CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use pybuild_lib::build::AppKind;
use pybuild_lib::consts::DEFAULT_DIST_DIR;

use cmd::{BuildArgs, EXIT_MISSING_SOURCE, cmd_build, cmd_license};
use output::print_error;

fn app_kind(value: String) -> AppKind {
  match value.as_str() {
    "console" => AppKind::Console,
    _ => AppKind::Gui,
  }
}

/// A Python script compiler: freezes a script into 32-bit and 64-bit executables
#[derive(Parser)]
#[command(name = "pybuild")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
  /// Script to compile (".py" is tried when the name has no extension)
  #[arg(value_name = "SOURCE", conflicts_with = "source_opt")]
  source: Option<PathBuf>,

  /// Script to compile, as an option
  #[arg(short = 's', long = "source", value_name = "SOURCE")]
  source_opt: Option<PathBuf>,

  /// Kind of program being frozen ("gui" passes --noconsole to the tool)
  #[arg(
    short,
    long,
    default_value_t = AppKind::Gui,
    value_parser = PossibleValuesParser::new(["console", "gui"]).map(app_kind),
  )]
  kind: AppKind,

  /// Output directory for the tagged executables
  #[arg(short, long, default_value = DEFAULT_DIST_DIR)]
  dist: PathBuf,

  /// Packaging tool config file (JSON)
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Kill a pass that runs longer than this (e.g. "10m")
  #[arg(short, long, value_parser = humantime::parse_duration)]
  timeout: Option<Duration>,

  /// Exit with status 3 if any target failed
  #[arg(long)]
  strict: bool,

  /// Print the software license
  #[arg(short, long)]
  license: bool,

  /// Print version
  #[arg(short = 'v', short_alias = 'V', long, action = ArgAction::Version)]
  version: Option<bool>,

  /// Enable verbose output
  #[arg(long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if cli.license {
    cmd_license();
    return ExitCode::SUCCESS;
  }

  let Some(source) = cli.source.or(cli.source_opt) else {
    println!();
    // Best effort; nothing useful to do if stdout is gone.
    let _ = Cli::command().print_help();
    return ExitCode::from(EXIT_MISSING_SOURCE);
  };

  let args = BuildArgs {
    source,
    dist: cli.dist,
    kind: cli.kind,
    config: cli.config,
    timeout: cli.timeout,
    strict: cli.strict,
  };

  match cmd_build(&args) {
    Ok(code) => code,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
