mod build;
mod license;

pub use build::{BuildArgs, EXIT_MISSING_SOURCE, cmd_build};
pub use license::cmd_license;
