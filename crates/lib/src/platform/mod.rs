pub mod arch;
pub mod paths;

pub use arch::ArchTarget;

/// Returns the suffix the host OS gives native executables.
///
/// `.exe` on Windows, empty everywhere else.
pub fn exe_suffix() -> &'static str {
  std::env::consts::EXE_SUFFIX
}
