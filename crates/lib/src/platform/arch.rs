use std::fmt;

use serde::{Deserialize, Serialize};

/// CPU word-width targets an executable is frozen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchTarget {
  X86,
  X64,
}

impl ArchTarget {
  /// Every target, in the order the orchestrator builds them
  pub const ALL: [ArchTarget; 2] = [ArchTarget::X86, ArchTarget::X64];

  /// Returns the lowercase string identifier for this target
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86 => "x86",
      Self::X64 => "x64",
    }
  }

  /// Returns the suffix appended to the artifact's base name
  pub fn suffix(&self) -> &'static str {
    match self {
      Self::X86 => "_32",
      Self::X64 => "_64",
    }
  }
}

impl fmt::Display for ArchTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn x86_is_built_first() {
    assert_eq!(ArchTarget::ALL, [ArchTarget::X86, ArchTarget::X64]);
  }

  #[test]
  fn suffixes_encode_word_width() {
    assert_eq!(ArchTarget::X86.suffix(), "_32");
    assert_eq!(ArchTarget::X64.suffix(), "_64");
  }

  #[test]
  fn displays_identifier() {
    assert_eq!(ArchTarget::X86.to_string(), "x86");
    assert_eq!(ArchTarget::X64.to_string(), "x64");
  }
}
