/// Application name used for config directories and environment prefixes.
pub const APP_NAME: &str = "pybuild";

/// Output directory used when none is given, relative to the invocation directory.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Config file looked up in the invocation directory.
pub const LOCAL_CONFIG_FILE: &str = "pybuild.json";

/// Config file looked up in the user config directory.
pub const USER_CONFIG_FILE: &str = "config.json";

/// Extension tried when the source is given without one.
pub const SCRIPT_EXTENSION: &str = "py";

pub const ENV_CONFIG: &str = "PYBUILD_CONFIG";
pub const ENV_X86_SELECTOR: &str = "PYBUILD_X86_SELECTOR";
pub const ENV_X64_SELECTOR: &str = "PYBUILD_X64_SELECTOR";
pub const ENV_LOG_LEVEL: &str = "PYBUILD_LOG_LEVEL";
