//! pybuild-lib: Core types and logic for pybuild
//!
//! This crate freezes one script into two native executables, one per CPU
//! word width, by driving an external packaging tool:
//! - `ArchTarget`: the 32-bit and 64-bit targets and their filename suffixes
//! - `ToolConfig`: how the packaging tool is launched for each target
//! - `Orchestrator`: runs both passes and renames the produced artifacts
//! - `BuildReport`: per-target outcome of a run

pub mod build;
pub mod config;
pub mod consts;
pub mod execute;
pub mod platform;
pub mod util;
