//! Shared utilities.
//!
//! Test helpers for driving a stand-in packaging tool.

#[cfg(test)]
pub mod testutil;
