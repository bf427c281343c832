//! Common test infrastructure
//!
//! Shared fixtures for the end-to-end pipeline tests. Tests should only
//! import from this module, not from internal submodules.

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{count_rows, write_archive, write_latin1_source, TestWorkspace};
