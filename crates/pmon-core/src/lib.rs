//! pmon-core: shared types, errors, and system constants for pmon
//!
//! This crate provides the foundational pieces used by all pmon sub-crates:
//! - Error types and Result alias
//! - System clock-tick resolution (CLK_TCK)

pub mod error;
pub mod util;

pub use error::{MonitorError, Result};
