//! pmon: single-process CPU and memory sampling for Linux
//!
//! Samples one process's CPU usage and resident set size from /proc at a
//! fixed rate. A producer thread reads accounting counters, derives a
//! normalized CPU percentage, and appends each sample to a thread-safe
//! ordered history; a consumer thread drains the history in arrival order
//! for display and computes max/min/mean statistics at the end of the run.
//!
//! # Example
//!
//! ```ignore
//! use pmon::MonitorBuilder;
//! use std::sync::atomic::AtomicBool;
//!
//! let stop = AtomicBool::new(false);
//! let monitor = MonitorBuilder::new(1234)
//!     .rate(2.0)
//!     .duration_secs(10)
//!     .build()?;
//! monitor.run(std::io::stdout(), &stop)?;
//! ```

pub mod cpu;
pub mod history;
pub mod monitor;
pub mod reporter;
pub mod sampler;

// Re-export sub-crate types for convenience
pub use pmon_core::{self as core, MonitorError, Result, util};
pub use pmon_proc::{CounterSnapshot, ProcReader};

pub use history::{RunSummary, Sample, SampleHistory};
pub use monitor::{Monitor, MonitorBuilder, MonitorConfig};
pub use reporter::{OutputFormat, Reporter};
pub use sampler::{Sampler, SamplerState};
