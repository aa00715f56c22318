//! pmon-proc: per-process accounting data from /proc
//!
//! Reads the kernel-exposed accounting counters, command name, and resident
//! set size for a single process. Every read opens and closes its own file,
//! so each call reflects the instantaneous kernel state.

pub mod reader;

pub use reader::{CounterSnapshot, ProcReader};
