//! Accounting counter reads from the /proc filesystem

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nix::unistd::Pid;
use pmon_core::{MonitorError, Result};

const PROC_ROOT: &str = "/proc";

/// Raw CPU accounting counters for one process, captured at one instant.
///
/// All values are cumulative kernel counters: CPU time in clock ticks for the
/// process itself (`utime`/`stime`) and for its terminated, waited-for
/// children (`cutime`/`cstime`). Usage is always derived from the delta
/// between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// User-mode CPU ticks
    pub utime: u64,
    /// Kernel-mode CPU ticks
    pub stime: u64,
    /// User-mode CPU ticks of terminated children
    pub cutime: u64,
    /// Kernel-mode CPU ticks of terminated children
    pub cstime: u64,
    /// Number of threads in the process
    pub num_threads: u32,
}

impl CounterSnapshot {
    /// Maximum aggregate CPU percentage this many threads can produce
    pub fn cpu_ceiling(&self) -> f64 {
        self.num_threads as f64 * 100.0
    }
}

/// Reader for one process's kernel accounting records.
///
/// Bound to a single PID. Each read opens and closes its own file under the
/// proc root, so no state is cached between calls.
#[derive(Debug, Clone)]
pub struct ProcReader {
    pid: Pid,
    root: PathBuf,
}

impl ProcReader {
    /// Create a reader for the given process
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            root: PathBuf::from(PROC_ROOT),
        }
    }

    /// Create a reader backed by an arbitrary directory tree (for testing)
    #[doc(hidden)]
    pub fn with_root(pid: Pid, root: impl AsRef<Path>) -> Self {
        Self {
            pid,
            root: root.as_ref().to_path_buf(),
        }
    }

    /// PID this reader is bound to
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Check whether the process still has an accounting record
    pub fn exists(&self) -> bool {
        self.proc_path("stat").exists()
    }

    /// Read the current CPU accounting counters from `<pid>/stat`
    pub fn read_counters(&self) -> Result<CounterSnapshot> {
        let content = self.read_proc_file("stat")?;

        // The comm field may contain spaces and parentheses; the fixed-format
        // fields start after the last ')'.
        let rest = match content.rfind(')') {
            Some(idx) => &content[idx + 1..],
            None => {
                return Err(MonitorError::MalformedAccountingData(format!(
                    "no comm delimiter in stat for pid {}",
                    self.pid
                )));
            }
        };

        let fields: Vec<&str> = rest.split_whitespace().collect();
        // Fields counted from state: utime is stat field 14, num_threads 20
        if fields.len() < 18 {
            return Err(MonitorError::MalformedAccountingData(format!(
                "stat for pid {} has {} fields after comm, expected at least 18",
                self.pid,
                fields.len()
            )));
        }

        Ok(CounterSnapshot {
            utime: self.parse_field(fields[11], "utime")?,
            stime: self.parse_field(fields[12], "stime")?,
            cutime: self.parse_field(fields[13], "cutime")?,
            cstime: self.parse_field(fields[14], "cstime")?,
            num_threads: self.parse_field(fields[17], "num_threads")?,
        })
    }

    /// Read the process command name.
    ///
    /// Returns the first NUL-separated token of `<pid>/cmdline`, falling back
    /// to `<pid>/comm` when cmdline is empty (zombies and kernel threads).
    pub fn read_command(&self) -> Result<String> {
        let cmdline = self.read_proc_file("cmdline")?;
        let first = cmdline.split('\0').next().unwrap_or("");
        if !first.is_empty() {
            return Ok(first.to_string());
        }
        let comm = self.read_proc_file("comm")?;
        Ok(comm.trim_end().to_string())
    }

    /// Read the resident set size in kilobytes from `<pid>/smaps_rollup`
    pub fn read_rss_kb(&self) -> Result<u64> {
        let content = self.read_proc_file("smaps_rollup")?;

        for line in content.lines() {
            if let Some(rest) = line.strip_prefix("Rss:") {
                let value = rest.split_whitespace().next().ok_or_else(|| {
                    MonitorError::MalformedAccountingData(format!(
                        "empty Rss entry in smaps_rollup for pid {}",
                        self.pid
                    ))
                })?;
                return self.parse_field(value, "Rss");
            }
        }

        Err(MonitorError::MalformedAccountingData(format!(
            "no Rss entry in smaps_rollup for pid {}",
            self.pid
        )))
    }

    fn proc_path(&self, file: &str) -> PathBuf {
        self.root.join(self.pid.to_string()).join(file)
    }

    fn read_proc_file(&self, file: &str) -> Result<String> {
        let path = self.proc_path(file);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => MonitorError::ProcessNotFound(self.pid.as_raw()),
            io::ErrorKind::PermissionDenied => {
                MonitorError::PermissionDenied(format!("cannot read {}", path.display()))
            }
            _ => MonitorError::Io(e),
        })
    }

    fn parse_field<T: std::str::FromStr>(&self, value: &str, name: &str) -> Result<T> {
        value.parse::<T>().map_err(|_| {
            MonitorError::MalformedAccountingData(format!(
                "invalid {} '{}' for pid {}",
                name, value, self.pid
            ))
        })
    }
}
