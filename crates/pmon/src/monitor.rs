//! Monitor orchestration: configuration, validation, and thread wiring

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, info};
use nix::unistd::Pid;
use pmon_core::{util, MonitorError, Result};
use pmon_proc::ProcReader;

use crate::history::SampleHistory;
use crate::reporter::{OutputFormat, Reporter};
use crate::sampler::Sampler;

/// Monitoring run configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Process to monitor
    pub pid: Pid,
    /// Samples per second
    pub rate: f64,
    /// Monitoring duration in seconds; 0 runs until stopped
    pub duration_secs: u64,
    /// Sample line format
    pub format: OutputFormat,
}

impl MonitorConfig {
    /// Validate against the system clock-tick frequency.
    ///
    /// The rate must stay at or below CLK_TCK / 2: beyond that the sampling
    /// interval approaches the counter granularity and successive CPU deltas
    /// stop being statistically meaningful.
    pub fn validate(&self, clock_ticks: f64) -> Result<()> {
        if self.pid.as_raw() <= 0 {
            return Err(MonitorError::InvalidConfig(format!(
                "pid must be positive, got {}",
                self.pid
            )));
        }

        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(MonitorError::InvalidConfig(format!(
                "rate must be a positive number, got {}",
                self.rate
            )));
        }

        let limit = clock_ticks / 2.0;
        if self.rate > limit {
            return Err(MonitorError::InvalidConfig(format!(
                "rate {} exceeds the limit [{}]",
                self.rate, limit
            )));
        }

        Ok(())
    }
}

/// Builder for a monitoring run
pub struct MonitorBuilder {
    config: MonitorConfig,
    proc_root: Option<PathBuf>,
}

impl MonitorBuilder {
    pub fn new(pid: i32) -> Self {
        Self {
            config: MonitorConfig {
                pid: Pid::from_raw(pid),
                rate: 1.0,
                duration_secs: 0,
                format: OutputFormat::Plain,
            },
            proc_root: None,
        }
    }

    /// Samples per second (default 1.0)
    pub fn rate(mut self, rate: f64) -> Self {
        self.config.rate = rate;
        self
    }

    /// Monitoring duration in seconds; 0 runs until stopped (default)
    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.config.duration_secs = secs;
        self
    }

    /// Sample line format (default plain)
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Read process records from an arbitrary directory tree (for testing)
    #[doc(hidden)]
    pub fn proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = Some(root.into());
        self
    }

    /// Validate the configuration and bind to the target process.
    ///
    /// Fails before any sampling begins when the rate exceeds the allowed
    /// ceiling or the process has no readable accounting record.
    pub fn build(self) -> Result<Monitor> {
        let clock_ticks = util::clock_ticks_per_second();
        self.config.validate(clock_ticks)?;

        let reader = match self.proc_root {
            Some(root) => ProcReader::with_root(self.config.pid, root),
            None => ProcReader::new(self.config.pid),
        };

        if !reader.exists() {
            return Err(MonitorError::ProcessNotFound(self.config.pid.as_raw()));
        }

        Ok(Monitor {
            config: self.config,
            clock_ticks,
            reader,
        })
    }
}

/// A validated monitoring run, bound to one process
#[derive(Debug)]
pub struct Monitor {
    config: MonitorConfig,
    clock_ticks: f64,
    reader: ProcReader,
}

impl Monitor {
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run the producer/consumer pair to completion.
    ///
    /// The reporter drains the history on its own thread while the sampling
    /// loop runs on the calling thread; the two share nothing but the
    /// history. Raising `stop` (e.g. from a signal handler) ends the run
    /// after the in-flight tick; the summary is still rendered when at least
    /// one sample was collected. The producer's error, if any, takes
    /// precedence over a reporter failure.
    pub fn run<W>(&self, sink: W, stop: &AtomicBool) -> Result<()>
    where
        W: Write + Send + 'static,
    {
        let command = self.reader.read_command()?;
        info!(
            "monitoring pid {} ({}) at {} Hz",
            self.config.pid, command, self.config.rate
        );

        let interval = Duration::from_secs_f64(1.0 / self.config.rate);
        let ticks = if self.config.duration_secs == 0 {
            None
        } else {
            Some((self.config.duration_secs as f64 * self.config.rate) as u64)
        };
        debug!("interval {:?}, remaining ticks {:?}", interval, ticks);

        let history = Arc::new(SampleHistory::new());

        let printer = {
            let history = Arc::clone(&history);
            let mut reporter = Reporter::new(sink, self.config.format, command);
            thread::spawn(move || reporter.run(&history))
        };

        let mut sampler = Sampler::new(self.reader.clone(), interval, ticks, self.clock_ticks);
        let produced = sampler.run(&history, stop);

        let rendered = printer
            .join()
            .unwrap_or_else(|_| Err(MonitorError::Io(io::Error::other("reporter thread panicked"))));

        produced.and(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pid: i32, rate: f64) -> MonitorConfig {
        MonitorConfig {
            pid: Pid::from_raw(pid),
            rate,
            duration_secs: 0,
            format: OutputFormat::Plain,
        }
    }

    #[test]
    fn rate_at_half_clock_ticks_is_accepted() {
        assert!(config(1, 50.0).validate(100.0).is_ok());
    }

    #[test]
    fn rate_above_half_clock_ticks_is_rejected() {
        let err = config(1, 51.0).validate(100.0).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidConfig(_)));
        assert!(err.to_string().contains("exceeds the limit"));
    }

    #[test]
    fn rate_must_be_positive() {
        assert!(config(1, 0.0).validate(100.0).is_err());
        assert!(config(1, -1.0).validate(100.0).is_err());
        assert!(config(1, f64::NAN).validate(100.0).is_err());
    }

    #[test]
    fn pid_must_be_positive() {
        assert!(config(0, 1.0).validate(100.0).is_err());
        assert!(config(-5, 1.0).validate(100.0).is_err());
    }

    #[test]
    fn builder_applies_defaults() {
        let builder = MonitorBuilder::new(42);
        assert_eq!(builder.config.pid, Pid::from_raw(42));
        assert_eq!(builder.config.rate, 1.0);
        assert_eq!(builder.config.duration_secs, 0);
        assert_eq!(builder.config.format, OutputFormat::Plain);
    }

    #[test]
    fn builder_rejects_missing_process() {
        let tmp = tempfile::tempdir().unwrap();
        let err = MonitorBuilder::new(12345)
            .proc_root(tmp.path())
            .build()
            .unwrap_err();
        assert!(matches!(err, MonitorError::ProcessNotFound(12345)));
    }

    #[test]
    fn builder_rejects_bad_rate_before_touching_the_process() {
        let tmp = tempfile::tempdir().unwrap();
        let err = MonitorBuilder::new(12345)
            .proc_root(tmp.path())
            .rate(-2.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, MonitorError::InvalidConfig(_)));
    }

    #[test]
    fn builder_binds_to_a_live_process() {
        let monitor = MonitorBuilder::new(std::process::id() as i32)
            .rate(2.0)
            .build()
            .unwrap();
        assert_eq!(monitor.config().rate, 2.0);
    }
}
