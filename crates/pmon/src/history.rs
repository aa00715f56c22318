//! Thread-safe ordered sample history
//!
//! A minimal single-producer/single-consumer handoff. The producer appends
//! without ever blocking on the consumer; the consumer blocks inside `get`
//! on a condition variable keyed to the write index, so it neither spin-polls
//! (which would waste CPU exactly while measuring another process's CPU) nor
//! misses a sample. The terminal flag and the tail are guarded by the same
//! lock, so a waiting consumer observes "last append" and "terminate"
//! consistently.

use std::sync::{Condvar, Mutex};

/// One measurement of the monitored process
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Normalized CPU usage in percent (may exceed 100 for multi-threaded
    /// processes, and may be negative on counter anomalies)
    pub cpu_percent: f64,
    /// Resident set size in kilobytes
    pub rss_kb: u64,
}

/// End-of-run statistics, computed per metric over the full history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub max: (f64, u64),
    pub min: (f64, u64),
    pub mean: (f64, u64),
}

#[derive(Default)]
struct HistoryInner {
    samples: Vec<Sample>,
    /// Index of the next unread sample; never exceeds samples.len()
    read: usize,
    terminated: bool,
}

/// Append-only, strictly ordered sample log shared between the sampling loop
/// and the reporter.
#[derive(Default)]
pub struct SampleHistory {
    inner: Mutex<HistoryInner>,
    available: Condvar,
}

impl SampleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample to the tail and wake a blocked reader. Never blocks
    /// on the consumer.
    pub fn append(&self, sample: Sample) {
        let mut inner = self.lock();
        inner.samples.push(sample);
        self.available.notify_one();
    }

    /// Next unread sample, in exact append order.
    ///
    /// Blocks until a sample is available past the read cursor or termination
    /// has been signaled with nothing left to drain, in which case this
    /// returns `None` and keeps returning `None` forever. Intended for a
    /// single consumer thread.
    pub fn get(&self) -> Option<Sample> {
        let mut inner = self.lock();
        loop {
            if inner.read < inner.samples.len() {
                let sample = inner.samples[inner.read];
                inner.read += 1;
                return Some(sample);
            }
            if inner.terminated {
                return None;
            }
            // Re-check after every wake; wakeups can be spurious
            inner = self
                .available
                .wait(inner)
                .expect("sample history lock poisoned");
        }
    }

    /// Idempotently mark the history terminated and wake any blocked reader
    pub fn terminate(&self) {
        let mut inner = self.lock();
        inner.terminated = true;
        self.available.notify_all();
    }

    pub fn is_terminated(&self) -> bool {
        self.lock().terminated
    }

    pub fn is_empty(&self) -> bool {
        self.lock().samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().samples.len()
    }

    /// Maximum CPU and RSS over the full history, each taken independently
    pub fn max(&self) -> Option<(f64, u64)> {
        let inner = self.lock();
        Self::fold_stats(&inner.samples, f64::max, std::cmp::max)
    }

    /// Minimum CPU and RSS over the full history, each taken independently
    pub fn min(&self) -> Option<(f64, u64)> {
        let inner = self.lock();
        Self::fold_stats(&inner.samples, f64::min, std::cmp::min)
    }

    /// Mean CPU and RSS over the full history
    pub fn mean(&self) -> Option<(f64, u64)> {
        let inner = self.lock();
        if inner.samples.is_empty() {
            return None;
        }
        let count = inner.samples.len();
        let cpu = inner.samples.iter().map(|s| s.cpu_percent).sum::<f64>() / count as f64;
        let rss = inner.samples.iter().map(|s| s.rss_kb).sum::<u64>() / count as u64;
        Some((cpu, rss))
    }

    /// All three statistics at once, `None` when no samples exist
    pub fn summary(&self) -> Option<RunSummary> {
        Some(RunSummary {
            max: self.max()?,
            min: self.min()?,
            mean: self.mean()?,
        })
    }

    fn fold_stats(
        samples: &[Sample],
        pick_cpu: fn(f64, f64) -> f64,
        pick_rss: fn(u64, u64) -> u64,
    ) -> Option<(f64, u64)> {
        let first = samples.first()?;
        let mut cpu = first.cpu_percent;
        let mut rss = first.rss_kb;
        for sample in &samples[1..] {
            cpu = pick_cpu(cpu, sample.cpu_percent);
            rss = pick_rss(rss, sample.rss_kb);
        }
        Some((cpu, rss))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryInner> {
        self.inner.lock().expect("sample history lock poisoned")
    }
}
