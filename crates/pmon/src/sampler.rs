//! Sampling loop: paced producer feeding the sample history

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use pmon_core::Result;
use pmon_proc::ProcReader;

use crate::cpu;
use crate::history::{Sample, SampleHistory};

/// Sampler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Not started; no baseline captured yet
    Idle,
    /// Ticking and appending samples
    Running,
    /// No longer appending; the consumer finishes draining
    Draining,
    /// Terminal
    Stopped,
}

/// Producer side of the monitoring pipeline.
///
/// Drives the sampling cadence: on each tick it reads the current accounting
/// counters, derives CPU usage against the previous snapshot, reads resident
/// memory, and appends one complete sample to the history. Any reader failure
/// abandons the loop and drains; a vanished process does not come back.
pub struct Sampler {
    reader: ProcReader,
    interval: Duration,
    /// Remaining ticks, `None` when unbounded (duration = 0)
    remaining: Option<u64>,
    clock_ticks: f64,
    state: SamplerState,
}

impl Sampler {
    pub fn new(
        reader: ProcReader,
        interval: Duration,
        remaining: Option<u64>,
        clock_ticks: f64,
    ) -> Self {
        Self {
            reader,
            interval,
            remaining,
            clock_ticks,
            state: SamplerState::Idle,
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Run the sampling loop until the remaining tick count reaches zero,
    /// the stop flag is raised, or a read fails.
    ///
    /// The history is terminated exactly once on every exit path, so the
    /// consumer always finishes draining. A reader error is returned after
    /// the drain has been signaled.
    pub fn run(&mut self, history: &SampleHistory, stop: &AtomicBool) -> Result<()> {
        let outcome = self.pump(history, stop);

        self.transition(SamplerState::Draining);
        history.terminate();
        self.transition(SamplerState::Stopped);

        if let Err(ref e) = outcome {
            warn!("sampling aborted: {}", e);
        }
        outcome
    }

    fn pump(&mut self, history: &SampleHistory, stop: &AtomicBool) -> Result<()> {
        let mut previous = self.reader.read_counters()?;
        let mut tick_started = Instant::now();
        self.transition(SamplerState::Running);

        let interval_secs = self.interval.as_secs_f64();

        while self.remaining != Some(0) {
            // Hold cadence against execution jitter; an overrun tick starts
            // the next one immediately rather than bursting to catch up.
            if let Some(sleep) = self.interval.checked_sub(tick_started.elapsed()) {
                thread::sleep(sleep);
            }

            if stop.load(Ordering::Relaxed) {
                debug!("stop requested, no new tick started");
                break;
            }

            tick_started = Instant::now();

            let current = self.reader.read_counters()?;
            let cpu_percent = cpu::usage(&previous, &current, interval_secs, self.clock_ticks);
            previous = current;

            let rss_kb = self.reader.read_rss_kb()?;

            history.append(Sample {
                cpu_percent,
                rss_kb,
            });

            if let Some(n) = self.remaining.as_mut() {
                *n -= 1;
            }
        }

        Ok(())
    }

    fn transition(&mut self, next: SamplerState) {
        debug!("sampler {}: {:?} -> {:?}", self.reader.pid(), self.state, next);
        self.state = next;
    }
}
