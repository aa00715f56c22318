//! CPU usage derivation from accounting counter deltas

use pmon_proc::CounterSnapshot;

/// Normalized CPU percentage between two counter snapshots.
///
/// Sums the user, kernel, and terminated-children tick deltas over the
/// interval and scales to percent. The result is capped at
/// `100 x current.num_threads`: sampling jitter or a thread-count change
/// between snapshots can push the raw value above what that many threads can
/// physically produce. There is no floor at zero: a counter regression
/// surfaces as negative usage so callers can see the anomaly.
pub fn usage(
    previous: &CounterSnapshot,
    current: &CounterSnapshot,
    interval_secs: f64,
    clock_ticks_per_second: f64,
) -> f64 {
    let delta = (current.utime as i64 - previous.utime as i64)
        + (current.stime as i64 - previous.stime as i64)
        + (current.cutime as i64 - previous.cutime as i64)
        + (current.cstime as i64 - previous.cstime as i64);

    let usage = (delta as f64 / (interval_secs * clock_ticks_per_second)) * 100.0;

    let ceiling = current.cpu_ceiling();
    if usage > ceiling {
        ceiling
    } else {
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(ticks: [u64; 4], threads: u32) -> CounterSnapshot {
        CounterSnapshot {
            utime: ticks[0],
            stime: ticks[1],
            cutime: ticks[2],
            cstime: ticks[3],
            num_threads: threads,
        }
    }

    #[test]
    fn usage_scales_tick_deltas_to_percent() {
        let prev = snapshot([100, 50, 0, 0], 1);
        let curr = snapshot([130, 70, 0, 0], 1);
        // 50 ticks over 1s at 100 ticks/s = 50%
        assert_eq!(usage(&prev, &curr, 1.0, 100.0), 50.0);
    }

    #[test]
    fn usage_includes_children_ticks() {
        let prev = snapshot([0, 0, 10, 10], 1);
        let curr = snapshot([0, 0, 20, 30], 1);
        assert_eq!(usage(&prev, &curr, 1.0, 100.0), 30.0);
    }

    #[test]
    fn usage_is_capped_at_thread_ceiling() {
        let prev = snapshot([0, 0, 0, 0], 1);
        let curr = snapshot([150, 50, 0, 0], 1);
        // 200 ticks over 1s at 100 ticks/s = 200% raw, capped to 100%
        assert_eq!(usage(&prev, &curr, 1.0, 100.0), 100.0);
    }

    #[test]
    fn usage_cap_scales_with_thread_count() {
        let prev = snapshot([0, 0, 0, 0], 4);
        let curr = snapshot([100_000, 0, 0, 0], 4);
        assert_eq!(usage(&prev, &curr, 1.0, 100.0), 400.0);
    }

    #[test]
    fn usage_cap_uses_current_snapshot_threads() {
        let prev = snapshot([0, 0, 0, 0], 8);
        let curr = snapshot([1_000, 0, 0, 0], 2);
        assert_eq!(usage(&prev, &curr, 1.0, 100.0), 200.0);
    }

    #[test]
    fn usage_propagates_negative_deltas() {
        // Counter regression is a data-quality signal, not clamped away
        let prev = snapshot([100, 100, 0, 0], 1);
        let curr = snapshot([80, 90, 0, 0], 1);
        assert_eq!(usage(&prev, &curr, 1.0, 100.0), -30.0);
    }

    #[test]
    fn usage_respects_sub_second_intervals() {
        let prev = snapshot([0, 0, 0, 0], 2);
        let curr = snapshot([10, 0, 0, 0], 2);
        // 10 ticks over 0.1s at 100 ticks/s = 100%
        assert_eq!(usage(&prev, &curr, 0.1, 100.0), 100.0);
    }
}
