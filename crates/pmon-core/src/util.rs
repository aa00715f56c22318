//! System constants resolved at startup
//!
//! CLK_TCK is resolved once here and passed explicitly to the CPU usage
//! calculation, which keeps that code pure and testable against fixed values.

/// Kernel clock ticks per second (CLK_TCK).
///
/// Falls back to 100.0 if sysconf reports an unusable value, which matches
/// the kernel default on every mainstream architecture.
pub fn clock_ticks_per_second() -> f64 {
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 {
        ticks as f64
    } else {
        100.0
    }
}
