//! Interrupt handling for the sampling loop
//!
//! SIGINT raises a flag that the sampling loop checks before starting a new
//! tick, so Ctrl-C drains the history and still prints the summary instead
//! of tearing the process down mid-sample.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use pmon::{MonitorError, Result};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigint(_: libc::c_int) {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

/// Install the SIGINT handler and return the flag it raises
pub fn install_interrupt_handler() -> Result<&'static AtomicBool> {
    let action = SigAction::new(
        SigHandler::Handler(handle_sigint),
        SaFlags::empty(),
        SigSet::empty(),
    );

    // SAFETY: the handler only touches an AtomicBool, which is async-signal-safe
    unsafe {
        sigaction(Signal::SIGINT, &action)
            .map_err(|e| MonitorError::Io(std::io::Error::other(format!("sigaction: {}", e))))?;
    }

    Ok(&INTERRUPTED)
}
