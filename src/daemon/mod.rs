//! Process daemonization and signal handling
//!
//! The dispatch loop itself never depends on process topology: backgrounding
//! is an explicit, optional startup step performed here before the loop is
//! entered, and can be skipped with --foreground.

use anyhow::{Context, Result};
use log::info;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for shutdown requested via signal (SIGTERM/SIGINT/SIGHUP)
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Check if shutdown was requested (SIGTERM, SIGINT, or SIGHUP)
pub fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::Relaxed)
}

extern "C" fn shutdown_signal_handler(_signo: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::Relaxed);
}

/// Set up signal handlers for graceful shutdown (call once at startup).
///
/// Handles SIGTERM (service stop), SIGINT (Ctrl+C), and SIGHUP (terminal
/// hangup). Installed without SA_RESTART: the blocking device read must
/// come back with EINTR so the dispatch loop can observe the shutdown flag.
///
/// SIGCHLD is set to SIG_IGN so backlight command children are reaped by
/// the kernel; the loop never waits on them.
pub fn setup_signal_handlers() -> Result<()> {
    let shutdown = SigAction::new(
        SigHandler::Handler(shutdown_signal_handler),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for sig in [Signal::SIGTERM, Signal::SIGINT, Signal::SIGHUP] {
        unsafe { sigaction(sig, &shutdown) }
            .with_context(|| format!("Cannot install handler for {}", sig))?;
    }

    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    unsafe { sigaction(Signal::SIGCHLD, &ignore) }
        .context("Cannot set SIGCHLD to SIG_IGN")?;

    Ok(())
}

/// Fork into the background: detach from the controlling terminal, chdir to
/// /, and redirect stdio to /dev/null.
pub fn daemonize() -> Result<()> {
    nix::unistd::daemon(false, false).context("Cannot fork into background")?;
    info!("Detached from controlling terminal");
    Ok(())
}
