//! Key dispatch loop
//!
//! Consumes decoded key events from an [`EventDevice`] until the device
//! fails or a shutdown signal arrives, and fires the brightness action on
//! release of the brightness keys. All other key/transition combinations
//! are ignored.
//!
//! The loop holds no state beyond the device handle. A fatal read is
//! treated as normal completion (the usual cause is the keyboard going
//! away), so the process exits with success in that case.

use log::{debug, info};

use crate::daemon;
use crate::input::{EventDevice, KeyEvent, KeyTransition, KEY_BRIGHTNESSDOWN, KEY_BRIGHTNESSUP};

/// Injected brightness-adjustment capability.
///
/// `delta` is a signed relative percentage. Implementations are
/// fire-and-forget: the loop neither waits for nor inspects the outcome.
pub trait BrightnessAction {
    fn adjust(&mut self, delta: i32);
}

/// Run the dispatch loop until the device reports a fatal condition or a
/// shutdown signal is delivered.
///
/// `step` is the percentage applied per key release: `+step` for
/// brightness-up (keycode 225), `-step` for brightness-down (keycode 224).
/// The device is closed on every exit path.
pub fn run(device: &mut EventDevice, action: &mut dyn BrightnessAction, step: i32) {
    info!("Dispatch loop started (step: {}%)", step);

    loop {
        match device.read_key() {
            KeyEvent::Transient => {
                // A signal interrupts the blocking read and lands here;
                // this is the only place the shutdown flag needs checking.
                if daemon::shutdown_requested() {
                    info!("Shutdown signal received, exiting");
                    break;
                }
            }
            KeyEvent::Key { code, transition } => {
                if transition != KeyTransition::Released {
                    continue;
                }
                match code {
                    KEY_BRIGHTNESSUP => action.adjust(step),
                    KEY_BRIGHTNESSDOWN => action.adjust(-step),
                    other => debug!("Ignoring key {}", other),
                }
            }
            KeyEvent::Fatal => {
                info!("Input device gone, exiting");
                break;
            }
        }
    }

    // The decoder already closed the handle on the fatal path; this is a
    // no-op there and the real close on the signal path.
    device.close();
}
