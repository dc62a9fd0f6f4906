//! evdev event decoding
//!
//! Reads fixed-size `input_event` records directly from a Linux character
//! device (/dev/input/eventN) and classifies each read into a [`KeyEvent`].
//!
//! A key press arrives as value 1, auto-repeat as value 2 and release as
//! any other value (typically 0). The interval between repeat records is
//! governed by the system-wide key-repeat settings. Records of any category
//! other than `EV_KEY` (sync, relative motion, LEDs, ...) are discarded.
//!
//! The device is opened in blocking mode: when no event is pending, the
//! read suspends the calling thread until data arrives or a signal
//! interrupts it. There is no polling interval and no CPU spin.

#![allow(dead_code)]

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

/// Event category for key/button records
pub(crate) const EV_KEY: u16 = 0x01;

/// evdev keycodes for the brightness keys (linux/input-event-codes.h)
pub const KEY_BRIGHTNESSDOWN: u16 = 224;
pub const KEY_BRIGHTNESSUP: u16 = 225;

/// Size of one raw evdev record
const EVENT_SIZE: usize = std::mem::size_of::<libc::input_event>();

/// Semantic state change of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Pressed,
    Held,
    Released,
}

/// Outcome of one decode attempt.
///
/// Exactly one variant is produced per [`EventDevice::read_key`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// A key-category record was read.
    Key { code: u16, transition: KeyTransition },
    /// Nothing usable right now: the read was interrupted, would have
    /// blocked, or delivered a record of an uninteresting category.
    /// The device remains open; retry policy belongs to the caller.
    Transient,
    /// The device can no longer be read. The handle has already been
    /// closed as a side effect.
    Fatal,
}

/// Handle to an open evdev device node.
///
/// Owned exclusively by the dispatch loop for its lifetime. The inner file
/// is `None` once closed, so `close()` is idempotent and reads after a
/// fatal error are rejected safely.
pub struct EventDevice {
    file: Option<File>,
    path: PathBuf,
}

impl EventDevice {
    /// Open a device node for reading (blocking mode).
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Cannot open event device: {}", path.display()))?;
        info!("Opened input device: {}", path.display());
        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
        })
    }

    /// Wrap an already-open file (pipes in tests, pre-opened fds).
    pub fn from_file(file: File) -> Self {
        Self {
            file: Some(file),
            path: PathBuf::from("<fd>"),
        }
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Read and decode one raw record.
    ///
    /// Performs at most one read(2). On a fatal condition the handle is
    /// closed before returning; callers must not close it a second time
    /// expecting an effect (they may, it is a no-op).
    pub fn read_key(&mut self) -> KeyEvent {
        let Some(file) = self.file.as_ref() else {
            return KeyEvent::Fatal;
        };

        let mut buf = [0u8; EVENT_SIZE];
        let n = unsafe {
            libc::read(
                file.as_raw_fd(),
                buf.as_mut_ptr() as *mut libc::c_void,
                EVENT_SIZE,
            )
        };

        if n < 0 {
            let err = io::Error::last_os_error();
            return match err.raw_os_error() {
                // EWOULDBLOCK aliases EAGAIN on Linux
                Some(libc::EINTR) | Some(libc::EAGAIN) => KeyEvent::Transient,
                _ => {
                    warn!("Read failed on {}: {}", self.path.display(), err);
                    self.close();
                    KeyEvent::Fatal
                }
            };
        }

        if n as usize != EVENT_SIZE {
            // 0 = end of stream (device removed); anything shorter than a
            // full record means the stream is broken either way.
            if n == 0 {
                info!("Input device {} reached end of stream", self.path.display());
            } else {
                warn!(
                    "Short read on {} ({} of {} bytes)",
                    self.path.display(),
                    n,
                    EVENT_SIZE
                );
            }
            self.close();
            return KeyEvent::Fatal;
        }

        decode(&buf)
    }

    /// Close the device. Idempotent: closing an already-closed handle is a
    /// no-op.
    pub fn close(&mut self) {
        if let Some(file) = self.file.take() {
            debug!("Closing input device: {}", self.path.display());
            drop(file);
        }
    }
}

/// Decode one full raw record into a [`KeyEvent`].
fn decode(raw: &[u8; EVENT_SIZE]) -> KeyEvent {
    let ev: libc::input_event =
        unsafe { std::ptr::read_unaligned(raw.as_ptr() as *const libc::input_event) };

    if ev.type_ != EV_KEY {
        return KeyEvent::Transient;
    }

    let transition = match ev.value {
        1 => KeyTransition::Pressed,
        2 => KeyTransition::Held,
        _ => KeyTransition::Released,
    };

    KeyEvent::Key {
        code: ev.code,
        transition,
    }
}
