//! Input handling
//!
//! Reads raw evdev records from a single /dev/input/eventN device node and
//! decodes them into key press/hold/release signals.

pub mod evdev;

pub use evdev::{EventDevice, KeyEvent, KeyTransition, KEY_BRIGHTNESSDOWN, KEY_BRIGHTNESSUP};
