//! External backlight adjustment
//!
//! The actual brightness change is delegated to an external command (e.g.
//! a setbacklight script) invoked with a single signed percentage argument
//! such as `+10` or `-10`. The command runs detached; its exit status is
//! never inspected and children are reaped by the kernel (SIGCHLD is
//! ignored at startup).

use log::{debug, warn};
use std::process::Command;

use crate::dispatch::BrightnessAction;

/// Brightness action that shells out to a configured command.
pub struct BacklightCommand {
    program: String,
}

impl BacklightCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

/// Format the signed percentage argument (`+10`, `-10`).
fn delta_arg(delta: i32) -> String {
    format!("{:+}", delta)
}

impl BrightnessAction for BacklightCommand {
    fn adjust(&mut self, delta: i32) {
        let arg = delta_arg(delta);
        debug!("Running: {} {}", self.program, arg);
        // Fire and forget: a failing command must not affect the loop
        if let Err(e) = Command::new(&self.program).arg(&arg).spawn() {
            warn!("Cannot run {} {}: {}", self.program, arg, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_arg_carries_explicit_sign() {
        assert_eq!(delta_arg(10), "+10");
        assert_eq!(delta_arg(-10), "-10");
        assert_eq!(delta_arg(5), "+5");
        assert_eq!(delta_arg(0), "+0");
    }

    #[test]
    fn test_missing_command_does_not_panic() {
        let mut action = BacklightCommand::new("/nonexistent/backlightd-test-cmd");
        action.adjust(10);
        action.adjust(-10);
    }
}
