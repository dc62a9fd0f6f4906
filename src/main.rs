//! backlightd - brightness hotkey daemon for the Linux console
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │          CLI / daemonization             │
//! ├──────────────────────────────────────────┤
//! │  Dispatch Loop  ←  Decoder (evdev)       │
//! │        ↓               ↑                 │
//! │  Backlight cmd    /dev/input/eventN      │
//! └──────────────────────────────────────────┘
//! ```

mod backlight;
mod config;
mod daemon;
mod dispatch;
mod input;

use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

const USAGE: &str = "usage: backlightd [OPTIONS] /dev/input/eventX";

/// Parsed command line
enum Cli {
    Help,
    Version,
    Run(RunOpts),
}

struct RunOpts {
    device: PathBuf,
    foreground: bool,
}

fn parse_args(args: &[String]) -> std::result::Result<Cli, String> {
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(Cli::Help);
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        return Ok(Cli::Version);
    }

    let foreground = args.iter().any(|a| a == "--foreground" || a == "-f");

    let mut device = None;
    for arg in args {
        if arg == "--foreground" || arg == "-f" {
            continue;
        }
        if arg.starts_with('-') {
            return Err(format!("unknown option: {}", arg));
        }
        if device.is_some() {
            return Err("too many arguments".to_string());
        }
        device = Some(PathBuf::from(arg));
    }

    match device {
        Some(device) => Ok(Cli::Run(RunOpts { device, foreground })),
        None => Err("missing device path".to_string()),
    }
}

/// Print help message
fn print_help() {
    println!(
        r#"backlightd {} - brightness hotkey daemon for the Linux console

USAGE:
    backlightd [OPTIONS] /dev/input/eventX

OPTIONS:
    -h, --help        Print this help message
    -V, --version     Print version information
    -f, --foreground  Stay in the foreground (do not daemonize)

The device argument is the keyboard event node carrying the brightness
keys (keycodes 224/225). On key release, backlightd runs the configured
backlight command with a signed percentage argument ("setbacklight +10"
by default).

CONFIG FILE:
    ~/.config/backlightd/config.toml
"#,
        env!("CARGO_PKG_VERSION")
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(Cli::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Cli::Version) => {
            println!("backlightd {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Ok(Cli::Run(opts)) => opts,
        Err(msg) => {
            eprintln!("backlightd: {}", msg);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    info!("backlightd starting...");
    let cfg = config::Config::load();

    // Open the device before forking so an open failure still reaches the
    // user's terminal with a non-zero exit status.
    let mut device = input::EventDevice::open(&opts.device)?;

    daemon::setup_signal_handlers().context("Failed to set up signal handlers")?;

    if !opts.foreground && cfg.daemon.daemonize {
        daemon::daemonize()?;
    } else {
        info!("Running in the foreground");
    }

    let mut action = backlight::BacklightCommand::new(&cfg.backlight.command);
    dispatch::run(&mut device, &mut action, cfg.backlight.step);

    info!("backlightd exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_device_is_an_error() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--foreground"])).is_err());
    }

    #[test]
    fn test_device_path_parsed() {
        match parse_args(&args(&["/dev/input/event3"])) {
            Ok(Cli::Run(opts)) => {
                assert_eq!(opts.device, PathBuf::from("/dev/input/event3"));
                assert!(!opts.foreground);
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn test_foreground_flag() {
        match parse_args(&args(&["-f", "/dev/input/event3"])) {
            Ok(Cli::Run(opts)) => assert!(opts.foreground),
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn test_help_wins_over_everything() {
        assert!(matches!(
            parse_args(&args(&["/dev/input/event3", "--help"])),
            Ok(Cli::Help)
        ));
        assert!(matches!(parse_args(&args(&["-V"])), Ok(Cli::Version)));
    }

    #[test]
    fn test_unknown_option_rejected() {
        assert!(parse_args(&args(&["--bogus", "/dev/input/event3"])).is_err());
    }

    #[test]
    fn test_extra_positional_rejected() {
        assert!(parse_args(&args(&["/dev/input/event3", "/dev/input/event4"])).is_err());
    }
}
