//! Configuration file management
//!
//! Loads TOML configuration files and provides application settings.
//! Default config path: ~/.config/backlightd/config.toml
//!
//! Only the surrounding behavior is configurable (which command to run,
//! how big a step, whether to background). The brightness keys themselves
//! are fixed hardware keycodes and deliberately not configurable.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backlight command settings
    pub backlight: BacklightConfig,
    /// Daemon behavior settings
    pub daemon: DaemonConfig,
}

/// Backlight command settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklightConfig {
    /// External command invoked with a signed percentage argument
    pub command: String,
    /// Percentage step per brightness key release
    pub step: i32,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        Self {
            command: "setbacklight".to_string(),
            step: 10,
        }
    }
}

/// Daemon behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Fork into the background after opening the device
    /// (overridden by --foreground)
    pub daemonize: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self { daemonize: true }
    }
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/backlightd/config.toml";

    /// Get the path that would be used for loading config.
    /// Returns None if using built-in defaults.
    pub fn config_path() -> Option<PathBuf> {
        // 1. BACKLIGHTD_CONFIG environment variable
        if let Ok(path) = std::env::var("BACKLIGHTD_CONFIG") {
            let p = std::path::Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/backlightd/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("backlightd").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/backlightd/config.toml
        let system_config = std::path::Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. BACKLIGHTD_CONFIG environment variable
    /// 2. ~/.config/backlightd/config.toml (user config)
    /// 3. /etc/backlightd/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(path.to_string_lossy().as_ref()) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.backlight.command, "setbacklight");
        assert_eq!(cfg.backlight.step, 10);
        assert!(cfg.daemon.daemonize);
    }

    #[test]
    fn test_parse_full_config() {
        let cfg: Config = toml::from_str(
            r#"
            [backlight]
            command = "brightnessctl-wrapper"
            step = 5

            [daemon]
            daemonize = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.backlight.command, "brightnessctl-wrapper");
        assert_eq!(cfg.backlight.step, 5);
        assert!(!cfg.daemon.daemonize);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [backlight]
            step = 20
            "#,
        )
        .unwrap();
        assert_eq!(cfg.backlight.command, "setbacklight");
        assert_eq!(cfg.backlight.step, 20);
        assert!(cfg.daemon.daemonize);
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.backlight.step, 10);
    }
}
