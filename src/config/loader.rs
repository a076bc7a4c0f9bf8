//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::source::DEFAULT_BAUD_RATE;

/// Maximum number of quick-send commands (one per key `1`-`9`).
pub const MAX_QUICK_SEND: usize = 9;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/serlog/config.toml`.
///
/// ```toml
/// port = "/dev/ttyUSB0"
/// baud_rate = 115200
/// timestamps = true
/// export_dir = "/home/me/reports"
/// share_command = "xdg-open"
/// quick_send = ["1", "2", "status"]
/// append_newline = false
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Serial port to open when neither `--port` nor `--file` is given.
    #[serde(default)]
    pub port: Option<String>,

    /// Serial baud rate.
    #[serde(default)]
    pub baud_rate: Option<u32>,

    /// Timestamp new lines on startup.
    #[serde(default)]
    pub timestamps: Option<bool>,

    /// Directory exported documents are written to.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Command run with the exported file path appended.
    ///
    /// Split on whitespace with no shell quoting, so neither the program nor
    /// its arguments may contain spaces. Wrap anything fancier in a script.
    #[serde(default)]
    pub share_command: Option<String>,

    /// Commands bound to keys `1`-`9`, in order.
    #[serde(default)]
    pub quick_send: Option<Vec<String>>,

    /// Append `\n` to every sent command.
    #[serde(default)]
    pub append_newline: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Configured serial port, if any.
    pub port: Option<String>,
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Timestamp new lines on startup.
    pub timestamps: bool,
    /// Export directory.
    pub export_dir: PathBuf,
    /// Share command, if any.
    pub share_command: Option<String>,
    /// Quick-send commands, at most [`MAX_QUICK_SEND`].
    pub quick_send: Vec<String>,
    /// Append `\n` to sent commands.
    pub append_newline: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            timestamps: true,
            export_dir: default_export_dir(),
            share_command: None,
            quick_send: default_quick_send(),
            append_newline: false,
            log_file_path: default_log_path(),
        }
    }
}

/// CLI flags that override every other source.
///
/// `None`/`false` means the flag was not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--port`
    pub port: Option<String>,
    /// `--baud`
    pub baud_rate: Option<u32>,
    /// `--no-timestamps`
    pub no_timestamps: bool,
    /// `--export-dir`
    pub export_dir: Option<PathBuf>,
}

/// Default quick-send commands: the digits `1` through `9`.
pub fn default_quick_send() -> Vec<String> {
    (1..=MAX_QUICK_SEND).map(|n| n.to_string()).collect()
}

/// Resolve default export directory.
///
/// Uses the platform documents directory, falling back to the current directory.
pub fn default_export_dir() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/serlog/serlog.log` on Linux, or the appropriate
/// platform path elsewhere. Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("serlog").join("serlog.log")
    } else {
        PathBuf::from("serlog.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/serlog/config.toml` on Linux, appropriate path on other platforms.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("serlog").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SERLOG_CONFIG` environment variable
/// 3. Default path `~/.config/serlog/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("SERLOG_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `SERLOG_PORT`: serial port
/// - `SERLOG_BAUD`: baud rate
///
/// # Errors
///
/// Returns `InvalidEnv` when `SERLOG_BAUD` is not a positive integer.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(port) = std::env::var("SERLOG_PORT") {
        if !port.trim().is_empty() {
            config.port = Some(port);
        }
    }

    if let Ok(baud) = std::env::var("SERLOG_BAUD") {
        config.baud_rate = parse_baud(&baud).ok_or(ConfigError::InvalidEnv {
            var: "SERLOG_BAUD",
            value: baud,
        })?;
    }

    Ok(config)
}

fn parse_baud(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|baud| *baud > 0)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
/// Quick-send lists longer than [`MAX_QUICK_SEND`] are truncated.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let mut quick_send = config.quick_send.unwrap_or(defaults.quick_send);
    quick_send.truncate(MAX_QUICK_SEND);

    ResolvedConfig {
        port: config.port.or(defaults.port),
        baud_rate: config.baud_rate.unwrap_or(defaults.baud_rate),
        timestamps: config.timestamps.unwrap_or(defaults.timestamps),
        export_dir: config.export_dir.unwrap_or(defaults.export_dir),
        share_command: config.share_command.or(defaults.share_command),
        quick_send,
        append_newline: config.append_newline.unwrap_or(defaults.append_newline),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(port) = cli.port {
        config.port = Some(port);
    }

    if let Some(baud_rate) = cli.baud_rate {
        config.baud_rate = baud_rate;
    }

    if cli.no_timestamps {
        config.timestamps = false;
    }

    if let Some(dir) = cli.export_dir {
        config.export_dir = dir;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
