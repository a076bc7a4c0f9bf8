//! Error types for serlog.
//!
//! This module defines the error taxonomy using `thiserror`. Each concern owns
//! its own enum and the top-level [`AppError`] composes them through `From`
//! conversions so `?` works across layer boundaries.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Fatal errors that end the program
//!   - [`TransportError`] - Opening, reading or writing the device connection
//!   - [`ConfigError`] - Config file or environment override rejected
//!   - [`LoggingError`] - Log file could not be set up
//!   - [`TuiError`] - Terminal failures while running the UI
//! - [`ExtractionError`] - Report extraction from the log buffer
//! - [`ExportError`] - Writing or sharing an exported document
//!
//! # Recovery Strategy
//!
//! Extraction, export and write failures are **non-fatal**: they surface as a
//! notice or status message and the session keeps running, so they have no
//! [`AppError`] variant. Only failing to open the transport at startup, bad
//! configuration or losing the terminal ends the program.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::view::TuiError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for failures that end the program.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to open or use the device connection.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Tui(#[from] TuiError),
}

/// Errors raised by transports.
///
/// Write failures keep the pending input so the user can retry; open failures
/// at startup are fatal.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No device is connected, so nothing can be written.
    #[error("No connected device: cannot send data")]
    NotConnected,

    /// The transport is a read-only replay (stdin or file).
    #[error("Transport is read-only: {0}")]
    ReadOnly(&'static str),

    /// No serial port was given and none could be detected.
    #[error("No serial port found: pass --port, --file, or pipe data to stdin")]
    NoDevice,

    /// The replay file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },

    /// The serial driver reported an error.
    #[error("Serial port error on {port}: {message}")]
    Serial {
        /// Port name, e.g. `/dev/ttyUSB0`.
        port: String,
        /// Driver error description.
        message: String,
    },

    /// Generic I/O failure while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by report extraction.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// An end tag appeared before any start tag.
    #[error("Start tag <START_REPORT> not found before end tag <END_REPORT>")]
    UnmatchedEnd,

    /// No non-empty region was found between matched tags.
    #[error("No data found between start and end tags")]
    NoData,

    /// A start tag was seen but no section was ever closed.
    #[error("End tag <END_REPORT> not found after start tag <START_REPORT>")]
    Unterminated,
}

/// Errors raised while exporting a document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export directory could not be created.
    #[error("Failed to create export directory {path:?}: {source}")]
    DirectoryCreation {
        /// Directory that failed to be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be written.
    #[error("Failed to write {path:?}: {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The share command could not be started or exited unsuccessfully.
    #[error("Share command '{command}' failed: {reason}")]
    Share {
        /// The configured command.
        command: String,
        /// Spawn error or exit status.
        reason: String,
    },
}
