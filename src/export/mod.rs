//! Exporting extracted text as a shareable document (impure shell).
//!
//! The core hands over plain text; this module wraps it in a minimal HTML
//! `<pre>` document, writes it to the export directory and optionally hands
//! the file to an external share command.

mod html;

pub use html::render_document;

use crate::model::ExportError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Which document is being exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// The tagged report section.
    Report,
    /// The whole log with timestamps removed.
    FullLog,
}

impl ExportKind {
    /// File stem used for the written document.
    pub fn file_stem(self) -> &'static str {
        match self {
            ExportKind::Report => "report",
            ExportKind::FullLog => "full_log",
        }
    }

    /// Human-readable label for notices.
    pub fn label(self) -> &'static str {
        match self {
            ExportKind::Report => "Report",
            ExportKind::FullLog => "Full log",
        }
    }
}

/// Destination for exported text.
///
/// Implemented by [`HtmlExporter`] in production and by in-memory sinks in
/// tests.
pub trait ReportSink {
    /// Publish `text` as a document of the given kind.
    ///
    /// Returns the location of the produced artifact.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if the document cannot be written or shared.
    fn export(&mut self, kind: ExportKind, text: &str) -> Result<PathBuf, ExportError>;
}

/// Writes HTML documents into a directory and optionally runs a share command.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    directory: PathBuf,
    share_command: Option<String>,
}

impl HtmlExporter {
    /// Create an exporter writing into `directory`.
    ///
    /// `share_command` is split on whitespace and the document path is
    /// appended as the last argument (e.g. `xdg-open`). Quotes are not
    /// interpreted, so an argument containing spaces cannot be passed.
    pub fn new(directory: impl Into<PathBuf>, share_command: Option<String>) -> Self {
        Self {
            directory: directory.into(),
            share_command: share_command.filter(|cmd| !cmd.trim().is_empty()),
        }
    }

    /// Directory documents are written into.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn write(&self, kind: ExportKind, text: &str) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.directory).map_err(|source| ExportError::DirectoryCreation {
            path: self.directory.clone(),
            source,
        })?;

        let path = self.directory.join(format!("{}.html", kind.file_stem()));
        fs::write(&path, render_document(text)).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    fn share(&self, path: &Path) -> Result<(), ExportError> {
        let Some(command) = &self.share_command else {
            return Ok(());
        };

        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return Ok(());
        };

        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ExportError::Share {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(ExportError::Share {
                command: command.clone(),
                reason: status.to_string(),
            });
        }

        Ok(())
    }
}

impl ReportSink for HtmlExporter {
    fn export(&mut self, kind: ExportKind, text: &str) -> Result<PathBuf, ExportError> {
        let path = self.write(kind, text)?;
        info!(kind = kind.label(), path = %path.display(), "Exported document");

        if let Err(err) = self.share(&path) {
            warn!(error = %err, "Share command failed");
            return Err(err);
        }

        Ok(path)
    }
}
