//! Run reporter: append-only log of informational and error entries.

use crate::error::VerifyError;
use tracing::{error, info};

/// A single reporter entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    /// Progress / informational record
    Info(String),
    /// A recorded verification error
    Error(String),
}

/// Append-only reporter, created fresh per verification run.
///
/// Recording never fails; the collected errors surface exactly once, at the
/// end of the run, through [`Reporter::into_result`].
#[derive(Debug, Default)]
pub struct Reporter {
    entries: Vec<ReportEntry>,
}

impl Reporter {
    /// Create an empty reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an informational entry. Never fails.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.entries.push(ReportEntry::Info(message));
    }

    /// Record an error entry.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("{message}");
        self.entries.push(ReportEntry::Error(message));
    }

    /// Whether any error was recorded since the reporter was created.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, ReportEntry::Error(_)))
    }

    /// All entries, in recording order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Consume the reporter: an aggregate failure listing every recorded
    /// error, or `Ok` if none were recorded.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::VerificationFailed`] when at least one error
    /// entry was recorded.
    pub fn into_result(self) -> Result<(), VerifyError> {
        let failures: Vec<String> = self
            .entries
            .into_iter()
            .filter_map(|entry| match entry {
                ReportEntry::Error(message) => Some(message),
                ReportEntry::Info(_) => None,
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(VerifyError::VerificationFailed { failures })
        }
    }
}
