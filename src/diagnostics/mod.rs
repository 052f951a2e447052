//! Diagnostics reported while building and classifying an API surface.
//!
//! Issues are reported to a [`Reporter`], which consults an [`IssueConfiguration`] for the
//! effective severity of each [`Issue`] and drops suppressed ones. Reporting never aborts the
//! run: parse failures of collaborators such as the manifest reader are recorded here and the
//! caller continues with an empty result.
//!
//! # Example
//!
//! ```rust
//! use apiscope::diagnostics::{Issue, Reporter, Severity};
//!
//! let reporter = Reporter::new();
//! reporter.report(Issue::ParseError, Some("AndroidManifest.xml"), "unexpected end of file");
//! reporter.report(Issue::UnknownAnnotation, None, "dropped @com.example.Internal");
//!
//! // UnknownAnnotation is hidden by default
//! assert_eq!(reporter.count(), 1);
//! assert_eq!(reporter.error_count(), 1);
//! ```

mod issues;

use std::{
    fmt::{self, Write},
    sync::Arc,
};

pub use issues::{Issue, IssueConfiguration, Severity};

/// A single recorded diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The kind of issue
    pub issue: Issue,

    /// Effective severity at the time of reporting
    pub severity: Severity,

    /// Human-readable description of the issue
    pub message: String,

    /// Optional location (file name, qualified element name) the issue refers to
    pub location: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "{}: {} [{}]", self.severity, self.message, self.issue)
    }
}

/// Collector for reported issues.
///
/// Uses `boxcar::Vec` internally for append-only storage, so it can be shared by reference
/// with every component that reports.
#[derive(Debug)]
pub struct Reporter {
    configuration: Arc<IssueConfiguration>,
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Creates a reporter using default severities
    #[must_use]
    pub fn new() -> Self {
        Self::with_configuration(Arc::new(IssueConfiguration::new()))
    }

    /// Creates a reporter consulting `configuration` for severities
    #[must_use]
    pub fn with_configuration(configuration: Arc<IssueConfiguration>) -> Self {
        Self {
            configuration,
            entries: boxcar::Vec::new(),
        }
    }

    /// The issue configuration consulted by this reporter
    #[must_use]
    pub fn configuration(&self) -> &IssueConfiguration {
        &self.configuration
    }

    /// Reports an issue.
    ///
    /// Returns `true` if the issue was recorded, `false` if its severity is hidden.
    ///
    /// # Arguments
    ///
    /// * `issue` - The kind of issue
    /// * `location` - Optional file or element the issue refers to
    /// * `message` - Description of the issue
    pub fn report(&self, issue: Issue, location: Option<&str>, message: impl Into<String>) -> bool {
        let severity = self.configuration.severity(issue);
        if severity == Severity::Hidden {
            return false;
        }

        self.entries.push(Diagnostic {
            issue,
            severity,
            message: message.into(),
            location: location.map(str::to_string),
        });
        true
    }

    /// Returns the total number of recorded diagnostics
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns the number of error-level diagnostics
    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    /// Returns the number of warning-level diagnostics
    pub fn warning_count(&self) -> usize {
        self.count_severity(Severity::Warning)
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == severity)
            .count()
    }

    /// Returns true if any error-level diagnostics have been recorded
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Returns an iterator over all diagnostics, in reporting order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns the diagnostics of one issue kind
    pub fn by_issue(&self, issue: Issue) -> Vec<&Diagnostic> {
        self.iter().filter(|d| d.issue == issue).collect()
    }

    /// Formats a summary of all diagnostics for display
    pub fn summary(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "{} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        );
        for diagnostic in self.iter() {
            let _ = writeln!(output, "  {diagnostic}");
        }
        output
    }
}

impl fmt::Display for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
