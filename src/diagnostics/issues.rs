//! Issue kinds, severities and the per-run severity override map.

use std::fmt;

use dashmap::DashMap;
use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// Severity level of a reported issue.
///
/// Levels are ordered: `Hidden < Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// The issue is suppressed and never recorded
    Hidden,
    /// Informational message, not indicating a problem
    Info,
    /// Potential problem; the run continues
    Warning,
    /// Problem that should fail the run
    Error,
}

impl Severity {
    /// Parses a severity name as used on the command line (`error`, `warning`, `info`, `hidden`)
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "hidden" | "hide" => Some(Severity::Hidden),
            "info" => Some(Severity::Info),
            "warning" | "warn" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Hidden => write!(f, "HIDDEN"),
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// The kinds of issue the model and its collaborators report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum Issue {
    /// An input file (signature file, manifest) could not be parsed
    ParseError,
    /// A nullness annotation contradicts the one on the overridden member
    InvalidNullConversion,
    /// A class was declared more than once
    DuplicateClass,
    /// A referenced class is not declared and was stubbed
    UnresolvedClass,
    /// A public class extends a hidden class
    HiddenSuperclass,
    /// Deprecation status differs between an element and its documentation
    DeprecationMismatch,
    /// A permission named in `@RequiresPermission` is not declared in the manifest
    MissingPermission,
    /// A permission with a dangerous protection level is required
    RequiresPermission,
    /// A signature fragment has invalid syntax
    InvalidSyntax,
    /// An annotation could not be mapped and was dropped
    UnknownAnnotation,
}

impl Issue {
    /// The severity an issue has when not overridden
    #[must_use]
    pub fn default_severity(self) -> Severity {
        match self {
            Issue::ParseError
            | Issue::InvalidNullConversion
            | Issue::DuplicateClass
            | Issue::InvalidSyntax
            | Issue::MissingPermission => Severity::Error,
            Issue::HiddenSuperclass | Issue::DeprecationMismatch | Issue::RequiresPermission => {
                Severity::Warning
            }
            Issue::UnresolvedClass => Severity::Info,
            Issue::UnknownAnnotation => Severity::Hidden,
        }
    }

    /// The name used for this issue in reports and in override strings
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Issue::ParseError => "ParseError",
            Issue::InvalidNullConversion => "InvalidNullConversion",
            Issue::DuplicateClass => "DuplicateClass",
            Issue::UnresolvedClass => "UnresolvedClass",
            Issue::HiddenSuperclass => "HiddenSuperclass",
            Issue::DeprecationMismatch => "DeprecationMismatch",
            Issue::MissingPermission => "MissingPermission",
            Issue::RequiresPermission => "RequiresPermission",
            Issue::InvalidSyntax => "InvalidSyntax",
            Issue::UnknownAnnotation => "UnknownAnnotation",
        }
    }

    /// Looks up an issue by its name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Issue::iter().find(|issue| issue.name() == name)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity overrides for issues, consulted by the [`crate::diagnostics::Reporter`]
///
/// # Examples
///
/// ```rust
/// use apiscope::diagnostics::{Issue, IssueConfiguration, Severity};
///
/// let configuration = IssueConfiguration::new();
/// configuration.apply_overrides("UnresolvedClass:error, HiddenSuperclass:hidden");
/// assert_eq!(configuration.severity(Issue::UnresolvedClass), Severity::Error);
/// assert!(configuration.is_hidden(Issue::HiddenSuperclass));
/// ```
#[derive(Debug, Default)]
pub struct IssueConfiguration {
    overrides: DashMap<Issue, Severity>,
}

impl IssueConfiguration {
    /// Creates a configuration where every issue has its default severity
    #[must_use]
    pub fn new() -> Self {
        Self {
            overrides: DashMap::with_capacity(Issue::COUNT),
        }
    }

    /// The effective severity of `issue`
    #[must_use]
    pub fn severity(&self, issue: Issue) -> Severity {
        self.overrides
            .get(&issue)
            .map_or_else(|| issue.default_severity(), |entry| *entry.value())
    }

    /// Overrides the severity of `issue`
    pub fn set_severity(&self, issue: Issue, severity: Severity) {
        self.overrides.insert(issue, severity);
    }

    /// Turns `issue` into an error
    pub fn error(&self, issue: Issue) {
        self.set_severity(issue, Severity::Error);
    }

    /// Turns `issue` into a warning
    pub fn warning(&self, issue: Issue) {
        self.set_severity(issue, Severity::Warning);
    }

    /// Suppresses `issue`
    pub fn hide(&self, issue: Issue) {
        self.set_severity(issue, Severity::Hidden);
    }

    /// Returns true if `issue` is suppressed
    #[must_use]
    pub fn is_hidden(&self, issue: Issue) -> bool {
        self.severity(issue) == Severity::Hidden
    }

    /// Drops all overrides
    pub fn reset(&self) {
        self.overrides.clear();
    }

    /// Applies a comma separated list of `Issue:severity` overrides.
    ///
    /// Unknown issue or severity names are skipped; the number of applied overrides is returned.
    pub fn apply_overrides(&self, spec: &str) -> usize {
        let mut applied = 0;
        for entry in spec.split(',') {
            let Some((name, level)) = entry.split_once(':') else {
                continue;
            };
            match (Issue::from_name(name.trim()), Severity::parse(level)) {
                (Some(issue), Some(severity)) => {
                    self.set_severity(issue, severity);
                    applied += 1;
                }
                _ => log::debug!("ignoring unknown issue override '{}'", entry.trim()),
            }
        }
        applied
    }
}
