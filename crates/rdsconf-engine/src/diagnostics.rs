//! Operator-facing feedback: severity, short summary, optional detail.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::error::EngineError;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Aborts the triggering operation.
    Error,
    /// Advisory; the operation still succeeds.
    Warning,
}

impl Severity {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A single unit of operator-facing feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Short summary line.
    pub summary: String,
    /// Long-form detail; may be empty.
    pub detail: String,
}

impl Diagnostic {
    /// Build an error diagnostic.
    #[must_use]
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Build a warning diagnostic.
    #[must_use]
    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Summary followed by a blank line and the detail, when there is one.
    #[must_use]
    pub fn message(&self) -> String {
        if self.detail.is_empty() {
            self.summary.clone()
        } else {
            format!("{}\n\n{}", self.summary, self.detail)
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.severity.as_str(), self.summary)
    }
}

impl From<&EngineError> for Diagnostic {
    fn from(error: &EngineError) -> Self {
        match error {
            EngineError::Config { source } => Self::error(source.summary(), source.detail()),
            EngineError::Connection { source } => Self::error(
                "Unable to connect to the database instance",
                source.detail(),
            ),
            EngineError::Query { source } => {
                Self::error("Configuration procedure call failed", source.detail())
            }
            EngineError::UnsupportedSettings { message, .. } => {
                Self::error("Invalid RDS configuration", message.clone())
            }
            EngineError::InvalidDesired { source } => {
                Self::error("Invalid desired configuration", source.detail())
            }
            EngineError::ImportFailed { message, .. } => {
                Self::error("RDS configuration import failed", message.clone())
            }
        }
    }
}

/// Ordered collection of diagnostics produced by one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Whether any diagnostic is an error.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    /// First error diagnostic, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.0.iter().find(|d| d.severity == Severity::Error)
    }

    /// Number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl From<&EngineError> for Diagnostics {
    fn from(error: &EngineError) -> Self {
        Self(vec![Diagnostic::from(error)])
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
