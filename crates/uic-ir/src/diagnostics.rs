//! Diagnostics accumulated by recoverable errors (§7 kinds 1, 2, 5-warning).
//!
//! Front-ends, back-ends, and the bundler all attach a [`Diagnostics`] list to
//! their produced artifact instead of aborting on recoverable trouble. This
//! mirrors how `dashflow-registry` distinguishes hard failures (returned as
//! `Err`) from soft ones (recorded and surfaced to the caller).

use serde::{Deserialize, Serialize};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; does not indicate a problem with the output.
    Warning,
    /// A construct could not be fully understood or translated.
    Error,
}

/// A single source location (1-based line/column), used for opaque spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    /// Source path this diagnostic refers to.
    pub path: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

/// One recoverable diagnostic produced while lowering, emitting, or bundling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Warning or error.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Where in the source this diagnostic originates, if known.
    pub span: Option<SourceSpan>,
    /// A short excerpt of the offending source, if available.
    pub excerpt: Option<String>,
}

impl Diagnostic {
    /// Build a warning-level diagnostic with no source context.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span: None,
            excerpt: None,
        }
    }

    /// Build an error-level diagnostic with no source context.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span: None,
            excerpt: None,
        }
    }

    /// Attach a source span to this diagnostic.
    #[must_use]
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach a source excerpt to this diagnostic.
    #[must_use]
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }
}

/// An ordered collection of diagnostics attached to a produced artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    /// An empty diagnostics list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// True if no diagnostics of either severity were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any diagnostic at `Severity::Error` was recorded.
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    /// Iterate over the recorded diagnostics.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
