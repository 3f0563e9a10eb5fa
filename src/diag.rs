// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Diagnostics sink for recoverable issues found while building the model.
//!
//! The sink is passed into construction explicitly. Every entry is also
//! forwarded to the `log` facade so command-line users see it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Instance terminal without physical shapes; offset falls back to (0, 0)
    PinWithoutShapes,
    /// Boundary terminal without physical shapes; placed at (0, 0)
    BoundaryPinUnplaced,
    /// Fixed instance entirely outside the core; excluded from bookkeeping
    FixedOutsideCore,
    /// Net endpoint names an instance the source does not provide
    UnknownInstance,
    /// Core rectangle is not contained in the die rectangle
    CoreOutsideDie,
    /// Row site not found in the library; the row step was used instead
    UnknownSite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
        };
        write!(f, "[{level}] {}: {}", self.subject, self.message)
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, kind: DiagnosticKind, subject: &str, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{subject}: {message}");
        self.push(Severity::Warning, kind, subject, message);
    }

    pub fn info(&mut self, kind: DiagnosticKind, subject: &str, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{subject}: {message}");
        self.push(Severity::Info, kind, subject, message);
    }

    fn push(&mut self, severity: Severity, kind: DiagnosticKind, subject: &str, message: String) {
        self.entries.push(Diagnostic {
            severity,
            kind,
            subject: subject.to_string(),
            message,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Subjects of every entry of the given kind, in insertion order
    pub fn subjects(&self, kind: DiagnosticKind) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.subject.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
