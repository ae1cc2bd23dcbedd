// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Build diagnostics.
//!
//! Every problem found while generating is tied to the element it concerns
//! (a type, a method, a marker or a file) and recorded instead of aborting,
//! so unrelated declarations are still processed. Each report is also logged
//! through `tracing`; build scripts additionally forward them to cargo with
//! [`Diagnostics::emit_cargo_warnings`].

use std::fmt;

use tracing::{debug, error, warn};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Informational.
    Note,
    /// Suspicious but harmless.
    Warning,
    /// The affected artifact was not generated.
    Error
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Error => "error"
        })
    }
}

/// One report: declaration + message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity.
    pub level:   Level,
    /// Element the report is about.
    pub element: String,
    /// Human readable message.
    pub message: String
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: `{}`: {}", self.level, self.element, self.message)
    }
}

/// Diagnostics of one generator run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>
}

impl Diagnostics {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn error(&mut self, element: impl Into<String>, message: impl Into<String>) {
        self.push(Level::Error, element.into(), message.into());
    }

    /// Record a warning.
    pub fn warning(&mut self, element: impl Into<String>, message: impl Into<String>) {
        self.push(Level::Warning, element.into(), message.into());
    }

    /// Record a note.
    pub fn note(&mut self, element: impl Into<String>, message: impl Into<String>) {
        self.push(Level::Note, element.into(), message.into());
    }

    fn push(&mut self, level: Level, element: String, message: String) {
        match level {
            Level::Error => error!(element = %element, "{message}"),
            Level::Warning => warn!(element = %element, "{message}"),
            Level::Note => debug!(element = %element, "{message}")
        }
        self.items.push(Diagnostic {
            level,
            element,
            message
        });
    }

    /// Check if any error was recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of errors.
    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|diagnostic| diagnostic.level == Level::Error)
            .count()
    }

    /// Errors only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|diagnostic| diagnostic.level == Level::Error)
    }

    /// All diagnostics in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Print warnings and errors as `cargo:warning=` lines.
    pub fn emit_cargo_warnings(&self) {
        for diagnostic in self.iter().filter(|d| d.level >= Level::Warning) {
            println!("cargo:warning={diagnostic}");
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_errors_only() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.note("app::Dummy", "generated");
        diagnostics.warning("app::Dummy", "unused marker");
        diagnostics.error("app::Marker", "missing member `value`");

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.errors().count(), 1);
    }

    #[test]
    fn display_names_element() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error("app::Marker", "missing member `value`");

        let rendered = diagnostics.iter().next().unwrap().to_string();
        assert_eq!(rendered, "error: `app::Marker`: missing member `value`");
    }

    #[test]
    fn empty_has_no_errors() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert!(!diagnostics.has_errors());
    }
}
