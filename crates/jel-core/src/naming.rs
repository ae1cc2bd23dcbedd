// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Evaluator naming convention.
//!
//! The only link between generated code and the runtime resolver is the name
//! under which an evaluator is registered. Both sides compute it here, from
//! the same pair of pattern templates taken from the marker's
//! [`Descriptor`](crate::Descriptor):
//!
//! | Declaration | Pattern | Bound placeholders |
//! |-------------|---------|--------------------|
//! | Type | `evaluator_class_name_pattern` | `${class}` |
//! | Method | `evaluator_method_name_pattern` | `${class}`, `${method}` |
//!
//! `${class}` is the qualified type name as reported by
//! [`std::any::type_name`], e.g. `app::api::Endpoint`. Any other placeholder
//! is an error: naming fails closed instead of producing an empty segment.

use thiserror::Error;

use crate::substitutor::{SubstitutionError, Substitutor};

/// Placeholder bound to the qualified type name.
pub const CLASS_PLACEHOLDER: &str = "class";

/// Placeholder bound to the method name.
pub const METHOD_PLACEHOLDER: &str = "method";

/// Separator between package segments of a qualified name.
pub const PATH_SEPARATOR: &str = "::";

/// Failure to derive an evaluator name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// The pattern could not be expanded.
    #[error("invalid evaluator name pattern `{pattern}`: {source}")]
    Pattern {
        /// Offending pattern.
        pattern: String,
        /// Underlying substitution failure.
        #[source]
        source:  SubstitutionError
    },

    /// The pattern expanded to nothing.
    #[error("evaluator name pattern `{pattern}` resolved to an empty name")]
    Empty {
        /// Offending pattern.
        pattern: String
    }
}

/// Pair of naming patterns shared by generator and resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    class_pattern:  String,
    method_pattern: String
}

impl NamingConvention {
    /// Create a convention from explicit patterns.
    pub fn new(class_pattern: impl Into<String>, method_pattern: impl Into<String>) -> Self {
        Self {
            class_pattern:  class_pattern.into(),
            method_pattern: method_pattern.into()
        }
    }

    /// Pattern used for type-level declarations.
    pub fn class_pattern(&self) -> &str {
        &self.class_pattern
    }

    /// Pattern used for method-level declarations.
    pub fn method_pattern(&self) -> &str {
        &self.method_pattern
    }

    /// Name of the evaluator generated for a type or one of its methods.
    ///
    /// # Errors
    ///
    /// Returns [`NamingError`] when the pattern references an unknown
    /// placeholder, loops, or expands to an empty string.
    pub fn evaluator_name(&self, class: &str, method: Option<&str>) -> Result<String, NamingError> {
        let pattern = match method {
            Some(_) => &self.method_pattern,
            None => &self.class_pattern
        };

        let substitutor = Substitutor::new(|name: &str| match name {
            CLASS_PLACEHOLDER => Some(class.to_owned()),
            METHOD_PLACEHOLDER => method.map(str::to_owned),
            _ => None
        })
        .strict();

        let name = substitutor
            .replace(pattern)
            .map_err(|source| NamingError::Pattern {
                pattern: pattern.clone(),
                source
            })?;

        if name.trim().is_empty() {
            return Err(NamingError::Empty {
                pattern: pattern.clone()
            });
        }

        Ok(name.into_owned())
    }

    /// Check both patterns against sample names.
    ///
    /// # Errors
    ///
    /// The first [`NamingError`] either pattern produces.
    pub fn validate(&self) -> Result<(), NamingError> {
        self.evaluator_name("app::Type", None)?;
        self.evaluator_name("app::Type", Some("method"))?;
        Ok(())
    }
}

/// Split a qualified name into package and simple name.
///
/// The package is empty for names without separator.
///
/// ```rust
/// use jel_core::naming::split_qualified;
///
/// assert_eq!(split_qualified("foo::bar::Dummy$Eval"), ("foo::bar", "Dummy$Eval"));
/// assert_eq!(split_qualified("Dummy"), ("", "Dummy"));
/// ```
pub fn split_qualified(name: &str) -> (&str, &str) {
    match name.rfind(PATH_SEPARATOR) {
        Some(index) => (&name[..index], &name[index + PATH_SEPARATOR.len()..]),
        None => ("", name)
    }
}
