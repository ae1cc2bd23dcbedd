// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Marker descriptors.
//!
//! A marker is a user type carrying `#[meta_jel(...)]`. Its configuration is a
//! [`Descriptor`]; the attribute macro exposes it through [`Marker`] so the
//! runtime can derive evaluator names with exactly the patterns the build
//! script used.
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `expression_element_name` | `"value"` |
//! | `context_variable_name` | `"context"` |
//! | `context_type` | `""` (dynamic) |
//! | `return_type` | `""` (dynamic) |
//! | `evaluator_class_name_pattern` | `"${class}$SimpleJelEvaluator"` |
//! | `evaluator_method_name_pattern` | `"${class}$${method}$SimpleJelEvaluator"` |
//! | `custom_methods` | `""` |
//! | `evaluator_markers` | `[]` |
//! | `imports` | `[]` |

use crate::naming::NamingConvention;

/// Default member holding the expression.
pub const DEFAULT_EXPRESSION_ELEMENT_NAME: &str = "value";

/// Default parameter name of the generated `evaluate` method.
pub const DEFAULT_CONTEXT_VARIABLE_NAME: &str = "context";

/// Default pattern for type-level evaluators.
pub const DEFAULT_CLASS_NAME_PATTERN: &str = "${class}$SimpleJelEvaluator";

/// Default pattern for method-level evaluators.
pub const DEFAULT_METHOD_NAME_PATTERN: &str = "${class}$${method}$SimpleJelEvaluator";

/// Static configuration of a marker type.
///
/// Empty `context_type`/`return_type` mean [`Dynamic`](crate::Dynamic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Marker member holding the expression.
    pub expression_element_name:       &'static str,
    /// Name of the context parameter visible to the expression.
    pub context_variable_name:         &'static str,
    /// Qualified context type, or empty.
    pub context_type:                  &'static str,
    /// Qualified return type, or empty.
    pub return_type:                   &'static str,
    /// Naming pattern for type-level evaluators.
    pub evaluator_class_name_pattern:  &'static str,
    /// Naming pattern for method-level evaluators.
    pub evaluator_method_name_pattern: &'static str,
    /// Extra items appended to the evaluator's inherent impl.
    pub custom_methods:                &'static str,
    /// Attributes stamped on generated evaluators.
    pub evaluator_markers:             &'static [&'static str],
    /// Additional `use` paths for generated evaluators.
    pub imports:                       &'static [&'static str]
}

impl Descriptor {
    /// Descriptor of a bare `#[meta_jel]`.
    pub const DEFAULT: Self = Self {
        expression_element_name:       DEFAULT_EXPRESSION_ELEMENT_NAME,
        context_variable_name:         DEFAULT_CONTEXT_VARIABLE_NAME,
        context_type:                  "",
        return_type:                   "",
        evaluator_class_name_pattern:  DEFAULT_CLASS_NAME_PATTERN,
        evaluator_method_name_pattern: DEFAULT_METHOD_NAME_PATTERN,
        custom_methods:                "",
        evaluator_markers:             &[],
        imports:                       &[]
    };

    /// Naming convention built from the two patterns.
    pub fn naming(&self) -> NamingConvention {
        NamingConvention::new(
            self.evaluator_class_name_pattern,
            self.evaluator_method_name_pattern
        )
    }
}

impl Default for Descriptor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Marker type declared with `#[meta_jel(...)]`.
///
/// Implemented by the attribute macro; manual implementations must keep the
/// descriptor identical to the attribute the build script reads.
pub trait Marker {
    /// Simple name of the marker type.
    const NAME: &'static str;

    /// Marker configuration.
    const DESCRIPTOR: Descriptor;
}
