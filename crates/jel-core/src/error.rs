// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime error types.
//!
//! | Error | Raised by | Meaning |
//! |-------|-----------|---------|
//! | [`InstantiationError`] | registry factories | constructor failed or panicked |
//! | [`ResolveError`] | [`EvaluatorResolver`](crate::EvaluatorResolver) | no usable binding for a call site |
//! | [`GateError`] | [`AccessGate`](crate::AccessGate) | call rejected |
//!
//! Every variant of [`ResolveError`] is a build/runtime mismatch and must not
//! be retried or treated as an allow.

use std::any::Any;

use thiserror::Error;

use crate::naming::NamingError;

/// Boxed error returned by fallible evaluator factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure while constructing an evaluator.
#[derive(Debug, Error)]
pub enum InstantiationError {
    /// The factory returned an error.
    #[error("constructor failed: {0}")]
    Failed(#[source] BoxError),

    /// The factory panicked; holds the panic message.
    #[error("constructor panicked: {0}")]
    Panicked(String)
}

/// No usable evaluator for a call site.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Nothing is registered under the computed name.
    #[error("binding not found: no evaluator registered as `{name}`")]
    NotFound {
        /// Computed evaluator name.
        name: String
    },

    /// The registered factory could not build the evaluator.
    #[error("binding not found: evaluator `{name}` could not be instantiated: {source}")]
    Instantiation {
        /// Computed evaluator name.
        name:   String,
        /// Constructor failure.
        #[source]
        source: InstantiationError
    },

    /// The registered evaluator has another context or output type.
    #[error("binding not found: evaluator `{name}` does not implement `{expected}`")]
    ContractMismatch {
        /// Computed evaluator name.
        name:     String,
        /// Contract the resolver expected.
        expected: &'static str
    },

    /// The evaluator name could not be computed.
    #[error("binding not found: {0}")]
    Naming(#[from] NamingError)
}

impl ResolveError {
    /// Evaluator name the resolver looked for, when it got that far.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::NotFound {
                name
            }
            | Self::Instantiation {
                name, ..
            }
            | Self::ContractMismatch {
                name, ..
            } => Some(name),
            Self::Naming(_) => None
        }
    }
}

/// Rejection of a guarded call.
#[derive(Debug, Error)]
pub enum GateError {
    /// The gate expression returned `false`.
    #[error("access denied to `{site}`")]
    Denied {
        /// Guarded call site.
        site: String
    },

    /// No evaluator could be resolved for the call site.
    #[error(transparent)]
    Binding(#[from] ResolveError),

    /// The gate expression panicked.
    #[error("gate evaluation failed for `{site}`: {message}")]
    Evaluation {
        /// Guarded call site.
        site:    String,
        /// Panic message.
        message: String
    }
}

impl GateError {
    /// Check if this is the designed negative outcome.
    pub const fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }

    /// Check if the evaluator binding is missing or broken.
    pub const fn is_binding(&self) -> bool {
        matches!(self, Self::Binding(_))
    }
}

/// Extract the message of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
