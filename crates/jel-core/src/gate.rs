// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Access gate around guarded calls.
//!
//! An [`AccessGate`] resolves the boolean evaluator bound to a call site and
//! runs it against the caller's context before the wrapped call:
//!
//! | Evaluator outcome | Gate result | Wrapped call |
//! |-------------------|-------------|--------------|
//! | `true` | `Ok(call())` | runs once |
//! | `false` | [`GateError::Denied`] | not run |
//! | panic | [`GateError::Evaluation`] | not run |
//! | no binding | [`GateError::Binding`] | not run |
//!
//! Only an explicit `true` lets a call through. Helpers declared in a marker's
//! `custom_methods` may catch their own failures and return `false`; nothing
//! else is ever converted into a decision.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use jel_core::{AccessGate, CallSite, EvaluatorRegistry, NamingConvention, from_fn};
//!
//! struct Reports;
//!
//! let mut registry = EvaluatorRegistry::new();
//! registry.register_factory(
//!     format!("{}_export$Gate", std::any::type_name::<Reports>()),
//!     || Ok(from_fn(|role: &str| role == "admin"))
//! );
//!
//! let gate = AccessGate::<str>::new(
//!     NamingConvention::new("${class}$Gate", "${class}_${method}$Gate"),
//!     Arc::new(registry)
//! );
//! let site = CallSite::method::<Reports>("export");
//!
//! assert_eq!(gate.guard(&site, "admin", || 42).unwrap(), 42);
//! assert!(gate.guard(&site, "guest", || 42).unwrap_err().is_denied());
//! ```

use std::{
    future::Future,
    panic::{self, AssertUnwindSafe},
    sync::Arc
};

use tracing::{trace, warn};

use crate::{
    cache::{CallSite, EvaluatorResolver},
    descriptor::Marker,
    error::{GateError, panic_message},
    naming::NamingConvention,
    registry::EvaluatorRegistry
};

/// Boolean gate over evaluators taking `C` as context.
#[derive(Debug)]
pub struct AccessGate<C: ?Sized + 'static> {
    resolver: EvaluatorResolver<C, bool>
}

impl<C: ?Sized + 'static> AccessGate<C> {
    /// Create a gate with explicit naming patterns.
    pub fn new(naming: NamingConvention, registry: Arc<EvaluatorRegistry>) -> Self {
        Self::from_resolver(EvaluatorResolver::new(naming, registry))
    }

    /// Create a gate using the patterns of marker `M`.
    pub fn for_marker<M: Marker>(registry: Arc<EvaluatorRegistry>) -> Self {
        Self::from_resolver(EvaluatorResolver::for_marker::<M>(registry))
    }

    /// Create a gate over an existing resolver.
    pub const fn from_resolver(resolver: EvaluatorResolver<C, bool>) -> Self {
        Self {
            resolver
        }
    }

    /// Underlying resolver.
    pub const fn resolver(&self) -> &EvaluatorResolver<C, bool> {
        &self.resolver
    }

    /// Decide whether `context` may enter `site`.
    ///
    /// # Errors
    ///
    /// [`GateError::Denied`] when the expression returns `false`,
    /// [`GateError::Evaluation`] when it panics, and [`GateError::Binding`]
    /// when no evaluator can be resolved.
    pub fn check(&self, site: &CallSite, context: &C) -> Result<(), GateError> {
        let evaluator = self.resolver.resolve(site)?;

        let allowed = panic::catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(context)))
            .map_err(|payload| {
                let message = panic_message(payload.as_ref());
                warn!(site = %site, %message, "gate expression panicked");
                GateError::Evaluation {
                    site: site.to_string(),
                    message
                }
            })?;

        if allowed {
            trace!(site = %site, "access granted");
            Ok(())
        } else {
            warn!(site = %site, "access denied");
            Err(GateError::Denied {
                site: site.to_string()
            })
        }
    }

    /// Run `call` if the gate allows it and return its result unchanged.
    ///
    /// # Errors
    ///
    /// Any [`GateError`] from [`check`](Self::check); `call` is not invoked.
    pub fn guard<T>(
        &self,
        site: &CallSite,
        context: &C,
        call: impl FnOnce() -> T
    ) -> Result<T, GateError> {
        self.check(site, context)?;
        Ok(call())
    }

    /// Async form of [`guard`](Self::guard).
    ///
    /// The gate is evaluated before the future is created, so a rejected call
    /// never starts.
    ///
    /// # Errors
    ///
    /// Any [`GateError`] from [`check`](Self::check).
    pub async fn guard_async<T, F, Fut>(
        &self,
        site: &CallSite,
        context: &C,
        call: F
    ) -> Result<T, GateError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>
    {
        self.check(site, context)?;
        Ok(call().await)
    }
}
