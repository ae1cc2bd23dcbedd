// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! The one-method contract implemented by every generated evaluator.
//!
//! Generated code looks like this for a marker with `context_type =
//! "crate::auth::Claims"`, `return_type = "bool"` and `context_variable_name =
//! "jwt"`:
//!
//! ```rust,ignore
//! #[derive(Debug, Default, Clone, Copy)]
//! pub struct EndpointCallMpJwtSecuredBy;
//!
//! impl Evaluator for EndpointCallMpJwtSecuredBy {
//!     type Context = Claims;
//!     type Output = bool;
//!
//!     fn evaluate(&self, jwt: &Claims) -> bool {
//!         return Self::exists(jwt);
//!     }
//! }
//! ```
//!
//! Markers without declared types use [`Dynamic`] for the context and
//! `Box<Dynamic>` for the result.

use std::{any::Any, fmt, marker::PhantomData, sync::Arc};

/// Unconstrained context or result type.
pub type Dynamic = dyn Any + Send + Sync;

/// Evaluator shared between the cache and its callers.
pub type SharedEvaluator<C, R> = Arc<dyn Evaluator<Context = C, Output = R>>;

/// Single-method functional contract.
pub trait Evaluator: Send + Sync + 'static {
    /// Value the expression is evaluated against.
    type Context: ?Sized;

    /// Value the expression produces.
    type Output;

    /// Evaluate the embedded expression.
    fn evaluate(&self, context: &Self::Context) -> Self::Output;
}

/// Evaluator backed by a closure.
///
/// Handy for registering hand-written evaluators next to generated ones.
///
/// ```rust
/// use jel_core::{Evaluator, from_fn};
///
/// let even = from_fn(|n: &u32| n % 2 == 0);
/// assert!(even.evaluate(&4));
/// ```
pub struct FnEvaluator<C: ?Sized, R, F> {
    function: F,
    _marker:  PhantomData<fn(&C) -> R>
}

/// Wrap a closure as an [`Evaluator`].
pub fn from_fn<C, R, F>(function: F) -> FnEvaluator<C, R, F>
where
    C: ?Sized + 'static,
    R: 'static,
    F: Fn(&C) -> R + Send + Sync + 'static
{
    FnEvaluator {
        function,
        _marker: PhantomData
    }
}

impl<C, R, F> Evaluator for FnEvaluator<C, R, F>
where
    C: ?Sized + 'static,
    R: 'static,
    F: Fn(&C) -> R + Send + Sync + 'static
{
    type Context = C;
    type Output = R;

    fn evaluate(&self, context: &C) -> R {
        (self.function)(context)
    }
}

impl<C: ?Sized, R, F> fmt::Debug for FnEvaluator<C, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEvaluator").finish_non_exhaustive()
    }
}
