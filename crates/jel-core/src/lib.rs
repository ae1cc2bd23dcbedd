// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime layer and shared naming contract for jel evaluators.
//!
//! `jel-codegen` turns expressions attached to marked declarations into small
//! evaluator types at build time. This crate is everything both sides agree
//! on, plus the pieces that use those evaluators at run time.
//!
//! # Overview
//!
//! | Item | Role |
//! |------|------|
//! | [`Substitutor`] | Recursive `${name}` / `${name:-default}` expansion |
//! | [`NamingConvention`] | Evaluator name of a type or method, shared with the generator |
//! | [`Descriptor`], [`Marker`] | Configuration of a `#[meta_jel]` marker |
//! | [`Evaluator`] | One-method contract every generated evaluator implements |
//! | [`EvaluatorRegistry`] | Name → factory table filled by the generated index |
//! | [`EvaluatorResolver`] | Call site → evaluator, populated once per key |
//! | [`AccessGate`] | Allow or reject a call from a boolean evaluator |
//! | [`prelude`] | Convenient re-exports |
//!
//! # Usage
//!
//! Most users depend on the `jel` facade, which re-exports this crate next to
//! the attribute macros:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use jel::prelude::*;
//!
//! pub mod evaluators {
//!     include!(concat!(env!("OUT_DIR"), "/jel/evaluators.rs"));
//! }
//!
//! let mut registry = EvaluatorRegistry::new();
//! evaluators::register(&mut registry);
//!
//! let gate = AccessGate::<Claims>::for_marker::<SecuredBy>(Arc::new(registry));
//! let orders = gate.guard(&CallSite::method::<Orders>("list"), &claims, || load_orders())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod descriptor;
pub mod error;
pub mod evaluator;
pub mod gate;
pub mod naming;
pub mod prelude;
pub mod registry;
pub mod substitutor;

pub use cache::{CallSite, EvaluatorKey, EvaluatorResolver};
pub use descriptor::{Descriptor, Marker};
pub use error::{BoxError, GateError, InstantiationError, ResolveError};
pub use evaluator::{Dynamic, Evaluator, FnEvaluator, SharedEvaluator, from_fn};
pub use gate::AccessGate;
pub use naming::{NamingConvention, NamingError};
pub use registry::EvaluatorRegistry;
pub use substitutor::{SubstitutionError, Substitutor};
