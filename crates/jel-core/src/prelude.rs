// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use jel_core::prelude::*;
//! ```

pub use crate::{
    AccessGate, CallSite, Descriptor, Dynamic, Evaluator, EvaluatorRegistry, EvaluatorResolver,
    GateError, Marker, ResolveError, SharedEvaluator, from_fn
};
