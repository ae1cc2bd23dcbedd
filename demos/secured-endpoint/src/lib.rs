// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Endpoint gated by generated evaluators.
//!
//! `build.rs` scans this crate, finds the [`markers`] in use and writes one
//! evaluator per usage; [`evaluators`] includes them and [`registry`] binds
//! them by name. [`api::OrdersApi`] checks every call against them.

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod foo;
pub mod markers;
pub mod orders;

use jel::EvaluatorRegistry;

/// Evaluators written by `build.rs`.
#[allow(missing_docs)]
pub mod evaluators {
    include!(concat!(env!("OUT_DIR"), "/jel/evaluators.rs"));
}

/// Registry holding every generated evaluator.
pub fn registry() -> EvaluatorRegistry {
    let mut registry = EvaluatorRegistry::new();
    evaluators::register(&mut registry);
    registry
}
