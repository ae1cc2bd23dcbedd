// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # jel
//!
//! One crate for applications. Re-exports:
//! - the [`meta_jel`] and [`mark`] attributes from `jel-macros`
//! - everything from `jel-core` ([`Evaluator`], [`EvaluatorRegistry`],
//!   [`EvaluatorResolver`], [`AccessGate`], ...)
//!
//! The build-time generator lives in `jel-codegen` and is used from
//! `build.rs`.

pub use jel_core::*;
pub use jel_macros::{mark, meta_jel};

/// Runtime items and both attributes.
pub mod prelude {
    pub use jel_core::prelude::*;
    pub use jel_macros::{mark, meta_jel};
}
