// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Plain expressions on a type and on one of its methods.

use jel::mark;

use crate::markers::Evaluable;

/// Generates `secured_endpoint::foo::Dummy$SimpleJelEvaluator`.
#[mark(Evaluable = "return 1 + 1")]
#[derive(Debug, Default)]
pub struct Dummy;

impl Dummy {
    /// Generates `secured_endpoint::foo::Dummy$eval_method$SimpleJelEvaluator`.
    #[mark(Evaluable = "return 1 + 2")]
    pub fn eval_method(&self) {}
}
