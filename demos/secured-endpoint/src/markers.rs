// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Marker types.
//!
//! | Marker | Context | Result | Name |
//! |--------|---------|--------|------|
//! | [`Evaluable`] | `context: &Dynamic` | `Box<Dynamic>` | `${class}$SimpleJelEvaluator` |
//! | [`SecuredBy`] | `jwt: &Claims` | `bool` | `${class}_${method}$MpJwtSecuredBy` |

use jel::meta_jel;

/// Free-form expression with no typed context.
#[meta_jel]
pub struct Evaluable {
    /// Expression.
    pub value: &'static str
}

/// Authorization rule checked before the marked call.
///
/// Rules see the caller as `jwt` and can use `Self::exists(jwt)`, which is
/// `false` for anonymous callers and never panics.
#[meta_jel(
    context_variable_name = "jwt",
    context_type = "crate::auth::Claims",
    return_type = "bool",
    evaluator_class_name_pattern = "${class}$MpJwtSecuredBy",
    evaluator_method_name_pattern = "${class}_${method}$MpJwtSecuredBy",
    custom_methods = r#"
    fn exists(jwt: &Claims) -> bool {
        std::panic::catch_unwind(|| jwt.raw_token().is_some_and(|token| !token.is_empty()))
            .unwrap_or(false)
    }
"#
)]
pub struct SecuredBy {
    /// Rule returning `true` to allow the call.
    pub value: &'static str
}
