// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![warn(missing_docs, rustdoc::broken_intra_doc_links, rust_2018_idioms)]
#![deny(unsafe_code)]

//! # Attribute Quick Reference
//!
//! ```rust,ignore
//! #[meta_jel(
//!     expression_element_name = "value",        // member holding the expression
//!     context_variable_name = "jwt",            // parameter name in `evaluate`
//!     context_type = "crate::auth::Claims",     // empty: jel::Dynamic
//!     return_type = "bool",                     // empty: Box<jel::Dynamic>
//!     evaluator_class_name_pattern = "${class}$MpJwtSecuredBy",
//!     evaluator_method_name_pattern = "${class}_${method}$MpJwtSecuredBy",
//!     custom_methods = "fn exists(jwt: &Claims) -> bool { true }",
//!     evaluator_markers(crate::Audited),        // attributes on the evaluator
//!     imports = [crate::auth::ClaimSet],        // extra `use` lines
//!     crate = "::jel"                           // runtime path when renamed
//! )]
//! pub struct SecuredBy {
//!     pub value: &'static str
//! }
//!
//! #[mark(SecuredBy = "return Self::exists(jwt)")]
//! pub struct Endpoint;
//! ```

mod mark;
mod meta_jel;

use proc_macro::TokenStream;

/// Declare a marker type.
///
/// The struct is emitted unchanged and implements `jel::Marker`, whose
/// descriptor repeats the arguments with defaults filled in. The runtime uses
/// it to compute evaluator names exactly as the build script did.
///
/// # Errors
///
/// Compile error when the expression member is not a named field, when a
/// naming pattern references an unknown placeholder or is cyclic, when a
/// path list entry is not a path, or on an unknown argument.
#[proc_macro_attribute]
pub fn meta_jel(args: TokenStream, item: TokenStream) -> TokenStream {
    match meta_jel::expand(args.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into()
    }
}

/// Attach marker usages to a declaration.
///
/// Each entry is one usage: `Marker = "expr"`, `Marker("expr")` or
/// `Marker(member = "expr", ..)`. The item is left as is; the build script
/// reads the usages from the source. On structs, enums and unions every
/// marker path must name a type implementing `jel::Marker`; a
/// `crate = "::path"` entry names the runtime crate for that check.
#[proc_macro_attribute]
pub fn mark(args: TokenStream, item: TokenStream) -> TokenStream {
    match mark::expand(args.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into()
    }
}
