// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[mark(...)]` implementation.
//!
//! The attribute only carries data for the build script, so the item is
//! emitted unchanged. The usage list must still be well formed, and on type
//! items every referenced marker is checked to implement `jel::Marker`.
//!
//! An entry `crate = "::path"` is not a usage: it names the runtime crate
//! for that check when `jel` is renamed.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    DeriveInput, Expr, ExprLit, Lit, Meta, Path, Token, parse::Parser, punctuated::Punctuated
};

/// Expand `#[mark(usages)] item`.
pub fn expand(args: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let usages = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;

    let mut runtime: Path = syn::parse_quote!(::jel);
    let mut markers: Vec<&Path> = Vec::with_capacity(usages.len());
    for usage in &usages {
        if usage.path().is_ident("crate") {
            runtime = runtime_path(usage)?;
        } else {
            markers.push(usage.path());
        }
    }

    if syn::parse2::<DeriveInput>(item.clone()).is_err() {
        return Ok(item);
    }

    Ok(quote! {
        #item

        const _: fn() = || {
            fn assert_marker<M: #runtime::Marker>() {}
            #(assert_marker::<#markers>();)*
        };
    })
}

/// Path from `crate = "::path"`.
fn runtime_path(usage: &Meta) -> syn::Result<Path> {
    match usage {
        Meta::NameValue(pair) => match &pair.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(text), ..
            }) => text.parse(),
            other => Err(syn::Error::new_spanned(other, "expected a string literal path"))
        },
        other => Err(syn::Error::new_spanned(other, "expected `crate = \"::path\"`"))
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    #[test]
    fn type_items_assert_their_markers() {
        let output = expand(
            quote! { Evaluable = "return 1 + 1", crate::auth::SecuredBy("return true") },
            quote! { pub struct Dummy; }
        )
        .unwrap()
        .to_string();

        assert!(output.starts_with("pub struct Dummy ;"));
        assert!(output.contains("assert_marker :: < Evaluable > ()"));
        assert!(output.contains("assert_marker :: < crate :: auth :: SecuredBy > ()"));
    }

    #[test]
    fn methods_pass_through() {
        let item = quote! { pub fn eval_method(&self) {} };
        let output = expand(quote! { Evaluable = "return 1 + 2" }, item.clone()).unwrap();
        assert_eq!(output.to_string(), item.to_string());
    }

    #[test]
    fn member_lists_are_accepted() {
        let output = expand(
            quote! { Rule(rule = "true", strict) },
            quote! { enum Mode { On, Off } }
        );
        assert!(output.is_ok());
    }

    #[test]
    fn renamed_runtime_crate() {
        let output = expand(
            quote! { crate = "::jel_runtime", Evaluable = "return 1 + 1" },
            quote! { pub struct Dummy; }
        )
        .unwrap()
        .to_string();

        assert!(output.contains("M : :: jel_runtime :: Marker"));
        assert!(output.contains("assert_marker :: < Evaluable > ()"));
        assert!(!output.contains("assert_marker :: < crate > ()"));
        assert!(expand(quote! { crate(jel) }, quote! { struct Dummy; }).is_err());
    }

    #[test]
    fn malformed_usages_are_rejected() {
        assert!(expand(quote! { "return 1" }, quote! { struct Dummy; }).is_err());
        assert!(expand(quote! { Evaluable = }, quote! { struct Dummy; }).is_err());
    }
}
