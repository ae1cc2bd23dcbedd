// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute → [`Annotation`] conversion.
//!
//! # Mapping
//!
//! | Attribute | Annotations |
//! |-----------|-------------|
//! | `#[doc = ".."]` | none |
//! | `#[name]` | `name` |
//! | `#[name = expr]` | `name { value: expr }` |
//! | `#[name(args)]` | `name { args }` |
//! | `#[mark(A = "e", B("f"), C(value = "g", k = true))]` | `A { value: "e" }`, `B { value: "f" }`, `C { value: "g", k: true }` |
//!
//! Arguments convert as `k = "s"` → `Str`, `k = true` → `Bool`,
//! `k = [..]` / `k(a::B, "c")` → `List`, a bare `k` → `Bool(true)`, a bare
//! literal → member `value`, anything else → `Raw` token text.
//!
//! A `crate = ".."` entry in `mark` is skipped. Only `mark` containers must
//! be well formed; arguments of other attributes that do not follow this
//! grammar are dropped, since the compiler is the one to judge them.

use jel_core::descriptor::DEFAULT_EXPRESSION_ELEMENT_NAME;
use quote::ToTokens;
use syn::{
    Attribute, Expr, ExprLit, Lit, Meta, Path, Token,
    parse::{Parse, ParseStream},
    punctuated::Punctuated
};

use crate::model::{Annotation, AnnotationValue};

/// Name of the container attribute carrying marker usages.
pub const MARK_CONTAINER: &str = "mark";

/// `mark` / `meta_jel` entry naming the runtime crate; not a usage.
pub const RUNTIME_ENTRY: &str = "crate";

/// One argument inside attribute parentheses.
enum Argument {
    Literal(Lit),
    Meta(Meta)
}

impl Parse for Argument {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        if input.peek(Lit) {
            input.parse().map(Self::Literal)
        } else {
            input.parse().map(Self::Meta)
        }
    }
}

/// Convert the outer attributes of one declaration.
///
/// # Errors
///
/// A malformed `mark` container.
pub fn annotations(attrs: &[Attribute]) -> syn::Result<Vec<Annotation>> {
    let mut annotations = Vec::new();

    for attr in attrs {
        let path = attr.path();
        if path.is_ident("doc") {
            continue;
        }
        if is_mark(path) {
            annotations.extend(mark_usages(attr)?);
            continue;
        }
        annotations.push(plain(attr));
    }

    Ok(annotations)
}

/// Check whether `path` names the `mark` container (`mark`, `jel::mark`).
pub fn is_mark(path: &Path) -> bool {
    path.segments
        .last()
        .is_some_and(|segment| segment.ident == MARK_CONTAINER)
}

/// Check for `#[cfg(test)]`.
pub fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "test")
    })
}

/// Path as `a::b::C`, generic arguments dropped.
pub fn path_to_string(path: &Path) -> String {
    let joined = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    if path.leading_colon.is_some() {
        format!("::{joined}")
    } else {
        joined
    }
}

fn mark_usages(attr: &Attribute) -> syn::Result<Vec<Annotation>> {
    let usages = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;

    usages
        .iter()
        .filter(|usage| !usage.path().is_ident(RUNTIME_ENTRY))
        .map(|usage| match usage {
            Meta::Path(path) => Ok(Annotation::new(path_to_string(path))),
            Meta::NameValue(pair) => Ok(Annotation::new(path_to_string(&pair.path))
                .with(DEFAULT_EXPRESSION_ELEMENT_NAME, value_of(&pair.value))),
            Meta::List(list) => {
                let arguments =
                    list.parse_args_with(Punctuated::<Argument, Token![,]>::parse_terminated)?;
                let mut annotation = Annotation::new(path_to_string(&list.path));
                annotation.values = arguments.iter().map(member).collect();
                Ok(annotation)
            }
        })
        .collect()
}

fn plain(attr: &Attribute) -> Annotation {
    let mut annotation = Annotation::new(path_to_string(attr.path()));

    match &attr.meta {
        Meta::Path(_) => {}
        Meta::NameValue(pair) => {
            annotation
                .values
                .push((DEFAULT_EXPRESSION_ELEMENT_NAME.to_owned(), value_of(&pair.value)));
        }
        Meta::List(list) => {
            if let Ok(arguments) =
                list.parse_args_with(Punctuated::<Argument, Token![,]>::parse_terminated)
            {
                annotation.values = arguments.iter().map(member).collect();
            }
        }
    }

    annotation
}

fn member(argument: &Argument) -> (String, AnnotationValue) {
    match argument {
        Argument::Literal(lit) => (DEFAULT_EXPRESSION_ELEMENT_NAME.to_owned(), literal(lit)),
        Argument::Meta(Meta::Path(path)) => (path_to_string(path), AnnotationValue::Bool(true)),
        Argument::Meta(Meta::NameValue(pair)) => (path_to_string(&pair.path), value_of(&pair.value)),
        Argument::Meta(Meta::List(list)) => {
            let value = match list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
                Ok(items) => AnnotationValue::List(items.iter().map(text_of).collect()),
                Err(_) => AnnotationValue::Raw(list.tokens.to_string())
            };
            (path_to_string(&list.path), value)
        }
    }
}

fn literal(lit: &Lit) -> AnnotationValue {
    match lit {
        Lit::Str(text) => AnnotationValue::Str(text.value()),
        Lit::Bool(flag) => AnnotationValue::Bool(flag.value),
        other => AnnotationValue::Raw(other.to_token_stream().to_string())
    }
}

fn value_of(expr: &Expr) -> AnnotationValue {
    match expr {
        Expr::Lit(ExprLit {
            lit, ..
        }) => literal(lit),
        Expr::Array(array) => AnnotationValue::List(array.elems.iter().map(text_of).collect()),
        other => AnnotationValue::Raw(other.to_token_stream().to_string())
    }
}

fn text_of(expr: &Expr) -> String {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(text),
            ..
        }) => text.value(),
        Expr::Path(path) if path.qself.is_none() => path_to_string(&path.path),
        other => other.to_token_stream().to_string()
    }
}
