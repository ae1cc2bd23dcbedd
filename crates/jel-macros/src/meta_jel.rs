// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[meta_jel(...)]` implementation.
//!
//! Parses the descriptor with darling, checks what the build script would
//! otherwise only report later, and implements `jel::Marker`.
//!
//! # Checks
//!
//! | Check | Error span |
//! |-------|------------|
//! | expression member is a named field | struct name |
//! | both naming patterns expand | struct name |
//! | path lists hold paths | the offending entry |
//! | unknown argument | the argument |
//!
//! `evaluator_markers` and `imports` take the forms the build script reads:
//! `key(a::B, ::c::D)`, `key("a::B")`, `key = [a::B, "c::D"]` and
//! `key = "a::B"`.
//!
//! Generated code names the runtime as `::jel`. A crate that depends on it
//! under another name passes `crate = "::other"`, the same path given to
//! `Builder::runtime_crate`.

use darling::{FromMeta, ast::NestedMeta};
use jel_core::{Descriptor, NamingConvention};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, ExprLit, Fields, ItemStruct, Lit, Meta, Path, Token, punctuated::Punctuated};

/// Paths of a list-valued argument, rendered as `a::b::C`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs(Vec<String>);

impl PathArgs {
    /// Paths in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromMeta for PathArgs {
    fn from_meta(item: &Meta) -> darling::Result<Self> {
        let entries: Vec<Expr> = match item {
            Meta::List(list) => list
                .parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?
                .into_iter()
                .collect(),
            Meta::NameValue(pair) => match &pair.value {
                Expr::Array(array) => array.elems.iter().cloned().collect(),
                other => vec![other.clone()]
            },
            Meta::Path(_) => {
                return Err(darling::Error::unsupported_format("word").with_span(item));
            }
        };

        let mut errors = darling::Error::accumulator();
        let paths = entries
            .iter()
            .filter_map(|entry| errors.handle(entry_path(entry)))
            .collect();
        errors.finish_with(Self(paths))
    }
}

/// `a::B` or `"a::B"` as path text.
fn entry_path(entry: &Expr) -> darling::Result<String> {
    match entry {
        Expr::Path(path) if path.qself.is_none() => Ok(path_text(&path.path)),
        Expr::Lit(ExprLit {
            lit: Lit::Str(text), ..
        }) => {
            let path: Path = text
                .parse()
                .map_err(|err| darling::Error::from(err).with_span(text))?;
            Ok(path_text(&path))
        }
        Expr::Group(group) => entry_path(&group.expr),
        other => Err(darling::Error::custom("expected a path or a string literal").with_span(other))
    }
}

/// Arguments of `#[meta_jel(...)]`; unset members keep the defaults.
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
pub struct MetaJelArgs {
    /// Member holding the expression.
    pub expression_element_name:       Option<String>,
    /// Context parameter name.
    pub context_variable_name:         Option<String>,
    /// Context type.
    pub context_type:                  Option<String>,
    /// Return type.
    pub return_type:                   Option<String>,
    /// Type-level naming pattern.
    pub evaluator_class_name_pattern:  Option<String>,
    /// Method-level naming pattern.
    pub evaluator_method_name_pattern: Option<String>,
    /// Items for the evaluator's inherent impl.
    pub custom_methods:                Option<String>,
    /// Attributes stamped on evaluators.
    pub evaluator_markers:             PathArgs,
    /// Extra `use` paths.
    pub imports:                       PathArgs,
    /// Path of the runtime crate in the generated impl.
    #[darling(rename = "crate")]
    pub runtime:                       Option<Path>
}

impl MetaJelArgs {
    /// Expression member, defaulted.
    pub fn expression_element_name(&self) -> &str {
        or_default(&self.expression_element_name, Descriptor::DEFAULT.expression_element_name)
    }

    /// Runtime crate path, defaulted to `::jel`.
    pub fn runtime(&self) -> Path {
        self.runtime
            .clone()
            .unwrap_or_else(|| syn::parse_quote!(::jel))
    }

    /// Naming convention, defaulted.
    pub fn naming(&self) -> NamingConvention {
        NamingConvention::new(
            or_default(
                &self.evaluator_class_name_pattern,
                Descriptor::DEFAULT.evaluator_class_name_pattern
            ),
            or_default(
                &self.evaluator_method_name_pattern,
                Descriptor::DEFAULT.evaluator_method_name_pattern
            )
        )
    }
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().unwrap_or(default)
}

/// `a::b::C`, as written, without spaces.
fn path_text(path: &Path) -> String {
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

/// Expand `#[meta_jel(args)] item`.
pub fn expand(args: TokenStream, item: TokenStream) -> darling::Result<TokenStream> {
    let nested = NestedMeta::parse_meta_list(args)?;
    let args = MetaJelArgs::from_list(&nested)?;
    let item: ItemStruct = syn::parse2(item)?;

    let mut errors = darling::Error::accumulator();

    let member = args.expression_element_name();
    let has_member = match &item.fields {
        Fields::Named(fields) => fields
            .named
            .iter()
            .any(|field| field.ident.as_ref().is_some_and(|ident| ident == member)),
        _ => false
    };
    if !has_member {
        errors.push(
            darling::Error::custom(format!(
                "marker has no named field `{member}` to hold the expression"
            ))
            .with_span(&item.ident)
        );
    }

    if let Err(err) = args.naming().validate() {
        errors.push(darling::Error::custom(err.to_string()).with_span(&item.ident));
    }

    errors.finish()?;
    Ok(generate(&item, &args))
}

fn generate(item: &ItemStruct, args: &MetaJelArgs) -> TokenStream {
    let ident = &item.ident;
    let name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let defaults = Descriptor::DEFAULT;

    let expression_element_name = args.expression_element_name();
    let context_variable_name = or_default(&args.context_variable_name, defaults.context_variable_name);
    let context_type = or_default(&args.context_type, defaults.context_type);
    let return_type = or_default(&args.return_type, defaults.return_type);
    let naming = args.naming();
    let class_pattern = naming.class_pattern();
    let method_pattern = naming.method_pattern();
    let custom_methods = or_default(&args.custom_methods, defaults.custom_methods);
    let evaluator_markers = args.evaluator_markers.iter();
    let imports = args.imports.iter();
    let runtime = args.runtime();

    quote! {
        #item

        impl #impl_generics #runtime::Marker for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            const DESCRIPTOR: #runtime::Descriptor = #runtime::Descriptor {
                expression_element_name: #expression_element_name,
                context_variable_name: #context_variable_name,
                context_type: #context_type,
                return_type: #return_type,
                evaluator_class_name_pattern: #class_pattern,
                evaluator_method_name_pattern: #method_pattern,
                custom_methods: #custom_methods,
                evaluator_markers: &[#(#evaluator_markers),*],
                imports: &[#(#imports),*]
            };
        }
    }
}
