// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Evaluator artifacts.
//!
//! For every marker and every declaration carrying it, [`generate`] builds
//! one [`Artifact`]: the structured form of the evaluator source. Turning it
//! into text is [`render`](crate::render)'s job.
//!
//! # Steps per declaration
//!
//! | Step | Result |
//! |------|--------|
//! | read the expression member of the usage | verbatim body, `;` appended if missing |
//! | expand the class or method pattern | qualified name, e.g. `app::foo::Dummy$SimpleJelEvaluator` |
//! | split at the last `::` | package `app::foo`, class name `Dummy$SimpleJelEvaluator` |
//! | sanitise the class name | identifier `DummySimpleJelEvaluator` |
//! | resolve context and return types | short names in the signature, full paths imported |
//! | collect imports | contract, types, `imports`, `evaluator_markers`; sorted, deduplicated |
//!
//! Any failure is reported against the declaration and only its artifact is
//! skipped.

use std::collections::{BTreeSet, HashSet};

use convert_case::{Case, Casing};
use jel_core::naming::{PATH_SEPARATOR, split_qualified};
use tracing::debug;

use crate::{
    diagnostics::Diagnostics,
    discovery::MarkerType,
    model::{Annotation, Declarations}
};

/// Type used in the generated signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// No type configured: `Dynamic` / `Box<Dynamic>`.
    Dynamic,
    /// Configured type.
    Named {
        /// Name written in the signature.
        display: String,
        /// Path to import, when the type is a plain qualified path.
        import:  Option<String>
    }
}

impl TypeRef {
    /// Interpret a configured type name; blank means dynamic.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() {
            return Self::Dynamic;
        }
        if is_importable(name) {
            return Self::Named {
                display: split_qualified(name).1.to_owned(),
                import:  Some(name.to_owned())
            };
        }
        Self::Named {
            display: name.to_owned(),
            import:  None
        }
    }

    /// Check for the dynamic form.
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic)
    }
}

/// Qualified, non-generic path.
fn is_importable(path: &str) -> bool {
    path.contains(PATH_SEPARATOR)
        && !path.ends_with(PATH_SEPARATOR)
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == ':')
}

/// Structured source of one evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Declaration the evaluator is generated for.
    pub element:          String,
    /// Marker the expression comes from.
    pub marker:           String,
    /// Registry key, from the naming pattern.
    pub qualified_name:   String,
    /// Package part of the qualified name, possibly empty.
    pub package:          String,
    /// Class part of the qualified name.
    pub class_name:       String,
    /// Rust identifier of the generated struct.
    pub ident:            String,
    /// Context parameter name.
    pub context_variable: String,
    /// Context type.
    pub context_type:     TypeRef,
    /// Return type.
    pub return_type:      TypeRef,
    /// Expression, terminated by `;`.
    pub body:             String,
    /// Verbatim inherent items, possibly empty.
    pub custom_methods:   String,
    /// Attribute names stamped on the struct.
    pub markers:          Vec<String>,
    /// Sorted `use` paths.
    pub imports:          Vec<String>
}

impl Artifact {
    /// Package segments, empty for the root package.
    pub fn package_segments(&self) -> impl Iterator<Item = &str> {
        self.package
            .split(PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
    }

    /// Snake-case name of the module wrapping this artifact in the index.
    pub fn module_name(&self) -> String {
        self.ident.to_case(Case::Snake)
    }
}

/// Declaration carrying a marker usage.
#[derive(Debug, Clone, Copy)]
struct Element<'a> {
    class:          &'a str,
    method:         Option<&'a str>,
    inherited_from: Option<&'a str>,
    annotation:     &'a Annotation
}

impl Element<'_> {
    /// `app::Dummy`, `app::Dummy::run` or `<app::Dummy as Handler>::run`.
    fn name(&self) -> String {
        match (self.method, self.inherited_from) {
            (Some(method), Some(trait_path)) => {
                format!("<{} as {trait_path}>{PATH_SEPARATOR}{method}", self.class)
            }
            (Some(method), None) => format!("{}{PATH_SEPARATOR}{method}", self.class),
            (None, _) => self.class.to_owned()
        }
    }
}

/// Build the artifacts of every usage of `markers`.
///
/// `runtime` is the path of the runtime crate in generated code, e.g. `::jel`.
pub fn generate(
    declarations: &Declarations,
    markers: &[MarkerType],
    runtime: &str,
    diagnostics: &mut Diagnostics
) -> Vec<Artifact> {
    let mut artifacts: Vec<Artifact> = Vec::new();
    let mut names = HashSet::new();
    let mut idents = HashSet::new();

    for marker in markers {
        for element in elements(declarations, &marker.name, diagnostics) {
            let Some(artifact) = build(marker, &element, runtime, diagnostics) else {
                continue;
            };

            if !names.insert(artifact.qualified_name.clone()) {
                diagnostics.error(
                    element.name(),
                    format!("evaluator `{}` is generated twice", artifact.qualified_name)
                );
                continue;
            }
            if !idents.insert((artifact.package.clone(), artifact.ident.clone())) {
                diagnostics.error(
                    element.name(),
                    format!(
                        "evaluator `{}` maps to `{}` in `{}`, which is already taken",
                        artifact.qualified_name, artifact.ident, artifact.package
                    )
                );
                continue;
            }

            if let (Some(method), Some(trait_path)) = (element.method, element.inherited_from) {
                diagnostics.note(
                    element.name(),
                    format!(
                        "implemented from `{trait_path}`; call sites find `{}` by method name `{method}` only",
                        artifact.qualified_name
                    )
                );
            }
            debug!(element = %artifact.element, evaluator = %artifact.qualified_name, "artifact built");
            artifacts.push(artifact);
        }
    }

    artifacts
}

/// Declarations directly annotated with `marker`, in declaration order.
///
/// A declaration yields one element for its first usage of `marker`; further
/// usages would map to the same evaluator and are reported.
fn elements<'a>(
    declarations: &'a Declarations,
    marker: &str,
    diagnostics: &mut Diagnostics
) -> Vec<Element<'a>> {
    let mut found = Vec::new();

    for declaration in declarations.types() {
        let sites = std::iter::once((
            None,
            None,
            declaration.module(),
            declaration.annotations.as_slice()
        ))
        .chain(declaration.methods.iter().map(|method| {
            (
                Some(method.name.as_str()),
                method.inherited_from.as_deref(),
                method.module.as_str(),
                method.annotations.as_slice()
            )
        }));

        for (method, inherited_from, module, annotations) in sites {
            let mut usages = annotations.iter().filter(|annotation| {
                declarations
                    .resolve_name(module, &annotation.name)
                    .is_some_and(|name| name == marker)
            });
            let Some(annotation) = usages.next() else {
                continue;
            };

            let element = Element {
                class: &declaration.name,
                method,
                inherited_from,
                annotation
            };
            let repeated = usages.count();
            if repeated > 0 {
                diagnostics.error(
                    element.name(),
                    format!(
                        "`{marker}` is used {} times; only the first usage generates an evaluator",
                        repeated + 1
                    )
                );
            }
            found.push(element);
        }
    }
    found
}

fn build(
    marker: &MarkerType,
    element: &Element<'_>,
    runtime: &str,
    diagnostics: &mut Diagnostics
) -> Option<Artifact> {
    let descriptor = &marker.descriptor;
    let member = &descriptor.expression_element_name;

    let Some(value) = element.annotation.get(member) else {
        diagnostics.error(
            element.name(),
            format!("`{}` usage has no `{member}`", element.annotation.name)
        );
        return None;
    };
    let Some(expression) = value.as_text() else {
        diagnostics.error(
            element.name(),
            format!("`{}` member `{member}` is not an expression", element.annotation.name)
        );
        return None;
    };

    let qualified_name = match descriptor
        .naming()
        .evaluator_name(element.class, element.method)
    {
        Ok(name) => name,
        Err(err) => {
            diagnostics.error(element.name(), err.to_string());
            return None;
        }
    };

    let (package, class_name) = split_qualified(&qualified_name);
    if let Some(segment) = package
        .split(PATH_SEPARATOR)
        .find(|segment| !package.is_empty() && !is_ident(segment))
    {
        diagnostics.error(
            element.name(),
            format!("evaluator `{qualified_name}` has package segment `{segment}`, which is not a module name")
        );
        return None;
    }
    let Some(ident) = struct_ident(class_name) else {
        diagnostics.error(
            element.name(),
            format!("evaluator `{qualified_name}` has no usable type name")
        );
        return None;
    };

    let context_type = TypeRef::parse(&descriptor.context_type);
    let return_type = TypeRef::parse(&descriptor.return_type);
    let imports = imports(
        runtime,
        &context_type,
        &return_type,
        descriptor.imports.iter().chain(&descriptor.evaluator_markers)
    );
    let markers = descriptor
        .evaluator_markers
        .iter()
        .map(|path| split_qualified(path.trim()).1.to_owned())
        .filter(|name| !name.is_empty())
        .collect();

    Some(Artifact {
        element: element.name(),
        marker: marker.name.clone(),
        package: package.to_owned(),
        class_name: class_name.to_owned(),
        ident,
        context_variable: descriptor.context_variable_name.clone(),
        context_type,
        return_type,
        body: terminate(expression),
        custom_methods: descriptor.custom_methods.clone(),
        markers,
        imports,
        qualified_name
    })
}

fn imports<'a>(
    runtime: &str,
    context_type: &TypeRef,
    return_type: &TypeRef,
    extra: impl Iterator<Item = &'a String>
) -> Vec<String> {
    let mut imports = BTreeSet::new();
    imports.insert(format!("{runtime}{PATH_SEPARATOR}Evaluator"));
    if context_type.is_dynamic() || return_type.is_dynamic() {
        imports.insert(format!("{runtime}{PATH_SEPARATOR}Dynamic"));
    }
    for type_ref in [context_type, return_type] {
        if let TypeRef::Named {
            import: Some(path), ..
        } = type_ref
        {
            imports.insert(path.clone());
        }
    }
    imports.extend(
        extra
            .map(|path| path.trim())
            .filter(|path| is_importable(path))
            .map(str::to_owned)
    );
    imports.into_iter().collect()
}

/// Append `;` unless the expression already ends with one.
fn terminate(expression: &str) -> String {
    let trimmed = expression.trim_end();
    if trimmed.ends_with(';') {
        trimmed.to_owned()
    } else {
        format!("{trimmed};")
    }
}

/// PascalCase identifier from the alphanumeric runs of `class_name`.
///
/// `Dummy$eval_method$SimpleJelEvaluator` → `DummyEvalMethodSimpleJelEvaluator`.
pub fn struct_ident(class_name: &str) -> Option<String> {
    let ident: String = class_name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_case(Case::Pascal))
        .collect();
    is_ident(&ident).then_some(ident)
}

fn is_ident(name: &str) -> bool {
    syn::parse_str::<syn::Ident>(name).is_ok()
}
