// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Text emission.
//!
//! The only place where generated source text is assembled. Everything here
//! is a pure function of its input, so identical artifacts always render to
//! identical bytes.
//!
//! # Evaluator layout
//!
//! ```text
//! // @generated header
//! use ...;                       sorted imports
//! #[derive(..)] #[Marker]        evaluator markers, short names
//! pub struct Ident;
//! impl Evaluator for Ident { fn evaluate(&self, <var>: &<Context>) -> <Output> { <body> } }
//! impl Ident { <custom methods> }  only when configured
//! ```
//!
//! # Index layout
//!
//! One `pub mod` per package segment; each artifact is included into a
//! private module of its own (so imports of different artifacts never
//! clash) and re-exported. A `register` function binds every qualified name
//! to its type.

use std::{
    collections::BTreeMap,
    fmt::{self, Write},
    path::Path
};

use crate::generator::{Artifact, TypeRef};

/// Marker line opening every generated file.
pub const GENERATED_MARKER: &str = "// @generated by jel-codegen";

const INDENT: &str = "    ";

/// Source of one evaluator.
pub fn render_artifact(artifact: &Artifact) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_artifact(&mut out, artifact);
    out
}

fn write_artifact(out: &mut String, artifact: &Artifact) -> fmt::Result {
    writeln!(out, "{GENERATED_MARKER} from `{}`. Do not edit.", artifact.element)?;
    writeln!(out)?;

    for import in &artifact.imports {
        writeln!(out, "#[allow(unused_imports)]")?;
        writeln!(out, "use {import};")?;
    }
    if !artifact.imports.is_empty() {
        writeln!(out)?;
    }

    let ident = &artifact.ident;
    let context = match &artifact.context_type {
        TypeRef::Dynamic => "Dynamic",
        TypeRef::Named {
            display, ..
        } => display.as_str()
    };
    let output = match &artifact.return_type {
        TypeRef::Dynamic => "Box<Dynamic>",
        TypeRef::Named {
            display, ..
        } => display.as_str()
    };

    writeln!(out, "/// Evaluator `{}`.", artifact.qualified_name)?;
    writeln!(out, "#[derive(Debug, Default, Clone, Copy)]")?;
    for marker in &artifact.markers {
        writeln!(out, "#[{marker}]")?;
    }
    writeln!(out, "pub struct {ident};")?;
    writeln!(out)?;

    writeln!(out, "impl Evaluator for {ident} {{")?;
    writeln!(out, "{INDENT}type Context = {context};")?;
    writeln!(out, "{INDENT}type Output = {output};")?;
    writeln!(out)?;
    writeln!(
        out,
        "{INDENT}#[allow(unused_variables, clippy::needless_return, clippy::redundant_closure_call)]"
    )?;
    writeln!(
        out,
        "{INDENT}fn evaluate(&self, {}: &{context}) -> {output} {{",
        artifact.context_variable
    )?;
    if artifact.return_type.is_dynamic() {
        writeln!(out, "{INDENT}{INDENT}Box::new((move || {{")?;
        writeln!(out, "{INDENT}{INDENT}{INDENT}{}", artifact.body)?;
        writeln!(out, "{INDENT}{INDENT}}})())")?;
    } else {
        writeln!(out, "{INDENT}{INDENT}{}", artifact.body)?;
    }
    writeln!(out, "{INDENT}}}")?;
    writeln!(out, "}}")?;

    if !artifact.custom_methods.trim().is_empty() {
        writeln!(out)?;
        writeln!(out, "#[allow(dead_code)]")?;
        writeln!(out, "impl {ident} {{")?;
        writeln!(out, "{}", artifact.custom_methods.trim_end())?;
        writeln!(out, "}}")?;
    }

    Ok(())
}

#[derive(Debug, Default)]
struct ModuleNode<'a> {
    children:  BTreeMap<&'a str, ModuleNode<'a>>,
    artifacts: BTreeMap<&'a str, (String, &'a Path)>
}

/// Index including every written artifact.
///
/// `entries` pairs each artifact with the absolute path it was written to;
/// `runtime` is the runtime crate path, e.g. `::jel`.
pub fn render_index(entries: &[(&Artifact, &Path)], runtime: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_index(&mut out, entries, runtime);
    out
}

fn write_index(out: &mut String, entries: &[(&Artifact, &Path)], runtime: &str) -> fmt::Result {
    writeln!(out, "{GENERATED_MARKER}. Do not edit.")?;
    writeln!(out)?;

    let mut root = ModuleNode::default();
    for (artifact, path) in entries {
        let mut node = &mut root;
        for segment in artifact.package_segments() {
            node = node.children.entry(segment).or_default();
        }
        node.artifacts
            .insert(&artifact.ident, (artifact.module_name(), *path));
    }
    write_module(out, &root, 0)?;

    let mut registrations: Vec<(&str, String)> = entries
        .iter()
        .map(|(artifact, _)| {
            let type_path = artifact
                .package_segments()
                .chain(std::iter::once(artifact.ident.as_str()))
                .collect::<Vec<_>>()
                .join("::");
            (artifact.qualified_name.as_str(), type_path)
        })
        .collect();
    registrations.sort();

    writeln!(out, "/// Register every generated evaluator under its qualified name.")?;
    writeln!(out, "pub fn register(registry: &mut {runtime}::EvaluatorRegistry) {{")?;
    if registrations.is_empty() {
        writeln!(out, "{INDENT}let _ = registry;")?;
    }
    for (name, type_path) in &registrations {
        writeln!(out, "{INDENT}registry.register::<self::{type_path}>({name:?});")?;
    }
    writeln!(out, "}}")
}

fn write_module(out: &mut String, node: &ModuleNode<'_>, depth: usize) -> fmt::Result {
    let indent = INDENT.repeat(depth);

    for (ident, (module, path)) in &node.artifacts {
        let path = path.display().to_string();
        writeln!(out, "{indent}mod {module} {{")?;
        writeln!(out, "{indent}{INDENT}include!({path:?});")?;
        writeln!(out, "{indent}}}")?;
        writeln!(out, "{indent}pub use self::{module}::{ident};")?;
        writeln!(out)?;
    }

    for (name, child) in &node.children {
        writeln!(out, "{indent}pub mod {name} {{")?;
        write_module(out, child, depth + 1)?;
        writeln!(out, "{indent}}}")?;
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn artifact(package: &str, ident: &str, dynamic: bool) -> Artifact {
        let (context_type, return_type, imports) = if dynamic {
            (
                TypeRef::Dynamic,
                TypeRef::Dynamic,
                vec!["::jel::Dynamic".to_string(), "::jel::Evaluator".to_string()]
            )
        } else {
            (
                TypeRef::Named {
                    display: "Claims".to_string(),
                    import:  Some("crate::auth::Claims".to_string())
                },
                TypeRef::Named {
                    display: "bool".to_string(),
                    import:  None
                },
                vec!["::jel::Evaluator".to_string(), "crate::auth::Claims".to_string()]
            )
        };
        Artifact {
            element: format!("{package}::Dummy"),
            marker: "app::Evaluable".to_string(),
            qualified_name: format!("{package}::{ident}$Eval"),
            package: package.to_string(),
            class_name: format!("{ident}$Eval"),
            ident: ident.to_string(),
            context_variable: if dynamic { "context" } else { "jwt" }.to_string(),
            context_type,
            return_type,
            body: "return 1 + 1;".to_string(),
            custom_methods: String::new(),
            markers: Vec::new(),
            imports
        }
    }

    #[test]
    fn dynamic_evaluator_source() {
        let source = render_artifact(&artifact("app::foo", "DummyEval", true));

        assert!(source.starts_with("// @generated by jel-codegen from `app::foo::Dummy`. Do not edit.\n"));
        assert!(source.contains("use ::jel::Dynamic;\n"));
        assert!(source.contains("pub struct DummyEval;\n"));
        assert!(source.contains("type Context = Dynamic;"));
        assert!(source.contains("type Output = Box<Dynamic>;"));
        assert!(source.contains("fn evaluate(&self, context: &Dynamic) -> Box<Dynamic> {"));
        assert!(source.contains("Box::new((move || {\n            return 1 + 1;\n        })())"));
        assert!(!source.contains("#[allow(dead_code)]"));
        syn::parse_file(&source).unwrap();
    }

    #[test]
    fn typed_evaluator_with_markers_and_custom_methods() {
        let mut secured = artifact("app::api", "EndpointCallMpJwtSecuredBy", false);
        secured.markers = vec!["Audited".to_string()];
        secured.body = "return Self::exists(jwt);".to_string();
        secured.custom_methods = "    fn exists(jwt: &Claims) -> bool {\n        !jwt.is_empty()\n    }\n".to_string();

        let source = render_artifact(&secured);
        assert!(source.contains("#[derive(Debug, Default, Clone, Copy)]\n#[Audited]\npub struct"));
        assert!(source.contains("fn evaluate(&self, jwt: &Claims) -> bool {\n        return Self::exists(jwt);\n    }"));
        assert!(source.contains("#[allow(dead_code)]\nimpl EndpointCallMpJwtSecuredBy {\n    fn exists"));
        assert!(source.find("use ::jel::Evaluator;").unwrap() < source.find("use crate::auth::Claims;").unwrap());
        syn::parse_file(&source).unwrap();
    }

    #[test]
    fn rendering_is_deterministic() {
        let artifact = artifact("app::foo", "DummyEval", true);
        assert_eq!(render_artifact(&artifact), render_artifact(&artifact));
    }

    #[test]
    fn index_nests_packages_and_registers() {
        let first = artifact("app::foo", "DummyEval", true);
        let second = artifact("app::foo::bar", "OtherEval", true);
        let rooted = artifact("", "RootEval", true);
        let first_path = PathBuf::from("/out/app/foo/DummyEval.rs");
        let second_path = PathBuf::from("/out/app/foo/bar/OtherEval.rs");
        let rooted_path = PathBuf::from("/out/RootEval.rs");

        let index = render_index(
            &[
                (&second, second_path.as_path()),
                (&first, first_path.as_path()),
                (&rooted, rooted_path.as_path())
            ],
            "::jel"
        );

        assert!(index.contains("pub mod app {\n    pub mod foo {\n        mod dummy_eval {"));
        assert!(index.contains("include!(\"/out/app/foo/DummyEval.rs\");"));
        assert!(index.contains("pub use self::dummy_eval::DummyEval;"));
        assert!(index.contains("pub mod bar {"));
        assert!(index.contains("mod root_eval {\n    include!(\"/out/RootEval.rs\");\n}"));
        assert!(index.contains("pub fn register(registry: &mut ::jel::EvaluatorRegistry) {"));
        assert!(index.contains(
            "registry.register::<self::app::foo::DummyEval>(\"app::foo::DummyEval$Eval\");"
        ));
        assert!(index.contains("registry.register::<self::RootEval>(\"::RootEval$Eval\");"));

        let foo_position = index.find("registry.register::<self::app::foo::DummyEval>").unwrap();
        let bar_position = index.find("registry.register::<self::app::foo::bar::OtherEval>").unwrap();
        assert!(foo_position < bar_position);
        syn::parse_file(&index).unwrap();
    }

    #[test]
    fn empty_index_still_compiles() {
        let index = render_index(&[], "::jel");
        assert!(index.contains("let _ = registry;"));
        syn::parse_file(&index).unwrap();
    }
}
