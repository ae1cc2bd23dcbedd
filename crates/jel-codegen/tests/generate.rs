// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end generation over a crate laid out on disk.

use std::{fs, path::Path};

use jel_codegen::{Builder, CodegenError};

const MARKERS: &str = r#"
use jel::{mark, meta_jel};

#[meta_jel]
pub struct Evaluable {
    pub value: &'static str
}

#[meta_jel(
    context_variable_name = "jwt",
    context_type = "crate::auth::Claims",
    return_type = "bool",
    evaluator_class_name_pattern = "${class}$MpJwtSecuredBy",
    evaluator_method_name_pattern = "${class}_${method}$MpJwtSecuredBy"
)]
pub struct SecuredBy {
    pub value: &'static str
}

pub mod auth {
    pub struct Claims;
}

pub mod foo;
"#;

const FOO: &str = r#"
use crate::{Evaluable, SecuredBy};

#[jel::mark(Evaluable = "return 1 + 1")]
pub struct Dummy;

impl Dummy {
    #[mark(Evaluable = "return 1 + 2")]
    pub fn eval_method(&self) {}

    #[mark(SecuredBy("return true"))]
    pub fn secured(&self) {}
}

#[cfg(test)]
mod tests {
    #[super::mark(Evaluable = "unreachable")]
    struct Fixture;
}
"#;

fn write_crate(root: &Path, lib: &str, foo: &str) {
    let src = root.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("lib.rs"), lib).unwrap();
    fs::write(src.join("foo.rs"), foo).unwrap();
}

fn builder(root: &Path) -> Builder {
    Builder::new()
        .source_dir(root.join("src"))
        .crate_name("app")
        .out_dir(root.join("out"))
        .emit_rerun_if_changed(false)
        .cargo_warnings(false)
}

#[test]
fn generates_evaluators_and_index() {
    let dir = tempfile::tempdir().unwrap();
    write_crate(dir.path(), MARKERS, FOO);

    let output = builder(dir.path()).compile().unwrap();

    let names: Vec<_> = output
        .artifacts
        .iter()
        .map(|artifact| artifact.qualified_name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "app::foo::Dummy$SimpleJelEvaluator",
            "app::foo::Dummy$eval_method$SimpleJelEvaluator",
            "app::foo::Dummy_secured$MpJwtSecuredBy"
        ]
    );

    let out = fs::canonicalize(dir.path().join("out")).unwrap();
    let class_level = fs::read_to_string(out.join("app/foo/DummySimpleJelEvaluator.rs")).unwrap();
    assert!(class_level.contains("return 1 + 1;"));
    let secured = fs::read_to_string(out.join("app/foo/DummySecuredMpJwtSecuredBy.rs")).unwrap();
    assert!(secured.contains("use crate::auth::Claims;"));
    assert!(secured.contains("fn evaluate(&self, jwt: &Claims) -> bool {"));

    let index_path = output.index.unwrap();
    assert_eq!(index_path, out.join("evaluators.rs"));
    let index = fs::read_to_string(&index_path).unwrap();
    assert!(index.contains("registry.register::<self::app::foo::DummySimpleJelEvaluator>"));
    assert!(!index.contains("Fixture"));

    for file in output.files.iter().chain(std::iter::once(&index_path)) {
        syn::parse_file(&fs::read_to_string(file).unwrap()).unwrap();
    }
}

#[test]
fn regeneration_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    write_crate(dir.path(), MARKERS, FOO);

    let first = builder(dir.path()).compile().unwrap();
    let before: Vec<String> = first
        .files
        .iter()
        .map(|file| fs::read_to_string(file).unwrap())
        .collect();

    let second = builder(dir.path()).compile().unwrap();
    let after: Vec<String> = second
        .files
        .iter()
        .map(|file| fs::read_to_string(file).unwrap())
        .collect();

    assert_eq!(first.files, second.files);
    assert_eq!(before, after);
}

#[test]
fn errors_fail_the_build_after_other_artifacts_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let broken = MARKERS.replace("${class}_${method}$MpJwtSecuredBy", "${class}_${methd}$MpJwtSecuredBy");
    write_crate(dir.path(), &broken, FOO);

    let err = builder(dir.path()).compile().unwrap_err();
    assert!(matches!(err, CodegenError::Failed { count: 1 }));

    let out = dir.path().join("out");
    assert!(out.join("app/foo/DummySimpleJelEvaluator.rs").exists());
    assert!(out.join("app/foo/DummyEvalMethodSimpleJelEvaluator.rs").exists());
    assert!(!out.join("app/foo/DummySecuredMpJwtSecuredBy.rs").exists());
    assert!(out.join("evaluators.rs").exists());
}

#[test]
fn invalid_file_is_reported_not_fatal_for_others() {
    let dir = tempfile::tempdir().unwrap();
    write_crate(dir.path(), MARKERS, FOO);
    fs::write(dir.path().join("src/broken.rs"), "pub struct {").unwrap();

    let err = builder(dir.path()).compile().unwrap_err();
    assert!(matches!(err, CodegenError::Failed { count: 1 }));
    assert!(dir.path().join("out/app/foo/DummySimpleJelEvaluator.rs").exists());
}
