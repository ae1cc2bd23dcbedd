// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `syn` front end: Rust sources → [`Declarations`].
//!
//! # Walk
//!
//! ```text
//! file (module path from its location under the source root)
//! ├── struct / enum / union   → TypeDecl        (attributes → annotations)
//! ├── impl [Trait for] Type   → MethodDecl[]    (attached after all files)
//! ├── use ...                 → Scope           (aliases, globs)
//! └── mod name { .. }         → recurse         (nested declarations)
//! ```
//!
//! `#[cfg(test)]` items and modules are skipped: evaluators generated for
//! them would reference types that only exist in test builds. For a
//! file-based `#[cfg(test)] mod tests;` the module's file is still read, and
//! its declarations are dropped in [`SourceParser::finish`].
//!
//! A type declared twice in one module (`cfg` alternatives) keeps its first
//! declaration and is reported as a warning.
//!
//! # Module paths
//!
//! | File under the root | Module |
//! |---------------------|--------|
//! | `lib.rs`, `main.rs` | `crate` |
//! | `api.rs`, `api/mod.rs` | `crate::api` |
//! | `api/admin.rs` | `crate::api::admin` |
//! | `bin/*.rs` | skipped (separate crates) |

pub mod attributes;

use std::{
    fs,
    path::{Component, Path}
};

use jel_core::naming::split_qualified;
use syn::{Fields, ImplItem, Item, Type, UseTree};
use tracing::debug;

use self::attributes::{annotations, is_cfg_test, is_mark, path_to_string};
use crate::{
    diagnostics::Diagnostics,
    error::SourceError,
    model::{Declarations, MethodDecl, Scope, TypeDecl, TypeKind}
};

/// Methods waiting for their type to be known.
#[derive(Debug)]
struct PendingImpl {
    module:  String,
    self_ty: String,
    methods: Vec<MethodDecl>,
    marked:  bool
}

/// Collects declarations from the files of one crate.
#[derive(Debug)]
pub struct SourceParser {
    crate_name:   String,
    declarations: Declarations,
    impls:        Vec<PendingImpl>,
    test_modules: Vec<String>,
    duplicates:   Vec<String>
}

impl SourceParser {
    /// Parser for crate `crate_name` (as it appears in `type_name`).
    pub fn new(crate_name: impl Into<String>) -> Self {
        Self {
            crate_name:   crate_name.into(),
            declarations: Declarations::new(),
            impls:        Vec::new(),
            test_modules: Vec::new(),
            duplicates:   Vec::new()
        }
    }

    /// Crate name used as first path segment.
    pub fn crate_name(&self) -> &str {
        &self.crate_name
    }

    /// Parse `file`, located under `root`.
    ///
    /// Returns `Ok(false)` when the file does not belong to the crate's
    /// module tree.
    ///
    /// # Errors
    ///
    /// [`SourceError`] when the file cannot be read or parsed.
    pub fn parse_file(&mut self, root: &Path, file: &Path) -> Result<bool, SourceError> {
        let Some(segments) = module_segments(root, file) else {
            debug!(file = %file.display(), "not part of the module tree, skipped");
            return Ok(false);
        };

        let source = fs::read_to_string(file).map_err(|source| SourceError::Io {
            path: file.to_path_buf(),
            source
        })?;
        self.parse_str(&segments, &source)
            .map_err(|source| SourceError::Parse {
                path: file.to_path_buf(),
                source
            })?;

        Ok(true)
    }

    /// Parse `source` as the module at `segments` below the crate root.
    ///
    /// # Errors
    ///
    /// Invalid Rust or a malformed `mark` container.
    pub fn parse_str(&mut self, segments: &[String], source: &str) -> syn::Result<()> {
        let file = syn::parse_file(source)?;
        let module = std::iter::once(self.crate_name.as_str())
            .chain(segments.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("::");
        self.visit(&module, &file.items)
    }

    /// Attach methods to their types and return the model.
    ///
    /// Declarations of file-based test modules are dropped. Marked methods of
    /// types outside the scanned sources and repeated type declarations are
    /// reported as warnings.
    pub fn finish(mut self, diagnostics: &mut Diagnostics) -> Declarations {
        let test_modules = std::mem::take(&mut self.test_modules);
        let in_tests = |module: &str| {
            test_modules.iter().any(|test| {
                module
                    .strip_prefix(test.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
            })
        };

        if !test_modules.is_empty() {
            self.declarations
                .retain(|declaration| !in_tests(declaration.module()));
            self.impls.retain(|pending| !in_tests(&pending.module));
        }
        for name in std::mem::take(&mut self.duplicates) {
            if !in_tests(split_qualified(&name).0) {
                diagnostics.warning(name, "type declared more than once, the first declaration is used");
            }
        }

        for pending in std::mem::take(&mut self.impls) {
            let target = self
                .declarations
                .resolve_name(&pending.module, &pending.self_ty);
            match target.and_then(|name| self.declarations.get_mut(&name)) {
                Some(declaration) => declaration.methods.extend(pending.methods),
                None if pending.marked => diagnostics.warning(
                    format!("{}::{}", pending.module, pending.self_ty),
                    "impl of a type outside the scanned sources, its marked methods are ignored"
                ),
                None => {}
            }
        }
        self.declarations
    }

    fn visit(&mut self, module: &str, items: &[Item]) -> syn::Result<()> {
        let mut scope = Scope::default();

        for item in items {
            match item {
                Item::Struct(item) if !is_cfg_test(&item.attrs) => {
                    let members = named_fields(&item.fields);
                    self.push_type(module, &item.ident, TypeKind::Struct, &item.attrs, members)?;
                }
                Item::Enum(item) if !is_cfg_test(&item.attrs) => {
                    self.push_type(module, &item.ident, TypeKind::Enum, &item.attrs, Vec::new())?;
                }
                Item::Union(item) if !is_cfg_test(&item.attrs) => {
                    let members = item
                        .fields
                        .named
                        .iter()
                        .filter_map(|field| field.ident.as_ref().map(ToString::to_string))
                        .collect();
                    self.push_type(module, &item.ident, TypeKind::Union, &item.attrs, members)?;
                }
                Item::Impl(item) if !is_cfg_test(&item.attrs) => self.push_impl(module, item)?,
                Item::Mod(item) if !is_cfg_test(&item.attrs) => {
                    if let Some((_, content)) = &item.content {
                        self.visit(&format!("{module}::{}", item.ident), content)?;
                    }
                }
                Item::Mod(item) if item.content.is_none() => {
                    debug!(module = %module, name = %item.ident, "test module, declarations of its file are dropped");
                    self.test_modules
                        .push(format!("{module}::{}", item.ident));
                }
                Item::Use(item) => {
                    let mut prefix = Vec::new();
                    collect_use(&mut prefix, item.leading_colon.is_some(), &item.tree, &mut scope);
                }
                _ => {}
            }
        }

        if scope != Scope::default() {
            self.declarations.set_scope(module, scope);
        }
        Ok(())
    }

    fn push_type(
        &mut self,
        module: &str,
        ident: &syn::Ident,
        kind: TypeKind,
        attrs: &[syn::Attribute],
        members: Vec<String>
    ) -> syn::Result<()> {
        let mut declaration = TypeDecl::new(format!("{module}::{ident}"));
        declaration.kind = kind;
        declaration.annotations = annotations(attrs)?;
        declaration.members = members;
        let name = declaration.name.clone();
        if !self.declarations.push(declaration) {
            self.duplicates.push(name);
        }
        Ok(())
    }

    fn push_impl(&mut self, module: &str, item: &syn::ItemImpl) -> syn::Result<()> {
        let Type::Path(self_ty) = item.self_ty.as_ref() else {
            return Ok(());
        };
        if self_ty.qself.is_some() {
            return Ok(());
        }

        let inherited_from = item
            .trait_
            .as_ref()
            .map(|(_, path, _)| path_to_string(path));
        let mut methods = Vec::new();
        let mut marked = false;

        for impl_item in &item.items {
            let ImplItem::Fn(function) = impl_item else {
                continue;
            };
            if is_cfg_test(&function.attrs) {
                continue;
            }
            marked |= function.attrs.iter().any(|attr| is_mark(attr.path()));
            methods.push(MethodDecl {
                name:           function.sig.ident.to_string(),
                module:         module.to_owned(),
                annotations:    annotations(&function.attrs)?,
                inherited_from: inherited_from.clone()
            });
        }

        if !methods.is_empty() {
            self.impls.push(PendingImpl {
                module: module.to_owned(),
                self_ty: path_to_string(&self_ty.path),
                methods,
                marked
            });
        }
        Ok(())
    }
}

fn named_fields(fields: &Fields) -> Vec<String> {
    match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|field| field.ident.as_ref().map(ToString::to_string))
            .collect(),
        Fields::Unnamed(_) | Fields::Unit => Vec::new()
    }
}

fn collect_use(prefix: &mut Vec<String>, absolute: bool, tree: &UseTree, scope: &mut Scope) {
    let joined = |prefix: &[String], last: Option<&str>| {
        let mut segments = prefix.to_vec();
        segments.extend(last.map(str::to_owned));
        let path = segments.join("::");
        if absolute { format!("::{path}") } else { path }
    };

    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_use(prefix, absolute, &path.tree, scope);
            prefix.pop();
        }
        UseTree::Name(name) if name.ident == "self" => {
            if let Some(last) = prefix.last() {
                scope.aliases.insert(last.clone(), joined(prefix, None));
            }
        }
        UseTree::Name(name) => {
            let ident = name.ident.to_string();
            scope
                .aliases
                .insert(ident.clone(), joined(prefix, Some(&ident)));
        }
        UseTree::Rename(rename) if rename.rename != "_" => {
            let target = if rename.ident == "self" {
                joined(prefix, None)
            } else {
                joined(prefix, Some(&rename.ident.to_string()))
            };
            scope.aliases.insert(rename.rename.to_string(), target);
        }
        UseTree::Rename(_) => {}
        UseTree::Glob(_) => scope.globs.push(joined(prefix, None)),
        UseTree::Group(group) => {
            for item in &group.items {
                collect_use(prefix, absolute, item, scope);
            }
        }
    }
}

/// Module segments of `file` below the crate root `root`.
///
/// `None` for files outside `root`, binaries, and names that are not
/// identifiers.
pub fn module_segments(root: &Path, file: &Path) -> Option<Vec<String>> {
    let relative = file.strip_prefix(root).ok()?;
    let mut segments = Vec::new();

    for component in relative.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str()?.to_owned()),
            Component::CurDir => {}
            _ => return None
        }
    }

    let file_name = segments.pop()?;
    let stem = file_name.strip_suffix(".rs")?;
    if segments.first().is_some_and(|first| first == "bin") {
        return None;
    }

    match stem {
        "lib" | "main" if segments.is_empty() => {}
        "mod" if !segments.is_empty() => {}
        _ => segments.push(stem.to_owned())
    }

    segments
        .iter()
        .all(|segment| syn::parse_str::<syn::Ident>(segment).is_ok())
        .then_some(segments)
}
