// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Host-independent declaration model.
//!
//! Discovery and generation never look at source text. They work on this
//! model, which the [`source`](crate::source) front end fills from Rust files
//! and tests can build by hand.
//!
//! # Structure
//!
//! ```text
//! Declarations
//! ├── types[]            TypeDecl
//! │   ├── name           crate::module::Name
//! │   ├── annotations[]  Annotation { name, values[] }
//! │   ├── members[]      named fields
//! │   └── methods[]      MethodDecl { name, module, annotations[], inherited_from }
//! └── scopes             module → `use` aliases and glob imports
//! ```
//!
//! # Name resolution
//!
//! Annotation names are paths as written at the use site. [`Declarations::resolve`]
//! maps them to a declared type, trying in order:
//!
//! | Step | Example (`SecuredBy` used in `app::api`) |
//! |------|-------------------------------------------|
//! | `crate` / `self` / `super` prefix | `crate::auth::SecuredBy` → `app::auth::SecuredBy` |
//! | relative to the module | `app::api::SecuredBy` |
//! | `use` alias of the first segment | `use crate::auth::SecuredBy;` |
//! | glob import | `use crate::auth::*;` |
//! | absolute path | `app::auth::SecuredBy` |
//! | unique simple name | the only type called `SecuredBy` |

use std::collections::HashMap;

use jel_core::naming::{PATH_SEPARATOR, split_qualified};

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `struct`
    Struct,
    /// `enum`
    Enum,
    /// `union`
    Union
}

/// Value of one annotation member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    /// String literal.
    Str(String),
    /// Boolean literal or bare flag.
    Bool(bool),
    /// `key(a::B, "c")` or `key = [..]`.
    List(Vec<String>),
    /// Anything else, as token text.
    Raw(String)
}

impl AnnotationValue {
    /// Textual value usable as an expression.
    ///
    /// Strings come back unquoted, raw tokens as written. Flags and lists
    /// have no textual form.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Str(text) | Self::Raw(text) => Some(text),
            Self::Bool(_) | Self::List(_) => None
        }
    }
}

/// Annotation attached to a type, method or marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Path of the annotation type as written.
    pub name:   String,
    /// Members in declaration order.
    pub values: Vec<(String, AnnotationValue)>
}

impl Annotation {
    /// Annotation without members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:   name.into(),
            values: Vec::new()
        }
    }

    /// Add a member.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.push((key.into(), value));
        self
    }

    /// Value of member `key`.
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.values
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Last path segment of the name.
    pub fn simple_name(&self) -> &str {
        split_qualified(&self.name).1
    }
}

/// Method of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Simple method name.
    pub name:           String,
    /// Module of the `impl` block, used to resolve annotation names.
    pub module:         String,
    /// Directly attached annotations.
    pub annotations:    Vec<Annotation>,
    /// Trait the method implements, `None` for inherent methods.
    pub inherited_from: Option<String>
}

/// Type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Qualified name, `crate::module::Name`.
    pub name:        String,
    /// Declaration kind.
    pub kind:        TypeKind,
    /// Directly attached annotations.
    pub annotations: Vec<Annotation>,
    /// Named fields.
    pub members:     Vec<String>,
    /// Methods from inherent and trait impls.
    pub methods:     Vec<MethodDecl>
}

impl TypeDecl {
    /// Empty struct declaration named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:        name.into(),
            kind:        TypeKind::Struct,
            annotations: Vec::new(),
            members:     Vec::new(),
            methods:     Vec::new()
        }
    }

    /// Module the type is declared in.
    pub fn module(&self) -> &str {
        split_qualified(&self.name).0
    }

    /// Simple type name.
    pub fn simple_name(&self) -> &str {
        split_qualified(&self.name).1
    }

    /// Check for a named field.
    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|member| member == name)
    }
}

/// `use` declarations of one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Alias → imported path, as written.
    pub aliases: HashMap<String, String>,
    /// Prefixes of glob imports, as written.
    pub globs:   Vec<String>
}

/// Every declaration visible to one generator run.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    types:  Vec<TypeDecl>,
    index:  HashMap<String, usize>,
    scopes: HashMap<String, Scope>
}

impl Declarations {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type.
    ///
    /// Returns `false` and keeps the declaration already known when the name
    /// is taken, as with `cfg` alternatives of one type.
    pub fn push(&mut self, declaration: TypeDecl) -> bool {
        if self.index.contains_key(&declaration.name) {
            return false;
        }
        self.index
            .insert(declaration.name.clone(), self.types.len());
        self.types.push(declaration);
        true
    }

    /// Keep only the types for which `keep` holds.
    pub fn retain(&mut self, mut keep: impl FnMut(&TypeDecl) -> bool) {
        self.types.retain(|declaration| keep(declaration));
        self.index = self
            .types
            .iter()
            .enumerate()
            .map(|(position, declaration)| (declaration.name.clone(), position))
            .collect();
    }

    /// Record the `use` declarations of `module`.
    pub fn set_scope(&mut self, module: impl Into<String>, scope: Scope) {
        self.scopes.insert(module.into(), scope);
    }

    /// Types in insertion order.
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    /// Mutable access to the type named `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TypeDecl> {
        let position = *self.index.get(name)?;
        self.types.get_mut(position)
    }

    /// Type with qualified name `name`.
    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.index
            .get(name)
            .and_then(|&position| self.types.get(position))
    }

    /// Number of types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no type is declared.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolve `path`, written inside `module`, to a declared type.
    pub fn resolve(&self, module: &str, path: &str) -> Option<&TypeDecl> {
        self.resolve_name(module, path)
            .and_then(|name| self.get(&name))
    }

    /// Qualified name `path` refers to when written inside `module`.
    pub fn resolve_name(&self, module: &str, path: &str) -> Option<String> {
        if let Some(absolute) = path.strip_prefix(PATH_SEPARATOR) {
            return self.index.contains_key(absolute).then(|| absolute.to_owned());
        }

        if let Some(name) = anchored(module, path) {
            return self.index.contains_key(&name).then_some(name);
        }

        let relative = join(module, path);
        if self.index.contains_key(&relative) {
            return Some(relative);
        }

        if let Some(scope) = self.scopes.get(module) {
            let (first, rest) = match path.split_once(PATH_SEPARATOR) {
                Some((first, rest)) => (first, Some(rest)),
                None => (path, None)
            };
            if let Some(target) = scope.aliases.get(first) {
                let target = rest.map_or_else(|| target.clone(), |rest| join(target, rest));
                if let Some(name) = self.resolve_import(module, &target) {
                    return Some(name);
                }
            }
            for glob in &scope.globs {
                if let Some(name) = self.resolve_import(module, &join(glob, path)) {
                    return Some(name);
                }
            }
        }

        if self.index.contains_key(path) {
            return Some(path.to_owned());
        }

        let simple = split_qualified(path).1;
        let mut candidates = self
            .types
            .iter()
            .filter(|declaration| declaration.simple_name() == simple);
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Some(only.name.clone()),
            _ => None
        }
    }

    fn resolve_import(&self, module: &str, target: &str) -> Option<String> {
        let candidates = [
            anchored(module, target),
            Some(join(module, target)),
            Some(target.to_owned())
        ];
        candidates
            .into_iter()
            .flatten()
            .find(|name| self.index.contains_key(name))
    }
}

/// Expand a leading `crate`, `self` or `super` segment.
///
/// The crate name is the first segment of `module`.
fn anchored(module: &str, path: &str) -> Option<String> {
    let mut segments = path.split(PATH_SEPARATOR).peekable();
    let mut base: Vec<&str> = match segments.peek().copied() {
        Some("crate") => {
            segments.next();
            module.split(PATH_SEPARATOR).take(1).collect()
        }
        Some("self") => {
            segments.next();
            module.split(PATH_SEPARATOR).collect()
        }
        Some("super") => module.split(PATH_SEPARATOR).collect(),
        _ => return None
    };

    while segments.peek() == Some(&"super") {
        segments.next();
        if base.len() > 1 {
            base.pop();
        }
    }

    base.extend(segments);
    Some(base.join(PATH_SEPARATOR))
}

fn join(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_owned()
    } else {
        format!("{prefix}{PATH_SEPARATOR}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declarations() -> Declarations {
        let mut declarations = Declarations::new();
        declarations.push(TypeDecl::new("app::auth::SecuredBy"));
        declarations.push(TypeDecl::new("app::api::Orders"));
        declarations.push(TypeDecl::new("app::api::admin::Panel"));
        declarations.push(TypeDecl::new("app::Claims"));
        declarations.push(TypeDecl::new("app::other::Claims"));
        declarations
    }

    #[test]
    fn annotation_members() {
        let annotation = Annotation::new("jel::mark")
            .with("value", AnnotationValue::Str("true".to_string()))
            .with("strict", AnnotationValue::Bool(true));

        assert_eq!(annotation.simple_name(), "mark");
        assert_eq!(annotation.get("value").and_then(AnnotationValue::as_text), Some("true"));
        assert_eq!(annotation.get("strict").and_then(AnnotationValue::as_text), None);
        assert!(annotation.get("missing").is_none());
    }

    #[test]
    fn anchored_paths() {
        let declarations = declarations();
        let found = |module: &str, path: &str| declarations.resolve_name(module, path);

        assert_eq!(found("app::api", "crate::auth::SecuredBy").as_deref(), Some("app::auth::SecuredBy"));
        assert_eq!(found("app::api", "self::Orders").as_deref(), Some("app::api::Orders"));
        assert_eq!(found("app::api::admin", "super::Orders").as_deref(), Some("app::api::Orders"));
        assert_eq!(found("app::api::admin", "super::super::Claims").as_deref(), Some("app::Claims"));
        assert_eq!(found("app::api", "crate::auth::Missing"), None);
    }

    #[test]
    fn relative_and_absolute_paths() {
        let declarations = declarations();
        assert_eq!(
            declarations.resolve_name("app::api", "admin::Panel").as_deref(),
            Some("app::api::admin::Panel")
        );
        assert_eq!(
            declarations.resolve_name("app::api", "app::auth::SecuredBy").as_deref(),
            Some("app::auth::SecuredBy")
        );
        assert_eq!(
            declarations.resolve_name("app::api", "::app::Claims").as_deref(),
            Some("app::Claims")
        );
    }

    #[test]
    fn use_aliases_and_globs() {
        let mut declarations = declarations();
        let mut scope = Scope::default();
        scope
            .aliases
            .insert("Guard".to_string(), "crate::auth::SecuredBy".to_string());
        scope.aliases.insert("admin_mod".to_string(), "admin".to_string());
        scope.globs.push("crate::other".to_string());
        declarations.set_scope("app::api", scope);

        let found = |path: &str| declarations.resolve_name("app::api", path);
        assert_eq!(found("Guard").as_deref(), Some("app::auth::SecuredBy"));
        assert_eq!(found("admin_mod::Panel").as_deref(), Some("app::api::admin::Panel"));
        assert_eq!(found("Claims").as_deref(), Some("app::other::Claims"));
    }

    #[test]
    fn unique_simple_name_fallback() {
        let declarations = declarations();
        assert_eq!(
            declarations.resolve_name("app::api", "SecuredBy").as_deref(),
            Some("app::auth::SecuredBy")
        );
        assert_eq!(declarations.resolve_name("app::unrelated", "Claims"), None);
    }

    #[test]
    fn push_keeps_first_declaration() {
        let mut declarations = declarations();
        let mut replacement = TypeDecl::new("app::Claims");
        replacement.members.push("sub".to_string());

        assert!(!declarations.push(replacement));
        assert_eq!(declarations.len(), 5);
        assert!(!declarations.get("app::Claims").unwrap().has_member("sub"));
    }

    #[test]
    fn retain_reindexes() {
        let mut declarations = declarations();
        declarations.retain(|declaration| !declaration.name.starts_with("app::api"));

        assert_eq!(declarations.len(), 3);
        assert!(declarations.get("app::api::Orders").is_none());
        assert_eq!(declarations.get("app::Claims").map(|d| d.name.as_str()), Some("app::Claims"));
        assert_eq!(
            declarations.resolve_name("app", "other::Claims").as_deref(),
            Some("app::other::Claims")
        );
    }
}
