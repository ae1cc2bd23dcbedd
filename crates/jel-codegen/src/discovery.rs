// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Marker discovery.
//!
//! A marker is a type whose own annotations include `#[meta_jel(...)]`.
//! Discovery never looks for specific marker names; it walks what is used:
//!
//! ```text
//! for every type and each of its methods
//!     annotations on the declaration
//!   + annotations on the types those annotations name      (one level only)
//!   → keep the types that carry `meta_jel`
//! distinct markers, sorted by name
//!   → descriptor read once per marker, defaults applied
//! ```
//!
//! A marker whose descriptor is unusable (wrong value types, a missing
//! expression member) is reported and left out; the others go on.

use std::collections::BTreeSet;

use jel_core::{Descriptor, NamingConvention};

use crate::{
    diagnostics::Diagnostics,
    model::{Annotation, AnnotationValue, Declarations, TypeDecl, TypeKind},
    source::attributes::RUNTIME_ENTRY
};

/// Annotation that turns a type into a marker.
pub const META_DESCRIPTOR: &str = "meta_jel";

/// Owned, build-time form of [`Descriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorConfig {
    /// Marker member holding the expression.
    pub expression_element_name:       String,
    /// Name of the context parameter.
    pub context_variable_name:         String,
    /// Context type, empty for dynamic.
    pub context_type:                  String,
    /// Return type, empty for dynamic.
    pub return_type:                   String,
    /// Pattern for type-level evaluators.
    pub evaluator_class_name_pattern:  String,
    /// Pattern for method-level evaluators.
    pub evaluator_method_name_pattern: String,
    /// Items appended to the evaluator's inherent impl.
    pub custom_methods:                String,
    /// Attribute paths stamped on the evaluator.
    pub evaluator_markers:             Vec<String>,
    /// Extra `use` paths.
    pub imports:                       Vec<String>
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        let defaults = Descriptor::DEFAULT;
        Self {
            expression_element_name:       defaults.expression_element_name.to_owned(),
            context_variable_name:         defaults.context_variable_name.to_owned(),
            context_type:                  defaults.context_type.to_owned(),
            return_type:                   defaults.return_type.to_owned(),
            evaluator_class_name_pattern:  defaults.evaluator_class_name_pattern.to_owned(),
            evaluator_method_name_pattern: defaults.evaluator_method_name_pattern.to_owned(),
            custom_methods:                defaults.custom_methods.to_owned(),
            evaluator_markers:             Vec::new(),
            imports:                       Vec::new()
        }
    }
}

impl DescriptorConfig {
    /// Read the members of a `meta_jel` annotation over the defaults.
    ///
    /// # Errors
    ///
    /// A message naming the first member with an unusable value.
    pub fn from_annotation(
        annotation: &Annotation,
        diagnostics: &mut Diagnostics,
        marker: &str
    ) -> Result<Self, String> {
        let mut config = Self::default();

        for (key, value) in &annotation.values {
            let slot = match key.as_str() {
                "expression_element_name" => &mut config.expression_element_name,
                "context_variable_name" => &mut config.context_variable_name,
                "context_type" => &mut config.context_type,
                "return_type" => &mut config.return_type,
                "evaluator_class_name_pattern" => &mut config.evaluator_class_name_pattern,
                "evaluator_method_name_pattern" => &mut config.evaluator_method_name_pattern,
                "custom_methods" => &mut config.custom_methods,
                "evaluator_markers" => {
                    config.evaluator_markers = list(key, value)?;
                    continue;
                }
                "imports" => {
                    config.imports = list(key, value)?;
                    continue;
                }
                RUNTIME_ENTRY => continue,
                _ => {
                    diagnostics.warning(marker, format!("unknown `{META_DESCRIPTOR}` member `{key}` ignored"));
                    continue;
                }
            };
            match value {
                AnnotationValue::Str(text) => *slot = text.clone(),
                _ => return Err(format!("`{META_DESCRIPTOR}` member `{key}` must be a string literal"))
            }
        }

        Ok(config)
    }

    /// Naming convention of the two patterns.
    pub fn naming(&self) -> NamingConvention {
        NamingConvention::new(
            self.evaluator_class_name_pattern.as_str(),
            self.evaluator_method_name_pattern.as_str()
        )
    }
}

fn list(key: &str, value: &AnnotationValue) -> Result<Vec<String>, String> {
    match value {
        AnnotationValue::List(items) => Ok(items.clone()),
        AnnotationValue::Str(item) => Ok(vec![item.clone()]),
        _ => Err(format!("`{META_DESCRIPTOR}` member `{key}` must be a list of paths"))
    }
}

/// Marker type in use, with its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerType {
    /// Qualified name of the marker type.
    pub name:       String,
    /// Configuration read from its `meta_jel` annotation.
    pub descriptor: DescriptorConfig
}

/// Check whether `annotation` is the meta descriptor (`meta_jel`,
/// `jel::meta_jel`).
pub fn is_meta_descriptor(annotation: &Annotation) -> bool {
    annotation.simple_name() == META_DESCRIPTOR
}

/// Check whether `declaration` is a marker type.
pub fn is_marker(declaration: &TypeDecl) -> bool {
    declaration.annotations.iter().any(is_meta_descriptor)
}

/// Markers used by a type or its methods, directly or one meta level down.
pub fn markers_of(declarations: &Declarations, declaration: &TypeDecl) -> BTreeSet<String> {
    let sites = std::iter::once((declaration.module(), declaration.annotations.as_slice())).chain(
        declaration
            .methods
            .iter()
            .map(|method| (method.module.as_str(), method.annotations.as_slice()))
    );

    let mut markers = BTreeSet::new();
    for (module, annotations) in sites {
        for annotation in annotations {
            let Some(annotated) = declarations.resolve(module, &annotation.name) else {
                continue;
            };
            if is_marker(annotated) {
                markers.insert(annotated.name.clone());
            }
            for meta in &annotated.annotations {
                if let Some(meta_type) = declarations.resolve(annotated.module(), &meta.name)
                    && is_marker(meta_type)
                {
                    markers.insert(meta_type.name.clone());
                }
            }
        }
    }
    markers
}

/// Distinct markers in use, each with its descriptor.
///
/// Markers with an unusable descriptor are reported and skipped.
pub fn discover(declarations: &Declarations, diagnostics: &mut Diagnostics) -> Vec<MarkerType> {
    let used: BTreeSet<String> = declarations
        .types()
        .iter()
        .flat_map(|declaration| markers_of(declarations, declaration))
        .collect();

    let mut markers = Vec::with_capacity(used.len());
    for name in used {
        let Some(marker) = declarations.get(&name) else {
            continue;
        };
        let Some(meta) = marker.annotations.iter().find(|a| is_meta_descriptor(a)) else {
            continue;
        };
        if marker.kind != TypeKind::Struct {
            diagnostics.error(&name, "only structs can be markers, `meta_jel` accepts nothing else");
            continue;
        }

        let descriptor = match DescriptorConfig::from_annotation(meta, diagnostics, &name) {
            Ok(descriptor) => descriptor,
            Err(message) => {
                diagnostics.error(&name, message);
                continue;
            }
        };

        if !marker.has_member(&descriptor.expression_element_name) {
            diagnostics.error(
                &name,
                format!(
                    "marker has no member `{}` to hold the expression",
                    descriptor.expression_element_name
                )
            );
            continue;
        }

        markers.push(MarkerType {
            name,
            descriptor
        });
    }
    markers
}
