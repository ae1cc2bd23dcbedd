// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Build-time generator of jel evaluators.
//!
//! Reads a crate's sources, finds every declaration carrying a marker (a type
//! annotated with `#[meta_jel]`) and writes one evaluator type per usage,
//! plus an index that registers them all.
//!
//! # Pipeline
//!
//! ```text
//! *.rs ──source──▶ Declarations ──discovery──▶ MarkerType[]
//!                       │                          │
//!                       └────────generator─────────┘
//!                                   │
//!                               Artifact[] ──render──▶ text ──sink──▶ files + index
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | Host-independent declaration model |
//! | [`source`] | `syn` front end filling the model |
//! | [`discovery`] | Markers in use and their descriptors |
//! | [`generator`] | One [`Artifact`] per marked declaration |
//! | [`render`] | Evaluator and index source text |
//! | [`sink`] | Destinations for generated files |
//! | [`diagnostics`] | Per-element reports |
//! | [`builder`] | Build script configuration |
//!
//! # Usage
//!
//! ```rust,ignore
//! // build.rs
//! fn main() {
//!     jel_codegen::Builder::new()
//!         .source_dir("src")
//!         .compile()
//!         .expect("evaluator generation failed");
//! }
//! ```
//!
//! A failing declaration never stops the others: its problem is recorded as
//! a [`Diagnostic`], and [`Builder::compile`] fails only after everything
//! else has been written.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod model;
pub mod render;
pub mod sink;
pub mod source;

pub use builder::{Builder, Options, Output, run};
pub use diagnostics::{Diagnostic, Diagnostics, Level};
pub use discovery::{DescriptorConfig, MarkerType, discover};
pub use error::{CodegenError, ConfigError, SourceError};
pub use generator::{Artifact, TypeRef, generate};
pub use model::{Annotation, AnnotationValue, Declarations, MethodDecl, TypeDecl, TypeKind};
pub use sink::{ArtifactSink, FsSink, MemorySink};
pub use source::SourceParser;
