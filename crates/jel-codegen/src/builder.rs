// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Build script entry point.
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
//! ```rust,ignore
//! // src/lib.rs
//! pub mod evaluators {
//!     include!(concat!(env!("OUT_DIR"), "/jel/evaluators.rs"));
//! }
//! ```
//!
//! # Settings
//!
//! | Setting | Default |
//! |---------|---------|
//! | [`source_dir`](Builder::source_dir) / [`file`](Builder::file) | required |
//! | [`crate_name`](Builder::crate_name) | `CARGO_PKG_NAME`, `-` → `_` |
//! | [`out_dir`](Builder::out_dir) | `$OUT_DIR/jel` |
//! | [`runtime_crate`](Builder::runtime_crate) | `jel` |
//! | [`index_file`](Builder::index_file) | `evaluators.rs` |
//! | [`emit_rerun_if_changed`](Builder::emit_rerun_if_changed) | `true` |
//! | [`cargo_warnings`](Builder::cargo_warnings) | `true` |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use tracing::{debug, info};

use crate::{
    diagnostics::Diagnostics,
    discovery::{MarkerType, discover},
    error::{CodegenError, ConfigError},
    generator::{Artifact, generate},
    model::Declarations,
    render::{render_artifact, render_index},
    sink::{ArtifactSink, FsSink, artifact_path},
    source::SourceParser
};

/// Default runtime crate referenced by generated code.
pub const DEFAULT_RUNTIME_CRATE: &str = "jel";

/// Default name of the index file.
pub const DEFAULT_INDEX_FILE: &str = "evaluators.rs";

/// Subdirectory of `OUT_DIR` used when no output directory is configured.
pub const OUT_SUBDIR: &str = "jel";

/// Settings of the generation step itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Runtime crate path, e.g. `::jel`.
    pub runtime:    String,
    /// Index file name, relative to the sink.
    pub index_file: String
}

impl Default for Options {
    fn default() -> Self {
        Self {
            runtime:    runtime_path(DEFAULT_RUNTIME_CRATE),
            index_file: DEFAULT_INDEX_FILE.to_owned()
        }
    }
}

/// Result of a generation run.
#[derive(Debug, Clone, Default)]
pub struct Output {
    /// Markers in use.
    pub markers:   Vec<MarkerType>,
    /// Artifacts written successfully.
    pub artifacts: Vec<Artifact>,
    /// Paths of the written artifacts, parallel to `artifacts`.
    pub files:     Vec<PathBuf>,
    /// Path of the index, if it was written.
    pub index:     Option<PathBuf>
}

/// Discover markers, generate their evaluators and write them with the index.
///
/// Every problem is recorded in `diagnostics`; an artifact that cannot be
/// written is reported against its declaration and left out of the index.
pub fn run(
    declarations: &Declarations,
    options: &Options,
    sink: &mut dyn ArtifactSink,
    diagnostics: &mut Diagnostics
) -> Output {
    let markers = discover(declarations, diagnostics);
    let generated = generate(declarations, &markers, &options.runtime, diagnostics);

    let mut output = Output {
        markers,
        ..Output::default()
    };
    for artifact in generated {
        let relative = artifact_path(&artifact);
        let source = render_artifact(&artifact);
        match sink.write(&relative, &source) {
            Ok(path) => {
                debug!(evaluator = %artifact.qualified_name, path = %path.display(), "artifact rendered");
                output.files.push(path);
                output.artifacts.push(artifact);
            }
            Err(err) => diagnostics.error(
                &artifact.element,
                format!("cannot write `{}`: {err}", relative.display())
            )
        }
    }

    let entries: Vec<(&Artifact, &Path)> = output
        .artifacts
        .iter()
        .zip(output.files.iter().map(PathBuf::as_path))
        .collect();
    let index = render_index(&entries, &options.runtime);
    match sink.write(Path::new(&options.index_file), &index) {
        Ok(path) => output.index = Some(path),
        Err(err) => diagnostics.error(&options.index_file, format!("cannot write index: {err}"))
    }

    output
}

/// Turn a crate name into an absolute path for generated code.
///
/// `jel` → `::jel`; paths already anchored (`::x`, `crate::x`) are kept.
pub fn runtime_path(name: &str) -> String {
    let name = name.trim();
    let anchored = name.starts_with("::")
        || ["crate", "self", "super"]
            .iter()
            .any(|anchor| name == *anchor || name.starts_with(&format!("{anchor}::")));
    if anchored {
        name.to_owned()
    } else {
        format!("::{name}")
    }
}

/// Configures and runs evaluator generation from a build script.
#[derive(Debug, Clone)]
pub struct Builder {
    source_dirs:           Vec<PathBuf>,
    files:                 Vec<PathBuf>,
    crate_name:            Option<String>,
    out_dir:               Option<PathBuf>,
    runtime_crate:         String,
    index_file:            String,
    emit_rerun_if_changed: bool,
    cargo_warnings:        bool
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            source_dirs:           Vec::new(),
            files:                 Vec::new(),
            crate_name:            None,
            out_dir:               None,
            runtime_crate:         DEFAULT_RUNTIME_CRATE.to_owned(),
            index_file:            DEFAULT_INDEX_FILE.to_owned(),
            emit_rerun_if_changed: true,
            cargo_warnings:        true
        }
    }
}

impl Builder {
    /// Builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every `.rs` file below `dir`; `dir` is the crate's module root.
    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dirs.push(dir.into());
        self
    }

    /// Scan a single file; its directory is taken as the module root.
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.files.push(file.into());
        self
    }

    /// Crate name used as the first segment of qualified names.
    pub fn crate_name(mut self, name: impl Into<String>) -> Self {
        self.crate_name = Some(name.into());
        self
    }

    /// Directory receiving the generated files.
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Path of the runtime crate in generated code.
    pub fn runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    /// File name of the index.
    pub fn index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = name.into();
        self
    }

    /// Print `cargo:rerun-if-changed` for every scanned source.
    pub fn emit_rerun_if_changed(mut self, enabled: bool) -> Self {
        self.emit_rerun_if_changed = enabled;
        self
    }

    /// Print diagnostics as `cargo:warning` lines.
    pub fn cargo_warnings(mut self, enabled: bool) -> Self {
        self.cargo_warnings = enabled;
        self
    }

    /// Generation options derived from this builder.
    pub fn options(&self) -> Options {
        Options {
            runtime:    runtime_path(&self.runtime_crate),
            index_file: self.index_file.clone()
        }
    }

    /// Resolved crate name.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingEnv`] without a configured name or
    /// `CARGO_PKG_NAME`, [`ConfigError::CrateName`] for an invalid one.
    pub fn resolved_crate_name(&self) -> Result<String, ConfigError> {
        let name = match &self.crate_name {
            Some(name) => name.clone(),
            None => env::var("CARGO_PKG_NAME")
                .map_err(|_| ConfigError::MissingEnv {
                    setting:  "crate_name",
                    variable: "CARGO_PKG_NAME"
                })?
                .replace('-', "_")
        };
        if syn::parse_str::<syn::Ident>(&name).is_err() {
            return Err(ConfigError::CrateName(name));
        }
        Ok(name)
    }

    /// Resolved output directory.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingEnv`] without a configured directory or `OUT_DIR`.
    pub fn resolved_out_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.out_dir {
            Some(dir) => Ok(dir.clone()),
            None => env::var_os("OUT_DIR")
                .map(|dir| PathBuf::from(dir).join(OUT_SUBDIR))
                .ok_or(ConfigError::MissingEnv {
                    setting:  "out_dir",
                    variable: "OUT_DIR"
                })
        }
    }

    /// Every source file with its module root, sorted.
    fn sources(&self) -> Result<Vec<(PathBuf, PathBuf)>, ConfigError> {
        if self.source_dirs.is_empty() && self.files.is_empty() {
            return Err(ConfigError::NoSources);
        }

        let mut sources = Vec::new();
        for dir in &self.source_dirs {
            let pattern = format!("{}/**/*.rs", glob::Pattern::escape(&dir.to_string_lossy()));
            let paths = glob::glob(&pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source
            })?;
            let mut files: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
            files.sort();
            sources.extend(files.into_iter().map(|file| (dir.clone(), file)));
        }
        for file in &self.files {
            let root = file.parent().map(Path::to_path_buf).unwrap_or_default();
            sources.push((root, file.clone()));
        }
        Ok(sources)
    }

    /// Parse the sources into the declaration model.
    ///
    /// Unreadable or invalid files are reported and skipped.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for an unusable configuration.
    pub fn declarations(&self, diagnostics: &mut Diagnostics) -> Result<Declarations, ConfigError> {
        let crate_name = self.resolved_crate_name()?;
        let sources = self.sources()?;

        if self.emit_rerun_if_changed {
            for dir in &self.source_dirs {
                println!("cargo:rerun-if-changed={}", dir.display());
            }
        }

        let mut parser = SourceParser::new(crate_name);
        for (root, file) in &sources {
            if self.emit_rerun_if_changed {
                println!("cargo:rerun-if-changed={}", file.display());
            }
            if let Err(err) = parser.parse_file(root, file) {
                diagnostics.error(file.display().to_string(), err.to_string());
            }
        }
        Ok(parser.finish(diagnostics))
    }

    /// Parse, generate and write into `sink` without judging the outcome.
    ///
    /// # Errors
    ///
    /// [`CodegenError::Config`] for an unusable configuration.
    pub fn generate_into(
        &self,
        sink: &mut dyn ArtifactSink,
        diagnostics: &mut Diagnostics
    ) -> Result<Output, CodegenError> {
        let declarations = self.declarations(diagnostics)?;
        Ok(run(&declarations, &self.options(), sink, diagnostics))
    }

    /// Generate into the output directory.
    ///
    /// All declarations are processed even when some fail; the failures are
    /// logged (and printed for cargo when enabled) before returning.
    ///
    /// # Errors
    ///
    /// - [`CodegenError::Config`] for an unusable configuration
    /// - [`CodegenError::Io`] when the output directory cannot be created
    /// - [`CodegenError::Failed`] when any error diagnostic was reported
    pub fn compile(&self) -> Result<Output, CodegenError> {
        let out_dir = self.resolved_out_dir()?;
        fs::create_dir_all(&out_dir).map_err(|source| CodegenError::Io {
            path: out_dir.clone(),
            source
        })?;
        let out_dir = fs::canonicalize(&out_dir).map_err(|source| CodegenError::Io {
            path: out_dir.clone(),
            source
        })?;

        let mut diagnostics = Diagnostics::new();
        let mut sink = FsSink::new(&out_dir);
        let output = self.generate_into(&mut sink, &mut diagnostics)?;

        info!(
            out_dir = %out_dir.display(),
            markers = output.markers.len(),
            evaluators = output.artifacts.len(),
            errors = diagnostics.error_count(),
            "evaluator generation finished"
        );
        if self.cargo_warnings {
            diagnostics.emit_cargo_warnings();
        }

        if diagnostics.has_errors() {
            return Err(CodegenError::Failed {
                count: diagnostics.error_count()
            });
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::{
        model::{Annotation, AnnotationValue, TypeDecl},
        sink::MemorySink
    };

    fn evaluable_crate() -> Declarations {
        let mut declarations = Declarations::new();

        let mut marker = TypeDecl::new("app::Evaluable");
        marker.annotations.push(Annotation::new("meta_jel"));
        marker.members.push("value".to_string());
        declarations.push(marker);

        let mut first = TypeDecl::new("app::foo::Dummy");
        first.annotations.push(
            Annotation::new("crate::Evaluable").with("value", AnnotationValue::Str("return 1 + 1".into()))
        );
        declarations.push(first);

        let mut second = TypeDecl::new("app::foo::Other");
        second.annotations.push(
            Annotation::new("crate::Evaluable").with("value", AnnotationValue::Str("return 2".into()))
        );
        declarations.push(second);

        declarations
    }

    /// Fails for one file name, stores the rest in memory.
    struct FailingSink {
        fail_on: &'static str,
        inner:   MemorySink
    }

    impl ArtifactSink for FailingSink {
        fn write(&mut self, relative: &Path, contents: &str) -> io::Result<PathBuf> {
            if relative.ends_with(self.fail_on) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.inner.write(relative, contents)
        }
    }

    #[test]
    fn runtime_paths_are_absolute() {
        assert_eq!(runtime_path("jel"), "::jel");
        assert_eq!(runtime_path("::jel"), "::jel");
        assert_eq!(runtime_path("crate::runtime"), "crate::runtime");
        assert_eq!(runtime_path("crates_io"), "::crates_io");
    }

    #[test]
    fn run_writes_artifacts_and_index() {
        let mut sink = MemorySink::new();
        let mut diagnostics = Diagnostics::new();

        let output = run(&evaluable_crate(), &Options::default(), &mut sink, &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(output.markers.len(), 1);
        assert_eq!(output.artifacts.len(), 2);
        assert_eq!(output.index, Some(PathBuf::from("evaluators.rs")));
        assert!(sink.get("app/foo/DummySimpleJelEvaluator.rs").is_some());
        assert!(sink.get("app/foo/OtherSimpleJelEvaluator.rs").is_some());

        let index = sink.get("evaluators.rs").unwrap();
        assert!(index.contains("\"app::foo::Dummy$SimpleJelEvaluator\""));
        assert!(index.contains("\"app::foo::Other$SimpleJelEvaluator\""));
    }

    #[test]
    fn write_failure_only_affects_its_declaration() {
        let mut sink = FailingSink {
            fail_on: "DummySimpleJelEvaluator.rs",
            inner:   MemorySink::new()
        };
        let mut diagnostics = Diagnostics::new();

        let output = run(&evaluable_crate(), &Options::default(), &mut sink, &mut diagnostics);

        assert_eq!(diagnostics.error_count(), 1);
        let error = diagnostics.errors().next().unwrap();
        assert_eq!(error.element, "app::foo::Dummy");
        assert_eq!(output.artifacts.len(), 1);
        assert_eq!(output.artifacts[0].element, "app::foo::Other");

        let index = sink.inner.get("evaluators.rs").unwrap();
        assert!(!index.contains("Dummy"));
        assert!(index.contains("OtherSimpleJelEvaluator"));
    }

    #[test]
    fn output_is_byte_identical_across_runs() {
        let declarations = evaluable_crate();
        let mut first = MemorySink::new();
        let mut second = MemorySink::new();
        run(&declarations, &Options::default(), &mut first, &mut Diagnostics::new());
        run(&declarations, &Options::default(), &mut second, &mut Diagnostics::new());

        assert_eq!(first.files(), second.files());
        for contents in first.files().values() {
            syn::parse_file(contents).unwrap();
        }
    }

    #[test]
    fn sources_are_required() {
        let err = Builder::new().crate_name("app").compile().unwrap_err();
        assert!(matches!(
            err,
            CodegenError::Config(ConfigError::NoSources) | CodegenError::Config(ConfigError::MissingEnv { .. })
        ));

        let err = Builder::new()
            .crate_name("app")
            .generate_into(&mut MemorySink::new(), &mut Diagnostics::new())
            .unwrap_err();
        assert!(matches!(err, CodegenError::Config(ConfigError::NoSources)));
    }

    #[test]
    fn invalid_crate_name_is_rejected() {
        let err = Builder::new()
            .crate_name("my app")
            .source_dir("src")
            .resolved_crate_name()
            .unwrap_err();
        assert!(matches!(err, ConfigError::CrateName(name) if name == "my app"));
    }

    #[test]
    fn options_follow_settings() {
        let options = Builder::new()
            .runtime_crate("crate::rt")
            .index_file("all.rs")
            .options();
        assert_eq!(options.runtime, "crate::rt");
        assert_eq!(options.index_file, "all.rs");
    }
}
