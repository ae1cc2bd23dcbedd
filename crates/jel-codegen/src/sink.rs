// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Where generated files go.
//!
//! [`FsSink`] writes below an output directory and leaves files untouched
//! when their contents did not change, so cargo does not rebuild for a
//! no-op generation. [`MemorySink`] keeps everything in memory for tests and
//! tooling.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf}
};

use tracing::trace;

use crate::generator::Artifact;

/// Destination of generated files.
pub trait ArtifactSink {
    /// Store `contents` at `relative` and return the path to `include!`.
    ///
    /// # Errors
    ///
    /// Any I/O failure of the destination.
    fn write(&mut self, relative: &Path, contents: &str) -> io::Result<PathBuf>;
}

/// Relative file of an artifact: one directory per package segment.
///
/// `app::foo` + `DummySimpleJelEvaluator` → `app/foo/DummySimpleJelEvaluator.rs`.
pub fn artifact_path(artifact: &Artifact) -> PathBuf {
    let mut path: PathBuf = artifact.package_segments().collect();
    path.push(format!("{}.rs", artifact.ident));
    path
}

/// Sink writing below a directory.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf
}

impl FsSink {
    /// Sink rooted at `root`; the directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into()
        }
    }

    /// Output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for FsSink {
    fn write(&mut self, relative: &Path, contents: &str) -> io::Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if fs::read_to_string(&path).is_ok_and(|existing| existing == contents) {
            trace!(path = %path.display(), "unchanged");
        } else {
            fs::write(&path, contents)?;
            trace!(path = %path.display(), "written");
        }
        Ok(path)
    }
}

/// Sink keeping files in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, String>
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents stored at `relative`.
    pub fn get(&self, relative: impl AsRef<Path>) -> Option<&str> {
        self.files.get(relative.as_ref()).map(String::as_str)
    }

    /// All files, sorted by path.
    pub fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, relative: &Path, contents: &str) -> io::Result<PathBuf> {
        self.files.insert(relative.to_path_buf(), contents.to_owned());
        Ok(relative.to_path_buf())
    }
}
