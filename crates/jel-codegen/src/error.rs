// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types of the generator.
//!
//! Problems with one declaration never surface here: they are recorded in
//! [`Diagnostics`](crate::Diagnostics) and the run goes on. These types cover
//! what stops a whole run (bad configuration, unusable output directory) and
//! the final verdict once every diagnostic has been reported.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Invalid [`Builder`](crate::Builder) configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting was not given and its environment fallback is not set.
    #[error("`{setting}` is not configured and `{variable}` is not set")]
    MissingEnv {
        /// Builder setting.
        setting:  &'static str,
        /// Environment variable used as fallback.
        variable: &'static str
    },

    /// A source glob pattern is malformed.
    #[error("invalid source pattern `{pattern}`: {source}")]
    Pattern {
        /// Offending pattern.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source:  glob::PatternError
    },

    /// No source directory or file was configured.
    #[error("no source directory or file configured")]
    NoSources,

    /// The crate name is not a valid identifier.
    #[error("crate name `{0}` is not a valid identifier")]
    CrateName(String)
}

/// Failure to read one source file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        /// File path.
        path:   PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error
    },

    /// The file is not valid Rust.
    #[error("cannot parse `{}`: {source}", path.display())]
    Parse {
        /// File path.
        path:   PathBuf,
        /// Parser error.
        #[source]
        source: syn::Error
    }
}

/// Failure of a generator run.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The output directory could not be prepared.
    #[error("cannot prepare output directory `{}`: {source}", path.display())]
    Io {
        /// Directory path.
        path:   PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error
    },

    /// Errors were reported while generating; see the diagnostics.
    #[error("evaluator generation failed with {count} error(s)")]
    Failed {
        /// Number of error diagnostics.
        count: usize
    }
}

impl CodegenError {
    /// Check if the run completed but reported errors.
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
