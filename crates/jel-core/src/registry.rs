// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Name → factory table of evaluators.
//!
//! The generated `evaluators.rs` index ends with a `register` function that
//! fills an [`EvaluatorRegistry`] with every evaluator the build script
//! produced, keyed by its qualified name:
//!
//! ```rust,ignore
//! pub mod evaluators {
//!     include!(concat!(env!("OUT_DIR"), "/jel/evaluators.rs"));
//! }
//!
//! let mut registry = jel::EvaluatorRegistry::new();
//! evaluators::register(&mut registry);
//! ```
//!
//! Factories are type-erased so a single registry holds evaluators of every
//! marker; the resolver restores the concrete contract on lookup.

use std::{
    any::{Any, type_name},
    collections::HashMap,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc
};

use tracing::{debug, warn};

use crate::{
    error::{BoxError, InstantiationError, panic_message},
    evaluator::{Evaluator, SharedEvaluator}
};

type Instance = Box<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

#[derive(Clone)]
struct Entry {
    evaluator: &'static str,
    factory:   Factory
}

/// Registry of evaluator factories.
#[derive(Clone, Default)]
pub struct EvaluatorRegistry {
    entries: HashMap<String, Entry>
}

impl EvaluatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `E` under `name`, built with [`Default`].
    pub fn register<E>(&mut self, name: impl Into<String>) -> &mut Self
    where
        E: Evaluator + Default,
        E::Context: 'static,
        E::Output: 'static
    {
        self.register_factory(name, || Ok(E::default()))
    }

    /// Register a custom factory under `name`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register_factory<E, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        E: Evaluator,
        E::Context: 'static,
        E::Output: 'static,
        F: Fn() -> Result<E, BoxError> + Send + Sync + 'static
    {
        let name = name.into();
        let factory: Factory = Arc::new(move || {
            let evaluator = factory()?;
            let shared: SharedEvaluator<E::Context, E::Output> = Arc::new(evaluator);
            Ok(Box::new(shared) as Instance)
        });

        debug!(evaluator = %name, implementation = type_name::<E>(), "registering evaluator");
        let previous = self.entries.insert(
            name.clone(),
            Entry {
                evaluator: type_name::<E>(),
                factory
            }
        );
        if let Some(previous) = previous {
            warn!(
                evaluator = %name,
                replaced = previous.evaluator,
                "evaluator registered twice, keeping the last one"
            );
        }

        self
    }

    /// Check whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered evaluators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the factory registered under `name`.
    ///
    /// Returns `None` when nothing is registered. Panics inside the factory
    /// are caught and reported as [`InstantiationError::Panicked`].
    pub(crate) fn instantiate(&self, name: &str) -> Option<Result<Instance, InstantiationError>> {
        let entry = self.entries.get(name)?;

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| (entry.factory)())) {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(source)) => Err(InstantiationError::Failed(source)),
            Err(payload) => Err(InstantiationError::Panicked(panic_message(payload.as_ref())))
        };
        Some(outcome)
    }
}

impl fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluatorRegistry")
            .field("names", &self.names())
            .finish()
    }
}
