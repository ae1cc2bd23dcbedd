// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Call-site resolution with a populate-once cache.
//!
//! # Lifecycle
//!
//! An [`EvaluatorResolver`] is constructed explicitly (usually once per
//! marker, shared behind an `Arc`) and owns its cache. Entries are created on
//! first use of a call site and live as long as the resolver; there is no
//! eviction.
//!
//! # Concurrency
//!
//! ```text
//! resolve(site)
//!   ├── cache.get(key) ── populated ──────────────▶ Arc clone, no construction
//!   └── cache.entry(key).or_default()   (shard lock, released immediately)
//!         └── OnceCell::get_or_try_init  (per-key; one factory run, others wait)
//! ```
//!
//! The map shard lock is never held while a factory runs, so a slow
//! constructor only delays callers of the same key.

use std::{
    any::{TypeId, type_name},
    fmt,
    sync::Arc
};

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::{
    descriptor::Marker,
    error::ResolveError,
    evaluator::SharedEvaluator,
    naming::{NamingConvention, NamingError},
    registry::EvaluatorRegistry
};

/// Declaring type and optional method of a guarded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    type_id:   TypeId,
    type_name: &'static str,
    method:    Option<&'static str>
}

impl CallSite {
    /// Type-level call site.
    pub fn of_type<T: ?Sized + 'static>() -> Self {
        Self {
            type_id:   TypeId::of::<T>(),
            type_name: strip_generics(type_name::<T>()),
            method:    None
        }
    }

    /// Method-level call site.
    pub fn method<T: ?Sized + 'static>(method: &'static str) -> Self {
        Self {
            method: Some(method),
            ..Self::of_type::<T>()
        }
    }

    /// Qualified name of the declaring type, without generic arguments.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Method name, `None` for type-level sites.
    pub const fn method_name(&self) -> Option<&'static str> {
        self.method
    }

    /// Cache key of this site.
    pub const fn key(&self) -> EvaluatorKey {
        EvaluatorKey {
            type_id: self.type_id,
            method:  self.method
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.method {
            Some(method) => write!(f, "{}::{}", self.type_name, method),
            None => f.write_str(self.type_name)
        }
    }
}

/// Cache identity: same type and equal method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvaluatorKey {
    type_id: TypeId,
    method:  Option<&'static str>
}

fn strip_generics(name: &'static str) -> &'static str {
    match name.find('<') {
        Some(index) => &name[..index],
        None => name
    }
}

/// Resolves and caches evaluators of one contract.
///
/// `C` is the context type and `R` the output type the evaluators must
/// implement; a registered evaluator with another contract is reported as
/// [`ResolveError::ContractMismatch`].
pub struct EvaluatorResolver<C: ?Sized + 'static, R: 'static> {
    naming:   NamingConvention,
    registry: Arc<EvaluatorRegistry>,
    cache:    DashMap<EvaluatorKey, Arc<OnceCell<SharedEvaluator<C, R>>>>
}

impl<C: ?Sized + 'static, R: 'static> EvaluatorResolver<C, R> {
    /// Create a resolver with explicit naming patterns.
    pub fn new(naming: NamingConvention, registry: Arc<EvaluatorRegistry>) -> Self {
        Self {
            naming,
            registry,
            cache: DashMap::new()
        }
    }

    /// Create a resolver using the patterns of marker `M`.
    pub fn for_marker<M: Marker>(registry: Arc<EvaluatorRegistry>) -> Self {
        Self::new(M::DESCRIPTOR.naming(), registry)
    }

    /// Naming convention in use.
    pub fn naming(&self) -> &NamingConvention {
        &self.naming
    }

    /// Evaluator name expected for `site`.
    ///
    /// # Errors
    ///
    /// Propagates [`NamingError`] from the patterns.
    pub fn evaluator_name(&self, site: &CallSite) -> Result<String, NamingError> {
        self.naming
            .evaluator_name(site.type_name(), site.method_name())
    }

    /// Evaluator bound to `site`, constructed on first use.
    ///
    /// Concurrent first calls for one site run the factory once; every
    /// caller receives the same instance.
    ///
    /// # Errors
    ///
    /// [`ResolveError`] when the name cannot be computed, nothing is
    /// registered, construction fails, or the contract differs. Failures are
    /// not cached as success; a later call tries again.
    pub fn resolve(&self, site: &CallSite) -> Result<SharedEvaluator<C, R>, ResolveError> {
        let key = site.key();

        if let Some(cell) = self.cache.get(&key)
            && let Some(evaluator) = cell.get()
        {
            return Ok(Arc::clone(evaluator));
        }

        let cell = Arc::clone(self.cache.entry(key).or_default().value());
        cell.get_or_try_init(|| self.instantiate(site))
            .map(Arc::clone)
    }

    /// Number of call sites with a constructed evaluator.
    pub fn len(&self) -> usize {
        self.cache
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Check if no evaluator has been constructed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn instantiate(&self, site: &CallSite) -> Result<SharedEvaluator<C, R>, ResolveError> {
        let name = self.evaluator_name(site)?;

        let instance = match self.registry.instantiate(&name) {
            None => return Err(ResolveError::NotFound { name }),
            Some(Err(source)) => return Err(ResolveError::Instantiation { name, source }),
            Some(Ok(instance)) => instance
        };

        match instance.downcast::<SharedEvaluator<C, R>>() {
            Ok(evaluator) => {
                debug!(evaluator = %name, site = %site, "evaluator instantiated");
                Ok(*evaluator)
            }
            Err(_) => Err(ResolveError::ContractMismatch {
                name,
                expected: type_name::<SharedEvaluator<C, R>>()
            })
        }
    }
}

impl<C: ?Sized + 'static, R: 'static> fmt::Debug for EvaluatorResolver<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluatorResolver")
            .field("naming", &self.naming)
            .field("registry", &self.registry)
            .field("cached", &self.len())
            .finish()
    }
}
