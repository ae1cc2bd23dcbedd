// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generated evaluators, used directly and through the resolver.

use std::{
    sync::{Arc, Barrier},
    thread
};

use jel::{CallSite, Dynamic, Evaluator, EvaluatorResolver, ResolveError};
use secured_endpoint::{
    evaluators::secured_endpoint::foo::{DummyEvalMethodSimpleJelEvaluator, DummySimpleJelEvaluator},
    foo::Dummy,
    markers::Evaluable,
    registry
};

fn resolver() -> EvaluatorResolver<Dynamic, Box<Dynamic>> {
    EvaluatorResolver::for_marker::<Evaluable>(Arc::new(registry()))
}

fn as_i32(value: Box<Dynamic>) -> i32 {
    *value.downcast::<i32>().unwrap()
}

#[test]
fn registry_holds_every_generated_name() {
    let registry = registry();
    assert!(registry.contains("secured_endpoint::foo::Dummy$SimpleJelEvaluator"));
    assert!(registry.contains("secured_endpoint::foo::Dummy$eval_method$SimpleJelEvaluator"));
    assert!(registry.contains("secured_endpoint::orders::Orders_list$MpJwtSecuredBy"));
    assert!(registry.contains("secured_endpoint::orders::Reports$MpJwtSecuredBy"));
    assert!(!registry.contains("secured_endpoint::orders::Orders_count$MpJwtSecuredBy"));
}

#[test]
fn class_level_evaluator_returns_two() {
    assert_eq!(as_i32(DummySimpleJelEvaluator.evaluate(&())), 2);
    assert_eq!(as_i32(DummySimpleJelEvaluator.evaluate(&"any context")), 2);

    let evaluator = resolver().resolve(&CallSite::of_type::<Dummy>()).unwrap();
    assert_eq!(as_i32(evaluator.evaluate(&42u64)), 2);
}

#[test]
fn method_level_evaluator_returns_three() {
    assert_eq!(as_i32(DummyEvalMethodSimpleJelEvaluator.evaluate(&())), 3);

    let evaluator = resolver()
        .resolve(&CallSite::method::<Dummy>("eval_method"))
        .unwrap();
    assert_eq!(as_i32(evaluator.evaluate(&())), 3);
}

#[test]
fn resolution_is_cached() {
    let resolver = resolver();
    let site = CallSite::method::<Dummy>("eval_method");

    let first = resolver.resolve(&site).unwrap();
    let second = resolver.resolve(&site).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(resolver.len(), 1);
}

#[test]
fn concurrent_first_resolution_shares_one_instance() {
    const CALLERS: usize = 16;

    let resolver = resolver();
    let site = CallSite::of_type::<Dummy>();
    let barrier = Barrier::new(CALLERS);

    let instances: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    resolver.resolve(&site).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert!(instances.iter().all(|instance| Arc::ptr_eq(instance, &instances[0])));
    assert_eq!(resolver.len(), 1);
}

#[test]
fn missing_binding_names_the_computed_evaluator() {
    let err = resolver()
        .resolve(&CallSite::method::<Dummy>("unmarked"))
        .err()
        .unwrap();

    assert!(matches!(err, ResolveError::NotFound { .. }));
    assert_eq!(err.name(), Some("secured_endpoint::foo::Dummy$unmarked$SimpleJelEvaluator"));
}
