// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use jel::prelude::*;

#[meta_jel(
    context_variable_name = "jwt",
    context_type = "Claims",
    return_type = "bool",
    evaluator_method_name_pattern = "${class}_${method}$Gate"
)]
pub struct Guarded {
    pub value: &'static str
}

pub struct Claims {
    admin: bool
}

pub struct Orders;

impl Orders {
    #[mark(Guarded = "return jwt.admin")]
    pub fn list(&self) -> usize {
        3
    }
}

fn main() {
    let name = format!("{}_list$Gate", std::any::type_name::<Orders>());
    let mut registry = EvaluatorRegistry::new();
    registry.register_factory(name, || Ok(from_fn(|jwt: &Claims| jwt.admin)));

    let gate = AccessGate::<Claims>::for_marker::<Guarded>(Arc::new(registry));
    let site = CallSite::method::<Orders>("list");

    let admin = Claims { admin: true };
    assert_eq!(gate.guard(&site, &admin, || Orders.list()).unwrap(), 3);

    let guest = Claims { admin: false };
    assert!(gate.guard(&site, &guest, || Orders.list()).unwrap_err().is_denied());
}
