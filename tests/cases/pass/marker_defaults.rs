// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use jel::{Marker, mark, meta_jel};

#[meta_jel]
pub struct Evaluable {
    pub value: &'static str
}

#[mark(Evaluable = "return 1 + 1")]
pub struct Dummy;

fn main() {
    assert_eq!(Evaluable::NAME, "Evaluable");
    assert_eq!(Evaluable::DESCRIPTOR, jel::Descriptor::DEFAULT);

    let naming = Evaluable::DESCRIPTOR.naming();
    assert_eq!(
        naming.evaluator_name("app::foo::Dummy", None).unwrap(),
        "app::foo::Dummy$SimpleJelEvaluator"
    );
    assert_eq!(
        naming.evaluator_name("app::foo::Dummy", Some("eval_method")).unwrap(),
        "app::foo::Dummy$eval_method$SimpleJelEvaluator"
    );
}
