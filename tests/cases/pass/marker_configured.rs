// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use jel::{Marker, meta_jel};

#[meta_jel(
    context_variable_name = "jwt",
    context_type = "crate::Claims",
    return_type = "bool",
    evaluator_class_name_pattern = "${class}$MpJwtSecuredBy",
    evaluator_method_name_pattern = "${class}_${method}$MpJwtSecuredBy",
    custom_methods = "fn exists(jwt: &Claims) -> bool { true }",
    evaluator_markers(crate::Audited),
    imports(crate::ClaimSet)
)]
pub struct SecuredBy {
    pub value: &'static str
}

fn main() {
    let descriptor = SecuredBy::DESCRIPTOR;
    assert_eq!(descriptor.expression_element_name, "value");
    assert_eq!(descriptor.context_variable_name, "jwt");
    assert_eq!(descriptor.context_type, "crate::Claims");
    assert_eq!(descriptor.return_type, "bool");
    assert_eq!(descriptor.custom_methods, "fn exists(jwt: &Claims) -> bool { true }");
    assert_eq!(descriptor.evaluator_markers, ["crate::Audited"]);
    assert_eq!(descriptor.imports, ["crate::ClaimSet"]);
    assert_eq!(
        descriptor.naming().evaluator_name("app::Api", Some("list")).unwrap(),
        "app::Api_list$MpJwtSecuredBy"
    );
}
