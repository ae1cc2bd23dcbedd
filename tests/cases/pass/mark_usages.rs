// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use jel::{mark, meta_jel};

#[meta_jel]
pub struct Evaluable {
    pub value: &'static str
}

#[meta_jel(expression_element_name = "rule")]
pub struct Rule {
    pub rule:   &'static str,
    pub strict: bool
}

mod nested {
    use super::*;

    #[mark(Evaluable("return 1"), Rule(rule = "true", strict))]
    pub enum Mode {
        On
    }
}

#[jel::mark(Evaluable = "return 2")]
pub union Bits {
    raw:   u32,
    float: f32
}

pub struct Dummy;

impl Dummy {
    #[mark(Evaluable = "return 1 + 2")]
    pub fn eval_method(&self) -> u8 {
        3
    }
}

fn main() {
    assert_eq!(Dummy.eval_method(), 3);
    let _ = nested::Mode::On;
    let bits = Bits { raw: 1 };
    assert_eq!(unsafe { bits.raw }, 1);
}
