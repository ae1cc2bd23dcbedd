// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

fn main() {
    if let Err(err) = jel_codegen::Builder::new().source_dir("src").compile() {
        panic!("{err}");
    }
}
