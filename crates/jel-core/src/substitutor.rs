// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Recursive `${name}` placeholder resolution.
//!
//! [`Substitutor`] expands placeholders in a template string using a lookup
//! function supplied at construction. It is the engine behind evaluator naming
//! patterns, but has no dependency on the rest of the crate.
//!
//! # Syntax
//!
//! | Form | Meaning |
//! |------|---------|
//! | `${name}` | Value of `name` |
//! | `${name:-fallback}` | Value of `name`, or `fallback` when the lookup has none |
//! | `\${name}` | Literal `${name}`, the backslash is dropped |
//!
//! Resolved values and fallbacks are scanned again, so `${a}` may expand to
//! `${b}` which expands further. A name that reappears while it is still being
//! resolved is a [`SubstitutionError::Cyclic`] error carrying the whole chain.
//!
//! # Example
//!
//! ```rust
//! use jel_core::Substitutor;
//!
//! let substitutor = Substitutor::new(|name: &str| match name {
//!     "class" => Some("app::Dummy".to_string()),
//!     _ => None
//! });
//!
//! assert_eq!(substitutor.replace("${class}$Eval").unwrap(), "app::Dummy$Eval");
//! assert_eq!(substitutor.replace("${missing:-none}").unwrap(), "none");
//! ```

use std::borrow::Cow;

use thiserror::Error;

const ESCAPE: char = '\\';
const PREFIX: &str = "${";
const SUFFIX: char = '}';
const DEFAULT_DELIMITER: &str = ":-";

/// Failure to expand a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    /// A placeholder refers back to a name that is still being resolved.
    #[error("cyclic placeholder substitution in `{template}`: {}", .chain.join("->"))]
    Cyclic {
        /// Template passed to [`Substitutor::replace`].
        template: String,
        /// Names in resolution order, ending with the repeated one.
        chain:    Vec<String>
    },

    /// A placeholder has no value and no fallback (strict mode only).
    #[error("placeholder `${{{name}}}` in `{template}` has no value")]
    Undefined {
        /// Name of the unresolved placeholder.
        name:     String,
        /// Template passed to [`Substitutor::replace`].
        template: String
    }
}

/// Placeholder resolver over a lookup function.
///
/// By default a placeholder without value or fallback is left untouched.
/// [`Substitutor::strict`] turns that case into an error, which is what the
/// naming convention uses so a typo never yields an empty name segment.
#[derive(Debug, Clone)]
pub struct Substitutor<F> {
    lookup: F,
    strict: bool
}

impl<F> Substitutor<F>
where
    F: Fn(&str) -> Option<String>
{
    /// Create a lenient substitutor.
    pub const fn new(lookup: F) -> Self {
        Self {
            lookup,
            strict: false
        }
    }

    /// Fail on placeholders that resolve to nothing.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Expand every placeholder of `template`.
    ///
    /// Templates that contain no placeholder come back borrowed.
    ///
    /// # Errors
    ///
    /// [`SubstitutionError::Cyclic`] when resolution loops, and
    /// [`SubstitutionError::Undefined`] for a missing value in strict mode.
    pub fn replace<'a>(&self, template: &'a str) -> Result<Cow<'a, str>, SubstitutionError> {
        if !template.contains(PREFIX) {
            return Ok(Cow::Borrowed(template));
        }

        let mut out = String::with_capacity(template.len());
        let mut in_progress = Vec::new();
        self.expand(template, template, &mut out, &mut in_progress)?;

        if out == template {
            Ok(Cow::Borrowed(template))
        } else {
            Ok(Cow::Owned(out))
        }
    }

    fn expand(
        &self,
        input: &str,
        template: &str,
        out: &mut String,
        in_progress: &mut Vec<String>
    ) -> Result<(), SubstitutionError> {
        let mut rest = input;

        while let Some(start) = rest.find(PREFIX) {
            let (before, tail) = rest.split_at(start);

            if let Some(literal) = before.strip_suffix(ESCAPE) {
                out.push_str(literal);
                out.push_str(PREFIX);
                rest = &tail[PREFIX.len()..];
                continue;
            }
            out.push_str(before);

            let body = &tail[PREFIX.len()..];
            let Some(end) = closing_brace(body) else {
                out.push_str(tail);
                return Ok(());
            };
            let placeholder = &tail[..PREFIX.len() + end + 1];
            let (name, fallback) = split_fallback(&body[..end]);
            rest = &body[end + 1..];

            if in_progress.iter().any(|seen| seen == name) {
                let mut chain = in_progress.clone();
                chain.push(name.to_owned());
                return Err(SubstitutionError::Cyclic {
                    template: template.to_owned(),
                    chain
                });
            }

            match (self.lookup)(name).or_else(|| fallback.map(str::to_owned)) {
                Some(value) => {
                    in_progress.push(name.to_owned());
                    let expanded = self.expand(&value, template, out, in_progress);
                    in_progress.pop();
                    expanded?;
                }
                None if self.strict => {
                    return Err(SubstitutionError::Undefined {
                        name:     name.to_owned(),
                        template: template.to_owned()
                    });
                }
                None => out.push_str(placeholder)
            }
        }

        out.push_str(rest);
        Ok(())
    }
}

/// Byte offset of the `}` closing a placeholder body, skipping nested ones.
fn closing_brace(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i..].starts_with(PREFIX.as_bytes()) {
            depth += 1;
            i += PREFIX.len();
            continue;
        }
        if bytes[i] == SUFFIX as u8 {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
        i += 1;
    }

    None
}

/// Split `name:-fallback`. A delimiter after a nested `${` belongs to it.
fn split_fallback(expr: &str) -> (&str, Option<&str>) {
    match (expr.find(DEFAULT_DELIMITER), expr.find(PREFIX)) {
        (Some(delimiter), Some(nested)) if nested < delimiter => (expr, None),
        (Some(delimiter), _) => (
            &expr[..delimiter],
            Some(&expr[delimiter + DEFAULT_DELIMITER.len()..])
        ),
        (None, _) => (expr, None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn substitutor(
        pairs: &[(&str, &str)]
    ) -> Substitutor<impl Fn(&str) -> Option<String>> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Substitutor::new(move |name: &str| values.get(name).cloned())
    }

    #[test]
    fn clean_input_is_returned_borrowed() {
        let s = substitutor(&[("a", "x")]);
        let out = s.replace("plain text").unwrap();
        assert!(matches!(out, Cow::Borrowed("plain text")));
    }

    #[test]
    fn empty_template() {
        let s = substitutor(&[]);
        assert_eq!(s.replace("").unwrap(), "");
    }

    #[test]
    fn simple_placeholder() {
        let s = substitutor(&[("class", "foo::Dummy")]);
        assert_eq!(
            s.replace("${class}$SimpleJelEvaluator").unwrap(),
            "foo::Dummy$SimpleJelEvaluator"
        );
    }

    #[test]
    fn dollar_before_placeholder_is_literal() {
        let s = substitutor(&[("class", "foo::Dummy"), ("method", "run")]);
        assert_eq!(
            s.replace("${class}$${method}$Eval").unwrap(),
            "foo::Dummy$run$Eval"
        );
    }

    #[test]
    fn fallback_used_when_absent() {
        let s = substitutor(&[]);
        assert_eq!(s.replace("${x:-fallback}").unwrap(), "fallback");
    }

    #[test]
    fn fallback_ignored_when_present() {
        let s = substitutor(&[("x", "value")]);
        assert_eq!(s.replace("${x:-fallback}").unwrap(), "value");
    }

    #[test]
    fn nested_placeholder_in_fallback() {
        let s = substitutor(&[("b", "inner")]);
        assert_eq!(s.replace("${a:-${b}}").unwrap(), "inner");
    }

    #[test]
    fn recursive_resolution() {
        let s = substitutor(&[("a", "${b}"), ("b", "value")]);
        assert_eq!(s.replace("${a}").unwrap(), "value");
    }

    #[test]
    fn cycle_reports_chain() {
        let s = substitutor(&[("a", "${b}"), ("b", "${a}")]);
        let err = s.replace("${a}").unwrap_err();
        assert_eq!(
            err,
            SubstitutionError::Cyclic {
                template: "${a}".to_string(),
                chain:    vec!["a".to_string(), "b".to_string(), "a".to_string()]
            }
        );
        assert!(err.to_string().ends_with("a->b->a"));
    }

    #[test]
    fn self_reference_is_cycle() {
        let s = substitutor(&[("a", "x${a}")]);
        assert!(matches!(
            s.replace("${a}"),
            Err(SubstitutionError::Cyclic { .. })
        ));
    }

    #[test]
    fn repeated_name_outside_resolution_is_not_cycle() {
        let s = substitutor(&[("a", "1")]);
        assert_eq!(s.replace("${a}-${a}").unwrap(), "1-1");
    }

    #[test]
    fn escape_suppresses_substitution() {
        let s = substitutor(&[("x", "value")]);
        assert_eq!(s.replace("\\${x}").unwrap(), "${x}");
    }

    #[test]
    fn adjacent_placeholders() {
        let s = substitutor(&[("a", "1"), ("b", "2")]);
        assert_eq!(s.replace("${a}${b}${a}").unwrap(), "121");
    }

    #[test]
    fn empty_value_is_substituted() {
        let s = substitutor(&[("a", "")]);
        assert_eq!(s.replace("[${a}]").unwrap(), "[]");
    }

    #[test]
    fn unknown_left_untouched_when_lenient() {
        let s = substitutor(&[]);
        let out = s.replace("${unknown}").unwrap();
        assert!(matches!(out, Cow::Borrowed("${unknown}")));
    }

    #[test]
    fn unknown_fails_when_strict() {
        let s = substitutor(&[]).strict();
        assert_eq!(
            s.replace("x${unknown}").unwrap_err(),
            SubstitutionError::Undefined {
                name:     "unknown".to_string(),
                template: "x${unknown}".to_string()
            }
        );
    }

    #[test]
    fn unterminated_placeholder_kept() {
        let s = substitutor(&[("a", "1")]);
        assert_eq!(s.replace("${a}${b").unwrap(), "1${b");
    }
}
