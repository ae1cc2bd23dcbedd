// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Order store with authorization rules on its operations.
//!
//! | Call site | Rule |
//! |-----------|------|
//! | `Orders::list` | any authenticated caller |
//! | `Orders::delete_all` | authenticated `admin` |
//! | `Orders::export` | authenticated `auditor` |
//! | `Orders::audit` | broken rule, always panics |
//! | `Reports` (type) | authenticated `auditor` |

use jel::mark;

use crate::markers::SecuredBy;

/// In-memory orders.
#[derive(Debug, Clone)]
pub struct Orders {
    items: Vec<String>
}

impl Orders {
    /// Store holding `items`.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self {
            items: items.into_iter().map(Into::into).collect()
        }
    }

    /// All orders.
    #[mark(SecuredBy = "return Self::exists(jwt)")]
    pub fn list(&self) -> Vec<String> {
        self.items.clone()
    }

    /// Number of orders that would be removed.
    #[mark(SecuredBy = "return Self::exists(jwt) && jwt.has_group(\"admin\")")]
    pub fn delete_all(&self) -> usize {
        self.items.len()
    }

    /// Orders as one line of text.
    #[mark(SecuredBy = "return Self::exists(jwt) && jwt.has_group(\"auditor\")")]
    pub async fn export(&self) -> String {
        self.items.join(",")
    }

    /// Guarded by a rule that fails while evaluating.
    #[mark(SecuredBy = "panic!(\"claims backend unavailable\")")]
    pub fn audit(&self) -> usize {
        0
    }

    /// Not guarded: no evaluator exists for it.
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Reports, guarded as a whole.
#[mark(SecuredBy = "return Self::exists(jwt) && jwt.has_group(\"auditor\")")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Reports;

impl Reports {
    /// Monthly summary.
    pub fn monthly(&self) -> &'static str {
        "monthly"
    }
}
