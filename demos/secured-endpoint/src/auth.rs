// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Caller identity.

/// Claims of the caller, standing in for a decoded token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    raw_token: Option<String>,
    groups:    Vec<String>
}

impl Claims {
    /// Authenticated caller.
    pub fn new(raw_token: impl Into<String>) -> Self {
        Self {
            raw_token: Some(raw_token.into()),
            groups:    Vec::new()
        }
    }

    /// Caller without a token.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Add a group membership.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Raw token, if any.
    pub fn raw_token(&self) -> Option<&str> {
        self.raw_token.as_deref()
    }

    /// Check group membership.
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}
